//! Locale type: the languages the site is published in.

use anyhow::{bail, Result};
use std::fmt;

/// A site locale.
///
/// Every public page exists once per locale, under a `/{code}` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    French,
    English,
}

impl Locale {
    /// All published locales, in routing order.
    pub const ALL: [Locale; 2] = [Locale::French, Locale::English];

    /// Locale served when the visitor has not picked one.
    pub const DEFAULT: Locale = Locale::French;

    /// Create a Locale from its ISO 639-1 code.
    ///
    /// # Example
    /// ```
    /// use elysene_site::i18n::Locale;
    ///
    /// assert_eq!(Locale::from_code("en").unwrap(), Locale::English);
    /// ```
    pub fn from_code(code: &str) -> Result<Locale> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Locale::French),
            "en" => Ok(Locale::English),
            other => bail!("Unknown locale code: '{}'", other),
        }
    }

    /// ISO 639-1 code, also used as the URL prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::French => "fr",
            Locale::English => "en",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
