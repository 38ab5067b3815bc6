//! Internationalization (i18n) module.
//!
//! The site is bilingual. Page content and labels are owned by the frontend;
//! the backend only needs the locale set to build locale-prefixed URLs.

mod locale;

pub use locale::Locale;
