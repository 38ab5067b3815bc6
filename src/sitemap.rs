use crate::i18n::Locale;
use chrono::{DateTime, SecondsFormat, Utc};

/// Pages that exist in every locale (home is the empty path)
pub const STATIC_PAGES: &[&str] = &["", "/blog", "/legal", "/privacy"];

pub const PROJECT_SLUGS: &[&str] = &[
    "monitoring-big-data",
    "cloud-data-migration",
    "saas-esg-genai",
    "bi-governance-security",
];

pub const ARTICLE_SLUGS: &[&str] = &["big-data-rgpd"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// List every public page, locale by locale.
pub fn entries(base_url: &str, last_modified: DateTime<Utc>) -> Vec<SitemapEntry> {
    let base_url = base_url.trim_end_matches('/');
    let mut routes = Vec::new();

    for locale in Locale::ALL {
        for page in STATIC_PAGES {
            let is_home = page.is_empty();
            routes.push(SitemapEntry {
                url: format!("{}/{}{}", base_url, locale.code(), page),
                last_modified,
                change_frequency: if is_home {
                    ChangeFrequency::Weekly
                } else {
                    ChangeFrequency::Monthly
                },
                priority: if is_home { 1.0 } else { 0.8 },
            });
        }

        for slug in PROJECT_SLUGS {
            routes.push(SitemapEntry {
                url: format!("{}/{}/projects/{}", base_url, locale.code(), slug),
                last_modified,
                change_frequency: ChangeFrequency::Monthly,
                priority: 0.7,
            });
        }

        for slug in ARTICLE_SLUGS {
            routes.push(SitemapEntry {
                url: format!("{}/{}/blog/{}", base_url, locale.code(), slug),
                last_modified,
                change_frequency: ChangeFrequency::Monthly,
                priority: 0.7,
            });
        }
    }

    routes
}

/// Render entries as a sitemaps.org XML document
pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str(&format!(
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            escape_xml(&entry.url),
            entry
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.change_frequency.as_str(),
            entry.priority,
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
