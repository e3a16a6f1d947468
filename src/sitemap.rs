//! Sitemap generation.
//!
//! Builds the sitemap entry list from the CMS's published documents and
//! serializes it to `sitemap.xml`.
//!
//! Three static routes always come first; every CMS document then
//! contributes one entry according to its type:
//!
//! | Route / type | URL                  | Priority | Change frequency |
//! |--------------|----------------------|----------|------------------|
//! | home         | `{base}`             | 1.0      | weekly           |
//! | food listing | `{base}/food`        | 0.8      | daily            |
//! | profile      | `{base}/profile`     | 0.5      | weekly           |
//! | `page`       | `{base}/{slug}`      | 0.8      | monthly          |
//! | `post`       | `{base}/posts/{slug}`| 0.6      | weekly           |
//!
//! Documents of any other type, or without a slug, are skipped.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://bodymetrics.ru/posts/salad</loc>
//!     <lastmod>2024-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.6</priority>
//!   </url>
//! </urlset>
//! ```

use crate::content::SitemapItem;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Crawler hint for how often a URL changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// Single URL entry in the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    /// CMS `_updatedAt` verbatim, or the build time.
    pub last_modified: String,
    /// 0.0–1.0
    pub priority: f32,
    pub change_frequency: ChangeFrequency,
}

/// CMS document types that have public URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoutedType {
    Page,
    Post,
}

impl RoutedType {
    fn parse(doc_type: &str) -> Option<Self> {
        match doc_type {
            "page" => Some(Self::Page),
            "post" => Some(Self::Post),
            _ => None,
        }
    }

    fn url(self, base_url: &str, slug: &str) -> String {
        match self {
            Self::Page => format!("{base_url}/{slug}"),
            Self::Post => format!("{base_url}/posts/{slug}"),
        }
    }

    fn priority(self) -> f32 {
        match self {
            Self::Page => 0.8,
            Self::Post => 0.6,
        }
    }

    fn change_frequency(self) -> ChangeFrequency {
        match self {
            Self::Page => ChangeFrequency::Monthly,
            Self::Post => ChangeFrequency::Weekly,
        }
    }
}

/// Format a timestamp the way `lastmod` values are written when the CMS
/// supplies none (`2024-05-01T12:00:00.000Z`).
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the sitemap entries: static routes first, then one entry per
/// recognized CMS document in input order.
///
/// `base_url` must already be normalized (no trailing slash).
pub fn build_sitemap(base_url: &str, items: &[SitemapItem], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let now_str = timestamp(now);
    let static_entry = |url: String, priority: f32, change_frequency: ChangeFrequency| {
        SitemapEntry {
            url,
            last_modified: now_str.clone(),
            priority,
            change_frequency,
        }
    };

    let mut entries = vec![
        static_entry(base_url.to_string(), 1.0, ChangeFrequency::Weekly),
        static_entry(format!("{base_url}/food"), 0.8, ChangeFrequency::Daily),
        static_entry(format!("{base_url}/profile"), 0.5, ChangeFrequency::Weekly),
    ];

    for item in items {
        let (Some(doc_type), Some(slug)) = (
            item.doc_type.as_deref().filter(|t| !t.is_empty()),
            item.slug.as_deref().filter(|s| !s.is_empty()),
        ) else {
            debug!(?item, "sitemap: skipping document without type or slug");
            continue;
        };
        let Some(routed) = RoutedType::parse(doc_type) else {
            debug!(doc_type, slug, "sitemap: skipping unrouted document type");
            continue;
        };
        entries.push(SitemapEntry {
            url: routed.url(base_url, slug),
            last_modified: item
                .updated_at
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| now_str.clone()),
            priority: routed.priority(),
            change_frequency: routed.change_frequency(),
        });
    }

    entries
}

/// Generate sitemap XML string.
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 160);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            escape_xml(&entry.last_modified)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
