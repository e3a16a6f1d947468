//! Page metadata: resolved site identity and the `<head>` tags built from it.
//!
//! Site-wide values come from the CMS settings document when present and
//! fall back to `[site]`/`[seo]` config otherwise, so the resolved title and
//! description are never empty.

use crate::config::{self, SiteConfig};
use crate::content::Settings;
use crate::portable_text;
use maud::{Markup, html};
use tracing::debug;

const ROBOTS_INDEX: &str =
    "index, follow, max-snippet:-1, max-image-preview:large, max-video-preview:-1";
const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// Site-wide metadata resolved once per build.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMetadata {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Absolute social preview image URL.
    pub og_image: String,
    pub og_image_alt: String,
    /// Origin from the CMS settings, used for canonical links when valid.
    pub metadata_base: Option<String>,
    pub base_url: String,
    pub language: String,
    pub locale: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub publisher: String,
    pub twitter_handle: String,
    pub yandex_verification: Option<String>,
    pub google_verification: Option<String>,
    pub theme_color: String,
}

impl SiteMetadata {
    pub fn resolve(settings: &Settings, config: &SiteConfig) -> Self {
        let base_url = config.base_url();

        let title = settings
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                debug!("settings have no title, using site.title");
                config.site.title.clone()
            });

        let description = Some(portable_text::to_plain_text(&settings.description))
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| {
                debug!("settings have no description, using site.description");
                config.site.description.clone()
            });

        let og = settings.og_image.as_ref();
        let og_image = og
            .and_then(|o| o.url.as_deref())
            .filter(|u| !u.is_empty())
            .map(|u| config::absolute_url(&base_url, u))
            .unwrap_or_else(|| config::absolute_url(&base_url, &config.site.og_image));
        let og_image_alt = og
            .and_then(|o| o.alt.as_deref())
            .filter(|a| !a.is_empty())
            .unwrap_or(&title)
            .to_string();

        let metadata_base = og
            .and_then(|o| o.metadata_base.as_deref())
            .and_then(parse_metadata_base);

        Self {
            name: config.site.name.clone(),
            title,
            description,
            og_image,
            og_image_alt,
            metadata_base,
            base_url,
            language: config.site.language.clone(),
            locale: config.site.locale.clone(),
            keywords: config.seo.keywords.clone(),
            author: config.seo.author.clone(),
            publisher: config.seo.publisher.clone(),
            twitter_handle: config.seo.twitter_handle.clone(),
            yandex_verification: config.seo.yandex_verification.clone(),
            google_verification: config.seo.google_verification.clone(),
            theme_color: config.site.theme_color.clone(),
        }
    }

    /// Origin used for canonical and Open Graph URLs.
    pub fn canonical_base(&self) -> &str {
        self.metadata_base.as_deref().unwrap_or(&self.base_url)
    }

    /// Absolute canonical URL for a site-relative path.
    pub fn canonical_url(&self, path: &str) -> String {
        config::absolute_url(self.canonical_base(), path)
    }

    /// `<title>` text: the site title on the home page, `"{page} | {site}"`
    /// elsewhere.
    pub fn page_title(&self, page_title: Option<&str>) -> String {
        match page_title.filter(|t| !t.is_empty()) {
            Some(t) => format!("{t} | {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// Invalid values are ignored, matching how the CMS value is optional.
fn parse_metadata_base(raw: &str) -> Option<String> {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.host_str().is_some() => {
            Some(raw.trim_end_matches('/').to_string())
        }
        _ => {
            debug!(metadata_base = raw, "ignoring unparsable metadataBase");
            None
        }
    }
}

/// Open Graph object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OgType {
    #[default]
    Website,
    Article,
}

impl OgType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

/// Per-page overrides on top of [`SiteMetadata`].
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// `None` on the home page.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Site-relative path, e.g. `/posts/salad/`.
    pub path: String,
    pub og_type: OgType,
    pub image: Option<String>,
}

/// Everything that goes inside `<head>` except styles and scripts.
pub fn render_head(site: &SiteMetadata, page: &PageMeta, draft: bool) -> Markup {
    let title = site.page_title(page.title.as_deref());
    let og_title = page.title.as_deref().unwrap_or(&site.title);
    let description = page
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&site.description);
    let canonical = site.canonical_url(&page.path);
    let image = page
        .image
        .as_deref()
        .filter(|i| !i.is_empty())
        .unwrap_or(&site.og_image);
    let robots = if draft { ROBOTS_NOINDEX } else { ROBOTS_INDEX };

    html! {
        meta charset="UTF-8";
        meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=5.0";
        title { (title) }
        meta name="description" content=(description);
        @if !site.keywords.is_empty() {
            meta name="keywords" content=(site.keywords.join(", "));
        }
        meta name="author" content=(site.author);
        meta name="application-name" content=(site.name);
        meta name="creator" content=(site.author);
        meta name="publisher" content=(site.publisher);
        meta name="category" content="Health & Fitness";
        meta name="referrer" content="origin-when-cross-origin";
        meta name="robots" content=(robots);
        meta name="googlebot" content=(robots);
        link rel="canonical" href=(canonical);
        link rel="alternate" hreflang="ru-RU" href=(canonical);

        meta property="og:type" content=(page.og_type.as_str());
        meta property="og:locale" content=(site.locale);
        meta property="og:site_name" content=(site.name);
        meta property="og:url" content=(canonical);
        meta property="og:title" content=(og_title);
        meta property="og:description" content=(description);
        meta property="og:image" content=(image);
        meta property="og:image:alt" content=(site.og_image_alt);

        meta name="twitter:card" content="summary_large_image";
        meta name="twitter:site" content=(site.twitter_handle);
        meta name="twitter:creator" content=(site.twitter_handle);

        @if let Some(code) = &site.yandex_verification {
            meta name="yandex-verification" content=(code);
        }
        @if let Some(code) = &site.google_verification {
            meta name="google-site-verification" content=(code);
        }

        meta name="theme-color" content=(site.theme_color);
        meta name="apple-mobile-web-app-capable" content="yes";
        meta name="apple-mobile-web-app-status-bar-style" content="black-translucent";
        meta name="apple-mobile-web-app-title" content=(site.name);
        meta name="format-detection" content="telephone=no, address=no, email=no";
        link rel="manifest" href="/manifest.json";
        link rel="icon" href="/favicon.ico";
    }
}
