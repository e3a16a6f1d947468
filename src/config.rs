//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `site.toml`. Stock
//! defaults are the base layer; the user file only overrides what it names.
//! A handful of deployment values can also come from the environment (see
//! [`apply_env_overrides`]).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Body Metrics"
//! base_url = "https://bodymetrics.ru"   # Falls back to the default if malformed
//! language = "ru"
//! locale = "ru_RU"
//! title = "Body Metrics - Здоровье, Питание, Спорт"  # Used when the CMS has no title
//! description = "..."                                # Used when the CMS has no description
//! og_image = "/images/og-image.jpg"
//! theme_color = "#00d4aa"
//!
//! [cms]
//! project_id = ""                       # Sanity project id (or SANITY_PROJECT_ID)
//! dataset = "production"
//! api_version = "2025-02-19"
//! use_cdn = true
//! token_env = "SANITY_API_READ_TOKEN"   # Env var holding the draft-mode token
//! timeout_secs = 30
//!
//! [seo]
//! author = "Body Metrics Team"
//! publisher = "Body Metrics"
//! twitter_handle = "@bodymetrics"
//! yandex_verification = "da9aca6a8acc81b3"
//! # google_verification = "..."
//! keywords = ["здоровое питание", ...]
//! same_as = ["https://t.me/bodymetrics", "https://vk.com/bodymetrics"]
//!
//! [analytics]
//! enabled = true
//! yandex_metrika_id = 106291662
//!
//! [home]
//! slider_categories = 4
//! slider_posts = 10
//!
//! [colors]
//! background = "#0b0f14"
//! surface = "#141a21"
//! text = "#f2f4f5"
//! text_muted = "#9aa4ad"
//! border = "#26303a"
//! accent = "#00d4aa"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Used whenever `site.base_url` is missing or not a usable http(s) URL.
pub const DEFAULT_BASE_URL: &str = "https://bodymetrics.ru";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and fallback metadata.
    pub site: SiteSection,
    /// Headless CMS connection.
    pub cms: CmsConfig,
    /// Search engine and social metadata.
    pub seo: SeoConfig,
    /// Page view counter.
    pub analytics: AnalyticsConfig,
    /// Home page "top dishes" slider limits.
    pub home: HomeConfig,
    /// Color scheme, emitted as CSS custom properties.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() || self.site.description.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title and site.description must not be empty".into(),
            ));
        }
        if self.home.slider_categories == 0 || self.home.slider_posts == 0 {
            return Err(ConfigError::Validation(
                "home.slider_categories and home.slider_posts must be non-zero".into(),
            ));
        }
        if self.cms.dataset.trim().is_empty() {
            return Err(ConfigError::Validation("cms.dataset must not be empty".into()));
        }
        if self.cms.api_version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cms.api_version must not be empty".into(),
            ));
        }
        if self.cms.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cms.timeout_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The configured base URL, normalized. See [`resolve_base_url`].
    pub fn base_url(&self) -> String {
        resolve_base_url(&self.site.base_url)
    }
}

/// Site identity and the fallbacks used when the CMS settings are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Application / site name shown in Open Graph and the web manifest.
    pub name: String,
    /// Absolute site URL without trailing slash.
    pub base_url: String,
    /// `<html lang>` value.
    pub language: String,
    /// Open Graph locale.
    pub locale: String,
    /// Fallback title.
    pub title: String,
    /// Fallback description.
    pub description: String,
    /// Fallback social preview image, absolute or site-relative.
    pub og_image: String,
    /// Browser UI color.
    pub theme_color: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Body Metrics".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "ru".to_string(),
            locale: "ru_RU".to_string(),
            title: "Body Metrics - Здоровье, Питание, Спорт".to_string(),
            description: "Body Metrics - ваш путеводитель в мире здорового питания, похудения, \
                          тренировок и спортивных показателей. Узнайте о ключевых параметрах тела \
                          и эффективных методах достижения целей."
                .to_string(),
            og_image: "/images/og-image.jpg".to_string(),
            theme_color: "#00d4aa".to_string(),
        }
    }
}

/// Headless CMS connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmsConfig {
    /// Sanity project id. Required unless content comes from a file export.
    pub project_id: String,
    pub dataset: String,
    /// Dated API version, e.g. `2025-02-19`.
    pub api_version: String,
    /// Query the CDN host for published content.
    pub use_cdn: bool,
    /// Name of the environment variable holding the read token (draft mode).
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2025-02-19".to_string(),
            use_cdn: true,
            token_env: "SANITY_API_READ_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Search engine and social metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoConfig {
    pub author: String,
    /// Organization named as publisher in articles.
    pub publisher: String,
    pub twitter_handle: String,
    pub yandex_verification: Option<String>,
    pub google_verification: Option<String>,
    pub keywords: Vec<String>,
    /// Social profile links for the Organization schema.
    pub same_as: Vec<String>,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            author: "Body Metrics Team".to_string(),
            publisher: "Body Metrics".to_string(),
            twitter_handle: "@bodymetrics".to_string(),
            yandex_verification: Some("da9aca6a8acc81b3".to_string()),
            google_verification: None,
            keywords: [
                "здоровое питание",
                "похудение",
                "тренировки",
                "спортивные показатели",
                "фитнес",
                "диета",
                "здоровье",
                "тело",
                "метрики",
                "BMI",
                "вес",
                "калории",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            same_as: vec![
                "https://t.me/bodymetrics".to_string(),
                "https://vk.com/bodymetrics".to_string(),
            ],
        }
    }
}

/// Yandex Metrika counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    /// Counter id. No tag is rendered when absent.
    pub yandex_metrika_id: Option<u64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            yandex_metrika_id: Some(106291662),
        }
    }
}

/// Home page slider limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Number of category sections shown.
    pub slider_categories: usize,
    /// Posts per category section.
    pub slider_posts: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            slider_categories: 4,
            slider_posts: 10,
        }
    }
}

/// Single dark color scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    /// Cards and panels.
    pub surface: String,
    pub text: String,
    /// Secondary text (dates, captions, footers).
    pub text_muted: String,
    pub border: String,
    /// Links, badges and the theme color accent.
    pub accent: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0b0f14".to_string(),
            surface: "#141a21".to_string(),
            text: "#f2f4f5".to_string(),
            text_muted: "#9aa4ad".to_string(),
            border: "#26303a".to_string(),
            accent: "#00d4aa".to_string(),
        }
    }
}

// =============================================================================
// Base URL
// =============================================================================

/// Normalize a configured base URL.
///
/// Returns the input without trailing slashes when it parses as an absolute
/// `http`/`https` URL with a host; otherwise logs a warning and returns
/// [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    match url::Url::parse(trimmed) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            trimmed.to_string()
        }
        _ => {
            warn!(base_url = raw, "invalid site.base_url, using {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        }
    }
}

/// Make a site-relative path absolute against `base_url`. Absolute URLs pass
/// through unchanged.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given `site.toml` path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Apply deployment overrides from the process environment.
///
/// `SITE_URL`, `SANITY_PROJECT_ID` and `SANITY_DATASET` win over the file.
pub fn apply_env_overrides(config: &mut SiteConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

fn apply_overrides_from(config: &mut SiteConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(url) = non_empty("SITE_URL") {
        config.site.base_url = url;
    }
    if let Some(project) = non_empty("SANITY_PROJECT_ID") {
        config.cms.project_id = project;
    }
    if let Some(dataset) = non_empty("SANITY_DATASET") {
        config.cms.dataset = dataset;
    }
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Body Metrics site configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Environment overrides: SITE_URL, SANITY_PROJECT_ID, SANITY_DATASET.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Body Metrics"
# Absolute URL used for sitemap entries, canonical links and JSON-LD.
# A malformed value falls back to https://bodymetrics.ru.
base_url = "https://bodymetrics.ru"
language = "ru"
locale = "ru_RU"
# Used when the CMS settings document has no title / description.
title = "Body Metrics - Здоровье, Питание, Спорт"
description = "Body Metrics - ваш путеводитель в мире здорового питания, похудения, тренировок и спортивных показателей. Узнайте о ключевых параметрах тела и эффективных методах достижения целей."
og_image = "/images/og-image.jpg"
theme_color = "#00d4aa"

# ---------------------------------------------------------------------------
# Headless CMS (Sanity)
# ---------------------------------------------------------------------------
[cms]
project_id = ""
dataset = "production"
api_version = "2025-02-19"
# Published content is read from the CDN; draft mode always bypasses it.
use_cdn = true
# Environment variable holding the read token required by --drafts.
token_env = "SANITY_API_READ_TOKEN"
timeout_secs = 30

# ---------------------------------------------------------------------------
# SEO
# ---------------------------------------------------------------------------
[seo]
author = "Body Metrics Team"
publisher = "Body Metrics"
twitter_handle = "@bodymetrics"
yandex_verification = "da9aca6a8acc81b3"
# google_verification = ""
keywords = [
    "здоровое питание",
    "похудение",
    "тренировки",
    "спортивные показатели",
    "фитнес",
    "диета",
    "здоровье",
    "тело",
    "метрики",
    "BMI",
    "вес",
    "калории",
]
same_as = ["https://t.me/bodymetrics", "https://vk.com/bodymetrics"]

# ---------------------------------------------------------------------------
# Analytics (Yandex Metrika)
# ---------------------------------------------------------------------------
[analytics]
enabled = true
yandex_metrika_id = 106291662

# ---------------------------------------------------------------------------
# Home page "top dishes" slider
# ---------------------------------------------------------------------------
[home]
# Category sections shown, largest categories first.
slider_categories = 4
# Posts per section, highest calories first.
slider_posts = 10

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0b0f14"
surface = "#141a21"
text = "#f2f4f5"
text_muted = "#9aa4ad"
border = "#26303a"
accent = "#00d4aa"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
    --color-accent: {accent};
}}"#,
        background = colors.background,
        surface = colors.surface,
        text = colors.text,
        text_muted = colors.text_muted,
        border = colors.border,
        accent = colors.accent,
    )
}
