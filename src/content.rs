//! CMS document types shared by the fetch and generate stages.
//!
//! Field names follow the CMS's JSON (camelCase, `_id`, `_type`,
//! `_updatedAt`), so the same types deserialize query results, file exports
//! and the intermediate `manifest.json`. Everything the CMS may omit is an
//! `Option` or defaults to empty; nothing here is ever mutated after fetch.

use crate::image_ref::ImageRef;
use crate::portable_text::Block;
use serde::{Deserialize, Deserializer, Serialize};

/// A blog post or recipe.
///
/// Recipe posts are ordinary posts that carry a `category` and the numeric
/// recipe fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<ImageRef>,
    /// Direct image URL, used when the cover image has no asset reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-text category label ("Завтрак", "Обед", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub servings: Option<u32>,
    /// Minutes.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub prep_time: Option<u32>,
    /// Minutes.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub cook_time: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_difficulty",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Publication date as provided by the CMS (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        rename = "_updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Block>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Post {
    /// Calorie count with missing values treated as zero.
    pub fn calories_or_zero(&self) -> u32 {
        self.calories.unwrap_or(0)
    }

    /// Non-empty category label, if any.
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Non-empty slug, if any.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }

    /// Total time in minutes, only when both prep and cook time are known.
    pub fn total_time(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (Some(prep), Some(cook)) if prep > 0 && cook > 0 => prep.checked_add(cook),
            _ => None,
        }
    }

    /// Whether the post carries any recipe data and should be described as a
    /// schema.org Recipe rather than an Article.
    pub fn is_recipe(&self) -> bool {
        self.category_label().is_some()
            || self.calories.is_some()
            || self.servings.is_some()
            || self.prep_time.is_some()
            || self.cook_time.is_some()
    }

    /// Site-relative URL of the post page, if it has a slug.
    pub fn path(&self) -> Option<String> {
        self.slug().map(|s| format!("/posts/{s}/"))
    }
}

/// Recipe difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Легко",
            Self::Medium => "Средне",
            Self::Hard => "Сложно",
        }
    }
}

/// Unknown difficulty strings become `None` instead of failing the document.
fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Difficulty::parse))
}

/// CMS number fields are untyped: fractions are rounded, while negatives,
/// non-numbers and values past `u32::MAX` become `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(f64::round)
        .filter(|n| *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

/// A standalone CMS page ("about", "contacts", ...), served at `/{slug}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Block>,
    #[serde(
        rename = "_updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

impl Page {
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// The singleton settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Portable Text description.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<OgImage>,
}

/// Social preview image from the settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgImage {
    /// Resolved asset URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Site origin used for canonical links, when set in the CMS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_base: Option<String>,
}

/// Minimal `{_type, slug, _updatedAt}` record listing published documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapItem {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        rename = "_updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

impl SitemapItem {
    pub fn new(doc_type: &str, slug: &str, updated_at: Option<&str>) -> Self {
        Self {
            doc_type: Some(doc_type.to_string()),
            slug: Some(slug.to_string()),
            updated_at: updated_at.map(str::to_string),
        }
    }
}
