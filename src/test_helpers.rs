//! Shared test utilities for the bodymetrics-site test suite.
//!
//! Provides document builders, a fixed clock and the fixture manifest.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = sample_manifest();
//! let oatmeal = find_post(&manifest, "oatmeal");
//! assert_eq!(oatmeal.category.as_deref(), Some("Завтрак"));
//! ```

use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{Page, Post};
use crate::fetch::{self, Manifest};
use crate::portable_text::{Block, Span};
use crate::source::FileSource;

// =========================================================================
// Clock
// =========================================================================

/// 2025-01-15T12:00:00Z, used wherever a build time is needed.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

// =========================================================================
// Document builders
// =========================================================================

/// A single normal-style Portable Text block.
pub fn text_block(text: &str) -> Block {
    Block {
        kind: "block".to_string(),
        style: Some("normal".to_string()),
        children: vec![Span {
            kind: "span".to_string(),
            text: text.to_string(),
            marks: Vec::new(),
        }],
        ..Default::default()
    }
}

/// A plain (non-recipe) post with a slug.
pub fn post(id: &str, slug: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        slug: Some(slug.to_string()),
        cover_image: None,
        image_url: None,
        category: None,
        servings: None,
        prep_time: None,
        cook_time: None,
        difficulty: None,
        calories: None,
        excerpt: None,
        date: None,
        updated_at: None,
        author: None,
        content: vec![text_block("Текст публикации.")],
        tags: Vec::new(),
    }
}

/// A recipe post without a slug, for grouping tests.
pub fn recipe(id: &str, category: Option<&str>, calories: Option<u32>) -> Post {
    Post {
        title: format!("Recipe {id}"),
        slug: None,
        category: category.map(str::to_string),
        calories,
        ..post(id, "")
    }
}

pub fn page(id: &str, slug: &str) -> Page {
    Page {
        id: id.to_string(),
        title: format!("Page {slug}"),
        slug: Some(slug.to_string()),
        heading: None,
        subheading: None,
        body: vec![text_block("Текст страницы.")],
        updated_at: None,
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// Path to `fixtures/export.json`.
pub fn fixture_export_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/export.json")
}

/// The fixture export fetched with stock config at [`fixed_now`].
pub fn sample_manifest() -> Manifest {
    let source = FileSource::open(&fixture_export_path()).unwrap();
    fetch::fetch(&source, &SiteConfig::default(), false, fixed_now()).unwrap()
}

// =========================================================================
// Manifest lookups: panics with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug() == Some(slug))
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.posts.iter().filter_map(Post::slug).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}
