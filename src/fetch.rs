//! Content fetching and manifest generation.
//!
//! Stage 1 of the build pipeline. Pulls every document the site needs from
//! a [`ContentSource`] and freezes it, together with the resolved config,
//! into a [`Manifest`] that the generate stage consumes.
//!
//! ## Output
//!
//! ```text
//! .bodymetrics-temp/manifest.json
//! {
//!   "fetched_at": "2025-01-15T12:00:00.000Z",
//!   "draft_mode": false,
//!   "source": "Sanity abc123/production (published)",
//!   "settings": { ... },
//!   "posts": [ ... ],
//!   "pages": [ ... ],
//!   "sitemap": [ ... ],
//!   "config": { ... }
//! }
//! ```
//!
//! ## Validation
//!
//! - No two posts share a slug
//! - No two pages share a slug, and no page takes a built-in route
//!   (`food`, `posts`, `profile`) or a generated file name (`sitemap.xml`, ...)
//! - Every slug is a single path segment: no `/`, `\`, `..` or leading `.`
//!
//! Posts without a slug are kept (they still feed the home slider) but get
//! no page of their own.

use crate::config::{self, SiteConfig};
use crate::content::{Page, Post, Settings, SitemapItem};
use crate::sitemap::timestamp;
use crate::source::{ContentSource, SourceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

/// Top-level paths the generate stage writes itself.
pub const RESERVED_SLUGS: &[&str] = &[
    "food",
    "posts",
    "profile",
    "index.html",
    "sitemap.xml",
    "robots.txt",
    "manifest.json",
];

/// Whether `slug` can be used as one directory name under the output root.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
        && !slug.chars().any(char::is_control)
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Content source error: {0}")]
    Source(#[from] SourceError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Duplicate {kind} slug: {slug}")]
    DuplicateSlug { kind: &'static str, slug: String },
    #[error("Unsafe {kind} slug {slug:?}: slugs must be a single path segment")]
    UnsafeSlug { kind: &'static str, slug: String },
}

/// Manifest output from the fetch stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// RFC 3339 build timestamp; stands in for missing CMS dates.
    pub fetched_at: String,
    pub draft_mode: bool,
    /// Where the content came from, for CLI output.
    pub source: String,
    pub settings: Settings,
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    pub sitemap: Vec<SitemapItem>,
    pub config: SiteConfig,
}

impl Manifest {
    /// The fetch timestamp, or `None` if the manifest was edited by hand into
    /// something unparsable.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.fetched_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Posts that get their own page.
    pub fn routable_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.slug().is_some())
    }
}

pub fn fetch(
    source: &dyn ContentSource,
    config: &SiteConfig,
    draft_mode: bool,
    now: DateTime<Utc>,
) -> Result<Manifest, FetchError> {
    config.validate()?;
    info!(source = %source.describe(), draft_mode, "fetching content");

    let settings = source.settings()?;
    let posts = source.posts()?;
    let pages = source.pages()?;
    let sitemap = source.sitemap_items()?;

    check_safe("post", posts.iter().filter_map(Post::slug))?;
    check_safe("page", pages.iter().filter_map(Page::slug))?;
    check_unique("post", posts.iter().filter_map(Post::slug), &[])?;
    check_unique("page", pages.iter().filter_map(Page::slug), RESERVED_SLUGS)?;

    for post in posts.iter().filter(|p| p.slug().is_none()) {
        warn!(id = %post.id, title = %post.title, "post has no slug, no page will be generated");
    }

    Ok(Manifest {
        fetched_at: timestamp(now),
        draft_mode,
        source: source.describe(),
        settings,
        posts,
        pages,
        sitemap,
        config: config.clone(),
    })
}

fn check_safe<'a>(kind: &'static str, mut slugs: impl Iterator<Item = &'a str>) -> Result<(), FetchError> {
    match slugs.find(|slug| !is_safe_slug(slug)) {
        Some(slug) => Err(FetchError::UnsafeSlug {
            kind,
            slug: slug.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_unique<'a>(
    kind: &'static str,
    slugs: impl Iterator<Item = &'a str>,
    reserved: &[&str],
) -> Result<(), FetchError> {
    let mut seen: HashSet<&str> = reserved.iter().copied().collect();
    for slug in slugs {
        if !seen.insert(slug) {
            return Err(FetchError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}
