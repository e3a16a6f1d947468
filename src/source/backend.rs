//! Content source trait and shared error type.

use crate::content::{Page, Post, Settings, SitemapItem};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CMS returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CMS URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("cms.project_id is not set (set it in site.toml or SANITY_PROJECT_ID)")]
    MissingProjectId,
    #[error("draft mode needs a read token in ${0}")]
    MissingToken(String),
}

/// Read-only access to the CMS documents a build needs.
///
/// One call per document kind; implementations do no caching or retries.
pub trait ContentSource {
    /// The singleton settings document. Missing settings are not an error.
    fn settings(&self) -> Result<Settings, SourceError>;

    /// All posts, newest first.
    fn posts(&self) -> Result<Vec<Post>, SourceError>;

    /// All standalone pages.
    fn pages(&self) -> Result<Vec<Page>, SourceError>;

    /// `{_type, slug, _updatedAt}` for every published document.
    fn sitemap_items(&self) -> Result<Vec<SitemapItem>, SourceError>;

    /// Short human-readable description for logs and CLI output.
    fn describe(&self) -> String;
}
