//! Offline content source backed by a JSON export.
//!
//! ```json
//! {
//!   "settings": { "title": "...", "description": [...] },
//!   "posts": [ { "_id": "...", "title": "...", "slug": "salad", ... } ],
//!   "pages": [ ... ],
//!   "sitemap": [ { "_type": "post", "slug": "salad", "_updatedAt": "..." } ]
//! }
//! ```
//!
//! Every key is optional. Without an explicit `sitemap` array the items are
//! derived from the pages and posts in the file.

use super::backend::{ContentSource, SourceError};
use crate::content::{Page, Post, Settings, SitemapItem};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk export format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Export {
    pub settings: Option<Settings>,
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<Vec<SitemapItem>>,
}

impl Export {
    /// Sitemap items: the explicit list, or one per slugged page and post.
    pub fn sitemap_items(&self) -> Vec<SitemapItem> {
        if let Some(items) = &self.sitemap {
            return items.clone();
        }
        let pages = self.pages.iter().filter_map(|p| {
            p.slug()
                .map(|slug| SitemapItem::new("page", slug, p.updated_at.as_deref()))
        });
        let posts = self.posts.iter().filter_map(|p| {
            p.slug()
                .map(|slug| SitemapItem::new("post", slug, p.updated_at.as_deref()))
        });
        pages.chain(posts).collect()
    }
}

pub struct FileSource {
    path: PathBuf,
    export: Export,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path)?;
        let export: Export = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            posts = export.posts.len(),
            pages = export.pages.len(),
            "loaded content export"
        );
        Ok(Self {
            path: path.to_path_buf(),
            export,
        })
    }

    pub fn from_export(export: Export) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            export,
        }
    }
}

impl ContentSource for FileSource {
    fn settings(&self) -> Result<Settings, SourceError> {
        Ok(self.export.settings.clone().unwrap_or_default())
    }

    fn posts(&self) -> Result<Vec<Post>, SourceError> {
        Ok(self.export.posts.clone())
    }

    fn pages(&self) -> Result<Vec<Page>, SourceError> {
        Ok(self.export.pages.clone())
    }

    fn sitemap_items(&self) -> Result<Vec<SitemapItem>, SourceError> {
        Ok(self.export.sitemap_items())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{
        "settings": {"title": "Body Metrics"},
        "posts": [
            {"_id": "p1", "title": "Салат", "slug": "salad", "_updatedAt": "2024-01-01"},
            {"_id": "p2", "title": "Без адреса"}
        ],
        "pages": [
            {"_id": "g1", "title": "О нас", "slug": "about"}
        ]
    }"#;

    fn write_export(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("export.json");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn open_reads_documents() {
        let (_tmp, path) = write_export(EXPORT);
        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.settings().unwrap().title.as_deref(), Some("Body Metrics"));
        assert_eq!(source.posts().unwrap().len(), 2);
        assert_eq!(source.pages().unwrap().len(), 1);
        assert!(source.describe().contains("export.json"));
    }

    #[test]
    fn sitemap_derived_from_documents() {
        let (_tmp, path) = write_export(EXPORT);
        let items = FileSource::open(&path).unwrap().sitemap_items().unwrap();
        assert_eq!(
            items,
            vec![
                SitemapItem::new("page", "about", None),
                SitemapItem::new("post", "salad", Some("2024-01-01")),
            ]
        );
    }

    #[test]
    fn explicit_sitemap_wins() {
        let export = Export {
            sitemap: Some(vec![SitemapItem::new("comment", "c1", None)]),
            ..Default::default()
        };
        let items = FileSource::from_export(export).sitemap_items().unwrap();
        assert_eq!(items, vec![SitemapItem::new("comment", "c1", None)]);
    }

    #[test]
    fn empty_object_is_valid() {
        let (_tmp, path) = write_export("{}");
        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.settings().unwrap(), Settings::default());
        assert!(source.posts().unwrap().is_empty());
        assert!(source.sitemap_items().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FileSource::open(Path::new("/nonexistent/export.json"));
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let (_tmp, path) = write_export("[1, 2");
        assert!(matches!(FileSource::open(&path), Err(SourceError::Json(_))));
    }
}
