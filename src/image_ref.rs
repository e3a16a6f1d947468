//! Sanity image references.
//!
//! An image field in the CMS stores an asset reference of the form
//! `image-<assetId>-<width>x<height>-<format>`. Dimensions and the CDN URL
//! can be derived from the reference alone, so no extra query is needed to
//! render an `<img>` with correct `width`/`height` attributes.

use serde::{Deserialize, Serialize};

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// An image field as returned by the CMS (`{ asset: { _ref }, alt }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ImageRef {
    /// Parsed asset, when the reference is present and well formed.
    pub fn asset(&self) -> Option<ImageAsset> {
        self.asset
            .as_ref()
            .and_then(|a| a.reference.as_deref())
            .and_then(ImageAsset::parse)
    }
}

/// Decoded image asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl ImageAsset {
    /// Parse `image-<id>-<W>x<H>-<format>`.
    ///
    /// Returns `None` for anything else (file assets, truncated refs,
    /// non-numeric dimensions).
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next()?;
        let dims = parts.next()?;
        let id = parts.next()?;
        let (w, h) = dims.split_once('x')?;
        let width = w.parse().ok()?;
        let height = h.parse().ok()?;
        if id.is_empty() || format.is_empty() || width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            width,
            height,
            format: format.to_string(),
        })
    }

    /// CDN URL for this asset in the given project/dataset.
    pub fn url(&self, project_id: &str, dataset: &str) -> String {
        format!(
            "{CDN_BASE}/{project_id}/{dataset}/{}-{}x{}.{}",
            self.id, self.width, self.height, self.format
        )
    }
}

/// A cover image ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub src: String,
    /// Known only for CMS assets.
    pub dimensions: Option<(u32, u32)>,
    pub alt: String,
}

/// Resolve a post's cover image.
///
/// A CMS asset reference wins (and carries dimensions); otherwise the plain
/// `image_url` is used. `None` means the caller renders a placeholder.
pub fn resolve_cover(
    cover: Option<&ImageRef>,
    image_url: Option<&str>,
    fallback_alt: &str,
    project_id: &str,
    dataset: &str,
) -> Option<ResolvedImage> {
    let alt = cover
        .and_then(|c| c.alt.as_deref())
        .filter(|a| !a.is_empty())
        .unwrap_or(fallback_alt)
        .to_string();

    if !project_id.is_empty() {
        if let Some(asset) = cover.and_then(ImageRef::asset) {
            return Some(ResolvedImage {
                src: asset.url(project_id, dataset),
                dimensions: Some((asset.width, asset.height)),
                alt,
            });
        }
    }

    image_url
        .filter(|u| !u.is_empty())
        .map(|src| ResolvedImage {
            src: src.to_string(),
            dimensions: None,
            alt,
        })
}
