//! # Body Metrics Site
//!
//! Static front-end for the Body Metrics health and nutrition site. Content
//! (recipes, articles, standalone pages, site settings) lives in the Sanity
//! headless CMS; this crate turns it into plain HTML with full SEO metadata.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Content goes through two independent stages that communicate through a
//! JSON manifest:
//!
//! ```text
//! 1. Fetch     Sanity / export.json  →  manifest.json   (CMS → structured data)
//! 2. Generate  manifest.json         →  dist/           (final HTML site)
//! ```
//!
//! The manifest is human-readable and self-contained: it carries the resolved
//! config and the fetch timestamp, so regenerating from it is reproducible and
//! the whole render path is testable without the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | Stage 1: queries a content source, validates slugs, produces the manifest |
//! | [`generate`] | Stage 2: renders pages, sitemap, robots.txt and web app manifest using Maud |
//! | [`source`] | Content sources: Sanity HTTP API and JSON export files |
//! | [`content`] | CMS document types (`Post`, `Page`, `Settings`, `SitemapItem`) |
//! | [`portable_text`] | Sanity rich text to HTML and plain text |
//! | [`image_ref`] | Sanity image asset references to CDN URLs |
//! | [`ranking`] | Category grouping and calorie ranking for the home slider |
//! | [`seo`] | Site metadata resolution and `<head>` rendering |
//! | [`structured_data`] | schema.org JSON-LD builder |
//! | [`sitemap`] | Sitemap entries and XML serialization |
//! | [`analytics`] | Yandex Metrika counter snippet |
//! | [`config`] | `site.toml` loading, validation, env overrides and CSS generation |
//! | [`output`] | CLI output formatting of pipeline results |
//!
//! # Design Decisions
//!
//! ## Static Output
//!
//! Every route is rendered ahead of time. The result is a directory of HTML
//! files that any file server or CDN can host; a rebuild picks up CMS edits.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error, template variables are Rust
//! expressions, and interpolation is auto-escaped.
//!
//! ## Fallbacks Instead of Failures
//!
//! CMS documents are edited by people. A missing title, description, image or
//! date never fails the build: settings fall back to `[site]` config, images to
//! the stock Open Graph image, dates to the fetch time. Only conflicting slugs
//! are errors, since they would overwrite each other's pages.
//!
//! ## Draft Previews
//!
//! `--drafts` queries the drafts perspective with a read token and marks every
//! generated page `noindex`, so a preview deployment is never indexed.

pub mod analytics;
pub mod config;
pub mod content;
pub mod fetch;
pub mod generate;
pub mod image_ref;
pub mod output;
pub mod portable_text;
pub mod ranking;
pub mod seo;
pub mod sitemap;
pub mod source;
pub mod structured_data;

#[cfg(test)]
pub(crate) mod test_helpers;
