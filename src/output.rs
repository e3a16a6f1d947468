//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every document
//! (post, page) leads with its positional index and title; slugs, output
//! paths and warnings follow as indented context lines. The output reads as
//! a content inventory of what the CMS returned and what was written.
//!
//! # Output Format
//!
//! ## Fetch
//!
//! ```text
//! Source: Sanity abc123/production (published)
//! Fetched: 2025-01-15T12:00:00.000Z
//!
//! Posts
//! 001 Овсянка (Завтрак, 320 ккал)
//!     Slug: oatmeal
//!     Быстрый завтрак на каждый день.
//! 002 Салат без адреса (Ужин, 150 ккал)
//!     No slug: no page will be generated
//!
//! Pages
//! 001 О проекте
//!     Slug: about
//!
//! Sitemap
//!     5 documents
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//!     Slider: Завтрак (2), Обед (1)
//! Food → food/index.html
//!
//! Posts
//! 001 Овсянка → posts/oatmeal/index.html
//!
//! Pages
//! 001 О проекте → about/index.html
//!
//! Sitemap → sitemap.xml (8 entries)
//!
//! Generated 1 post, 1 page
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::content::Post;
use crate::fetch::Manifest;
use crate::generate::{GenerateReport, PageKind};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Post header: index, title and recipe details when present.
///
/// ```text
/// 001 Овсянка (Завтрак, 320 ккал)
/// 002 Сон и восстановление
/// ```
fn post_header(index: usize, post: &Post) -> String {
    let mut details = Vec::new();
    if let Some(category) = post.category_label() {
        details.push(category.to_string());
    }
    if let Some(calories) = post.calories {
        details.push(format!("{calories} ккал"));
    }
    if details.is_empty() {
        format!("{} {}", format_index(index), post.title)
    } else {
        format!("{} {} ({})", format_index(index), post.title, details.join(", "))
    }
}

/// Site-relative URL path to the written file, e.g. `/posts/salad/` →
/// `posts/salad/index.html`.
fn output_file(path: &str) -> String {
    format!("{}index.html", path.trim_start_matches('/'))
}

// ============================================================================
// Fetch
// ============================================================================

/// Format fetch stage output showing what the CMS returned.
pub fn format_fetch_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Source: {}", manifest.source));
    let draft = if manifest.draft_mode { " (drafts)" } else { "" };
    lines.push(format!("Fetched: {}{}", manifest.fetched_at, draft));

    lines.push(String::new());
    lines.push("Posts".to_string());
    if manifest.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        match post.slug() {
            Some(slug) => lines.push(format!("{}Slug: {}", indent(1), slug)),
            None => lines.push(format!("{}No slug: no page will be generated", indent(1))),
        }
        if let Some(excerpt) = post.excerpt.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            lines.push(format!("{}{}", indent(1), truncate_desc(excerpt, 60)));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page.title));
            if let Some(slug) = page.slug() {
                lines.push(format!("{}Slug: {}", indent(1), slug));
            }
        }
    }

    lines.push(String::new());
    lines.push("Sitemap".to_string());
    lines.push(format!(
        "{}{}",
        indent(1),
        plural(manifest.sitemap.len(), "document", "documents")
    ));

    lines
}

/// Print fetch output to stdout.
pub fn print_fetch_output(manifest: &Manifest) {
    for line in format_fetch_output(manifest) {
        println!("{}", line);
    }
}

/// One-line summary for `check`.
pub fn format_check_output(manifest: &Manifest) -> Vec<String> {
    let without_slug = manifest.posts.len() - manifest.routable_posts().count();
    let mut lines = vec![format!(
        "Content OK: {}, {}, {} in sitemap",
        plural(manifest.posts.len(), "post", "posts"),
        plural(manifest.pages.len(), "page", "pages"),
        plural(manifest.sitemap.len(), "document", "documents"),
    )];
    if without_slug > 0 {
        lines.push(format!(
            "{}{} without slug (no page)",
            indent(1),
            plural(without_slug, "post", "posts")
        ));
    }
    lines
}

pub fn print_check_output(manifest: &Manifest) {
    for line in format_check_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format generate stage output showing every written page.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Home → index.html".to_string());
    if !report.slider.is_empty() {
        let sections: Vec<String> = report
            .slider
            .iter()
            .map(|(category, n)| format!("{category} ({n})"))
            .collect();
        lines.push(format!("{}Slider: {}", indent(1), sections.join(", ")));
    }
    if report.count(PageKind::Food) > 0 {
        lines.push("Food → food/index.html".to_string());
    }

    for (kind, heading) in [(PageKind::Post, "Posts"), (PageKind::Page, "Pages")] {
        let pages: Vec<_> = report.pages.iter().filter(|p| p.kind == kind).collect();
        if pages.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(heading.to_string());
        for (i, page) in pages.iter().enumerate() {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                page.title,
                output_file(&page.path)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Sitemap → sitemap.xml ({})",
        plural(report.sitemap_entries, "entry", "entries")
    ));

    lines.push(String::new());
    let draft = if report.draft_mode { " (draft mode)" } else { "" };
    lines.push(format!(
        "Generated {}, {}{}",
        plural(report.count(PageKind::Post), "post", "posts"),
        plural(report.count(PageKind::Page), "page", "pages"),
        draft
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
