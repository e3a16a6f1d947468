//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the fetched manifest and generates
//! the final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): "top dishes" category slider, then every post
//! - **Food** (`/food/index.html`): all recipes grouped by category
//! - **Posts** (`/posts/{slug}/index.html`): article or recipe with JSON-LD
//! - **Pages** (`/{slug}/index.html`): standalone CMS pages
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── food/index.html
//! ├── posts/
//! │   └── salad/index.html
//! ├── about/index.html
//! ├── sitemap.xml
//! ├── robots.txt
//! └── manifest.json             # Web app manifest
//! ```
//!
//! ## Draft Mode
//!
//! A manifest fetched with drafts gets a banner on every page, `noindex`
//! robots meta tags and a `Disallow: /` robots.txt, so preview deployments
//! never end up in search results.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time; color custom properties
//! from `[colors]` are prepended.

use crate::analytics;
use crate::config::{self, SiteConfig};
use crate::content::{Page, Post};
use crate::fetch::{self, Manifest};
use crate::image_ref::{self, ResolvedImage};
use crate::portable_text;
use crate::ranking::{self, CategoryGroup, RankLimits};
use crate::seo::{self, OgType, PageMeta, SiteMetadata};
use crate::sitemap;
use crate::structured_data::{self, RecipeFacts, SchemaContext, SchemaInput, SchemaType};
use chrono::{DateTime, NaiveDate, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

const SLIDER_HEADING: &str = "🍽️ Топ блюд по категориям";
const SLIDER_SUBHEADING: &str = "Лучшие рецепты по калорийности и популярности";
const DRAFT_BANNER: &str = "Режим предпросмотра: показаны неопубликованные черновики";

/// What kind of page a generated file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Food,
    Post,
    Page,
}

/// One written HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub kind: PageKind,
    /// Site-relative URL, e.g. `/posts/salad/`.
    pub path: String,
    pub title: String,
}

/// Summary of a generate run, for CLI output.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub draft_mode: bool,
    pub pages: Vec<GeneratedPage>,
    /// `(category, shown posts)` for each slider section on the home page.
    pub slider: Vec<(String, usize)>,
    pub sitemap_entries: usize,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// Site navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: String,
    pub path: String,
}

/// Read `manifest.json` and write the site into `output_dir`.
///
/// The manifest's fetch time stands in for missing CMS dates, so
/// regenerating from the same manifest produces identical output.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    let now = manifest.fetched_at().unwrap_or_else(Utc::now);
    generate_site(&manifest, output_dir, now)
}

/// Shared state for rendering every page of one build.
struct Renderer<'a> {
    manifest: &'a Manifest,
    config: &'a SiteConfig,
    site: SiteMetadata,
    schema: SchemaContext,
    navigation: Vec<NavItem>,
    css: String,
}

pub fn generate_site(
    manifest: &Manifest,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let site = SiteMetadata::resolve(&manifest.settings, config);
    let schema = SchemaContext {
        base_url: site.canonical_base().to_string(),
        now,
        publisher: config.seo.publisher.clone(),
        same_as: config.seo.same_as.clone(),
    };
    let color_css = config::generate_color_css(&config.colors);
    let renderer = Renderer {
        manifest,
        config,
        navigation: build_navigation(&manifest.pages),
        site,
        schema,
        css: format!("{}\n\n{}", color_css, CSS_STATIC),
    };

    if manifest.draft_mode {
        info!("generating in draft mode: noindex and preview banner enabled");
    }
    fs::create_dir_all(output_dir)?;

    let mut pages = Vec::new();

    let groups = ranking::rank_by_category_with(&manifest.posts, RankLimits::from(&config.home));
    let slider = groups
        .iter()
        .map(|g| (g.category.to_string(), g.posts.len()))
        .collect();
    write_page(output_dir, "", renderer.render_index(&groups))?;
    pages.push(GeneratedPage {
        kind: PageKind::Home,
        path: "/".to_string(),
        title: renderer.site.title.clone(),
    });

    write_page(output_dir, "food", renderer.render_food())?;
    pages.push(GeneratedPage {
        kind: PageKind::Food,
        path: "/food/".to_string(),
        title: "Рецепты".to_string(),
    });

    for post in &manifest.posts {
        let Some(slug) = post.slug() else {
            continue;
        };
        if !fetch::is_safe_slug(slug) {
            warn!(id = %post.id, slug, "skipping post with unsafe slug");
            continue;
        }
        write_page(output_dir, &format!("posts/{slug}"), renderer.render_post(post))?;
        pages.push(GeneratedPage {
            kind: PageKind::Post,
            path: format!("/posts/{slug}/"),
            title: post.title.clone(),
        });
    }

    for page in &manifest.pages {
        let Some(slug) = page.slug() else {
            continue;
        };
        if !fetch::is_safe_slug(slug) {
            warn!(id = %page.id, slug, "skipping page with unsafe slug");
            continue;
        }
        write_page(output_dir, slug, renderer.render_cms_page(page))?;
        pages.push(GeneratedPage {
            kind: PageKind::Page,
            path: format!("/{slug}/"),
            title: page.title.clone(),
        });
    }

    let base_url = config.base_url();
    let entries = sitemap::build_sitemap(&base_url, &manifest.sitemap, now);
    fs::write(output_dir.join("sitemap.xml"), sitemap::to_xml(&entries))?;
    fs::write(
        output_dir.join("robots.txt"),
        robots_txt(&base_url, manifest.draft_mode),
    )?;
    let web_manifest = serde_json::to_string_pretty(&web_app_manifest(&renderer.site, config))?;
    fs::write(output_dir.join("manifest.json"), web_manifest)?;

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        draft_mode: manifest.draft_mode,
        pages,
        slider,
        sitemap_entries: entries.len(),
    })
}

/// Write `{output_dir}/{rel_dir}/index.html`.
fn write_page(output_dir: &Path, rel_dir: &str, markup: Markup) -> Result<(), GenerateError> {
    let dir = if rel_dir.is_empty() {
        output_dir.to_path_buf()
    } else {
        output_dir.join(rel_dir)
    };
    fs::create_dir_all(&dir)?;
    let path = dir.join("index.html");
    fs::write(&path, markup.into_string())?;
    debug!(path = %path.display(), "wrote page");
    Ok(())
}

fn robots_txt(base_url: &str, draft_mode: bool) -> String {
    if draft_mode {
        "User-agent: *\nDisallow: /\n".to_string()
    } else {
        format!("User-agent: *\nAllow: /\n\nSitemap: {base_url}/sitemap.xml\n")
    }
}

fn web_app_manifest(site: &SiteMetadata, config: &SiteConfig) -> Value {
    json!({
        "name": site.title,
        "short_name": site.name,
        "description": site.description,
        "start_url": "/",
        "display": "standalone",
        "lang": site.language,
        "background_color": config.colors.background,
        "theme_color": site.theme_color,
        "icons": [
            { "src": "/favicon.ico", "sizes": "64x64", "type": "image/x-icon" }
        ],
    })
}

/// Home and food links, then one link per slugged CMS page.
fn build_navigation(pages: &[Page]) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            title: "Главная".to_string(),
            path: "/".to_string(),
        },
        NavItem {
            title: "Рецепты".to_string(),
            path: "/food/".to_string(),
        },
    ];
    items.extend(pages.iter().filter_map(|p| {
        p.slug().map(|slug| NavItem {
            title: p.title.clone(),
            path: format!("/{slug}/"),
        })
    }));
    items
}

/// Posts with a category, grouped by category in first-seen order.
fn group_in_order(posts: &[Post]) -> Vec<(&str, Vec<&Post>)> {
    let mut groups: Vec<(&str, Vec<&Post>)> = Vec::new();
    for post in posts {
        let Some(category) = post.category_label() else {
            continue;
        };
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, items)) => items.push(post),
            None => groups.push((category, vec![post])),
        }
    }
    groups
}

/// Human date (`01.03.2024`) for CMS date strings; unknown formats pass
/// through unchanged.
fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d.%m.%Y").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

impl Renderer<'_> {
    fn cover(&self, post: &Post) -> Option<ResolvedImage> {
        image_ref::resolve_cover(
            post.cover_image.as_ref(),
            post.image_url.as_deref(),
            &post.title,
            &self.config.cms.project_id,
            &self.config.cms.dataset,
        )
    }

    /// Renders the base HTML document structure
    fn base_document(
        &self,
        meta: &PageMeta,
        json_ld: &[Value],
        body_class: &str,
        content: Markup,
    ) -> Markup {
        let draft = self.manifest.draft_mode;
        html! {
            (DOCTYPE)
            html lang=(self.site.language) {
                head {
                    (seo::render_head(&self.site, meta, draft))
                    style { (PreEscaped(&self.css)) }
                    @for value in json_ld {
                        script type="application/ld+json" {
                            (PreEscaped(structured_data::to_json_ld(value)))
                        }
                    }
                }
                body class=(body_class) {
                    @if draft {
                        div.draft-banner role="status" { (DRAFT_BANNER) }
                    }
                    (self.site_header(&meta.path))
                    main.content {
                        (content)
                    }
                    footer.site-footer {
                        span { "© " (self.site.name) }
                    }
                    (analytics::render_yandex_metrika(&self.config.analytics))
                }
            }
        }
    }

    /// Renders the site header with brand link and navigation
    fn site_header(&self, current_path: &str) -> Markup {
        html! {
            header.site-header {
                a.brand href="/" { (self.site.name) }
                nav.site-nav {
                    (render_nav(&self.navigation, current_path))
                }
            }
        }
    }

    fn dish_card(&self, post: &Post) -> Markup {
        let card = html! {
            div.card-media {
                @match self.cover(post) {
                    Some(img) => {
                        (render_image(&img))
                    },
                    None => {
                        div.card-placeholder { "🍽️" }
                    },
                }
            }
            div.card-body {
                h3.card-title { (post.title) }
                div.badges {
                    @if let Some(category) = post.category_label() {
                        span.badge.badge-category { (category) }
                    }
                    @if let Some(calories) = post.calories.filter(|c| *c > 0) {
                        span.badge.badge-calories { (calories) " ккал" }
                    }
                    @if let Some(difficulty) = post.difficulty {
                        span.badge.badge-difficulty { (difficulty.label()) }
                    }
                }
                @if let Some(total) = post.total_time() {
                    div.card-time { "⏱️ " (total) " мин" }
                }
            }
        };
        // Cards open the post page (`/posts/{slug}/`), not a `/food/{slug}`
        // route: recipes are posts and only posts get pages and sitemap entries.
        html! {
            @match post.path() {
                Some(path) => {
                    a.dish-card href=(path) { (card) }
                },
                None => {
                    div.dish-card { (card) }
                },
            }
        }
    }

    fn render_slider(&self, groups: &[CategoryGroup<'_>]) -> Markup {
        html! {
            @if !groups.is_empty() {
                section.category-slider {
                    h1 { (SLIDER_HEADING) }
                    p.lead { (SLIDER_SUBHEADING) }
                    @for group in groups {
                        section.slider-section {
                            h2 {
                                "Топ " (group.posts.len()) " блюд в категории \"" (group.category) "\""
                            }
                            div.slider-track {
                                @for post in &group.posts {
                                    (self.dish_card(post))
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn post_list_item(&self, post: &Post) -> Markup {
        html! {
            article.post-item {
                @if let Some(path) = post.path() {
                    h3 { a href=(path) { (post.title) } }
                } @else {
                    h3 { (post.title) }
                }
                @if let Some(date) = &post.date {
                    time datetime=(date) { (format_date(date)) }
                }
                @if let Some(excerpt) = &post.excerpt {
                    p.excerpt { (excerpt) }
                }
            }
        }
    }

    // ========================================================================
    // Page Renderers
    // ========================================================================

    /// Renders the home page: slider, then every post
    fn render_index(&self, groups: &[CategoryGroup<'_>]) -> Markup {
        let meta = PageMeta {
            path: "/".to_string(),
            ..Default::default()
        };
        let json_ld = [
            structured_data::website_schema(&self.schema, &self.site.title, &self.site.description),
            structured_data::organization_schema(
                &self.schema,
                &self.site.name,
                &self.site.description,
            ),
        ];
        let content = html! {
            (self.render_slider(groups))
            section.all-posts {
                h2 { "Все публикации" }
                @if self.manifest.posts.is_empty() {
                    p.empty { "Публикаций пока нет." }
                }
                @for post in &self.manifest.posts {
                    (self.post_list_item(post))
                }
            }
        };
        self.base_document(&meta, &json_ld, "home-page", content)
    }

    /// Renders the recipe listing grouped by category
    fn render_food(&self) -> Markup {
        let groups = group_in_order(&self.manifest.posts);
        let meta = PageMeta {
            title: Some("Рецепты".to_string()),
            description: Some("Рецепты здоровых блюд по категориям с калорийностью и временем приготовления".to_string()),
            path: "/food/".to_string(),
            ..Default::default()
        };
        let content = html! {
            h1 { "Рецепты" }
            @if groups.is_empty() {
                p.empty { "Рецептов пока нет." }
            }
            @for (category, posts) in &groups {
                section.food-category {
                    h2 { (category) }
                    div.dish-grid {
                        @for post in posts {
                            (self.dish_card(post))
                        }
                    }
                }
            }
        };
        self.base_document(&meta, &[], "food-page", content)
    }

    /// Renders a post: recipe facts when present, then the body
    fn render_post(&self, post: &Post) -> Markup {
        let path = post.path().unwrap_or_default();
        let cover = self.cover(post);
        let description = post
            .excerpt
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| {
                let text = portable_text::to_plain_text(&post.content);
                (!text.is_empty()).then(|| text.chars().take(160).collect())
            });
        let is_recipe = post.is_recipe();

        let schema_input = SchemaInput {
            schema_type: if is_recipe {
                SchemaType::Recipe
            } else {
                SchemaType::Article
            },
            title: post.title.clone(),
            description: description.clone().unwrap_or_else(|| self.site.description.clone()),
            url: self.site.canonical_url(&path),
            image: cover.as_ref().map(|c| c.src.clone()),
            published_time: post.date.clone(),
            modified_time: post.updated_at.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            publisher: None,
            recipe: is_recipe.then(|| RecipeFacts::from_post(post)),
        };
        let meta = PageMeta {
            title: Some(post.title.clone()),
            description,
            path,
            og_type: OgType::Article,
            image: cover.as_ref().map(|c| c.src.clone()),
        };

        let content = html! {
            article.post {
                header.post-header {
                    h1 { (post.title) }
                    div.post-meta {
                        @if let Some(category) = post.category_label() {
                            span.badge.badge-category { (category) }
                        }
                        @if let Some(date) = &post.date {
                            time datetime=(date) { (format_date(date)) }
                        }
                        @if let Some(author) = &post.author {
                            span.author { (author) }
                        }
                    }
                }
                @if let Some(img) = &cover {
                    figure.post-cover { (render_image(img)) }
                }
                @if is_recipe {
                    (render_recipe_facts(post))
                }
                @if let Some(excerpt) = &post.excerpt {
                    p.lead { (excerpt) }
                }
                div.prose {
                    (portable_text::to_html(&post.content))
                }
                @if !post.tags.is_empty() {
                    ul.tags {
                        @for tag in &post.tags {
                            li { "#" (tag) }
                        }
                    }
                }
            }
        };
        let json_ld = [structured_data::build(&schema_input, &self.schema)];
        self.base_document(&meta, &json_ld, "post-page", content)
    }

    /// Renders a standalone CMS page
    fn render_cms_page(&self, page: &Page) -> Markup {
        let path = page.slug().map(|s| format!("/{s}/")).unwrap_or_default();
        let meta = PageMeta {
            title: Some(page.title.clone()),
            description: page.subheading.clone(),
            path,
            ..Default::default()
        };
        let content = html! {
            article.page {
                h1 { (page.heading.as_deref().unwrap_or(&page.title)) }
                @if let Some(sub) = &page.subheading {
                    p.lead { (sub) }
                }
                div.prose {
                    (portable_text::to_html(&page.body))
                }
            }
        };
        self.base_document(&meta, &[], "cms-page", content)
    }
}

/// Renders the navigation menu
pub fn render_nav(items: &[NavItem], current_path: &str) -> Markup {
    html! {
        ul {
            @for item in items {
                @let is_current = item.path == current_path;
                li class=[is_current.then_some("current")] {
                    a href=(item.path) { (item.title) }
                }
            }
        }
    }
}

fn render_image(img: &ResolvedImage) -> Markup {
    let (width, height) = match img.dimensions {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };
    html! {
        img src=(img.src) alt=(img.alt) width=[width] height=[height] loading="lazy";
    }
}

fn render_recipe_facts(post: &Post) -> Markup {
    html! {
        dl.recipe-facts {
            @if let Some(servings) = post.servings {
                dt { "Порции" } dd { (servings) }
            }
            @if let Some(prep) = post.prep_time {
                dt { "Подготовка" } dd { (prep) " мин" }
            }
            @if let Some(cook) = post.cook_time {
                dt { "Приготовление" } dd { (cook) " мин" }
            }
            @if let Some(total) = post.total_time() {
                dt { "Всего" } dd { "⏱️ " (total) " мин" }
            }
            @if let Some(calories) = post.calories {
                dt { "Калорийность" } dd { (calories) " ккал" }
            }
            @if let Some(difficulty) = post.difficulty {
                dt { "Сложность" } dd { (difficulty.label()) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Difficulty;
    use crate::test_helpers::{fixed_now, find_post, page, post, recipe, sample_manifest};
    use tempfile::TempDir;

    fn renderer(manifest: &Manifest) -> Renderer<'_> {
        let site = SiteMetadata::resolve(&manifest.settings, &manifest.config);
        Renderer {
            manifest,
            config: &manifest.config,
            schema: SchemaContext {
                base_url: site.canonical_base().to_string(),
                now: fixed_now(),
                publisher: "Body Metrics".to_string(),
                same_as: Vec::new(),
            },
            navigation: build_navigation(&manifest.pages),
            site,
            css: String::new(),
        }
    }

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join(rel)).unwrap()
    }

    #[test]
    fn generate_writes_expected_files() {
        let tmp = TempDir::new().unwrap();
        let manifest = sample_manifest();
        let report = generate_site(&manifest, tmp.path(), fixed_now()).unwrap();

        assert!(tmp.path().join("index.html").exists());
        assert!(tmp.path().join("food/index.html").exists());
        assert!(tmp.path().join("posts/oatmeal/index.html").exists());
        assert!(tmp.path().join("about/index.html").exists());
        assert!(tmp.path().join("sitemap.xml").exists());
        assert!(tmp.path().join("robots.txt").exists());
        assert!(tmp.path().join("manifest.json").exists());

        assert_eq!(report.count(PageKind::Home), 1);
        assert_eq!(report.count(PageKind::Food), 1);
        assert_eq!(report.count(PageKind::Post), manifest.routable_posts().count());
        assert_eq!(report.count(PageKind::Page), 1);
    }

    #[test]
    fn generate_reads_manifest_file() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("manifest.json");
        fs::write(
            &manifest_path,
            serde_json::to_string(&sample_manifest()).unwrap(),
        )
        .unwrap();
        let out = tmp.path().join("dist");
        let report = generate(&manifest_path, &out).unwrap();
        assert_eq!(report.output_dir, out);
        // fetched_at from the manifest is used for lastmod fallbacks
        assert!(read(&out, "sitemap.xml").contains("2025-01-15T12:00:00.000Z"));
    }

    #[test]
    fn home_page_has_slider_and_json_ld() {
        let tmp = TempDir::new().unwrap();
        let report = generate_site(&sample_manifest(), tmp.path(), fixed_now()).unwrap();
        let html = read(tmp.path(), "index.html");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(SLIDER_HEADING));
        assert!(html.contains("Топ 2 блюд в категории &quot;Завтрак&quot;"));
        assert!(html.contains(r#""@type": "WebSite""#));
        assert!(html.contains(r#""@type": "Organization""#));
        assert_eq!(report.slider[0], ("Завтрак".to_string(), 2));
    }

    #[test]
    fn slider_hidden_without_categories() {
        let mut manifest = sample_manifest();
        for p in &mut manifest.posts {
            p.category = None;
        }
        let html = renderer(&manifest).render_index(&[]).into_string();
        assert!(!html.contains(SLIDER_HEADING));
        assert!(html.contains("Все публикации"));
    }

    #[test]
    fn dish_card_badges() {
        let manifest = sample_manifest();
        let mut p = recipe("r1", Some("Обед"), Some(450));
        p.slug = Some("borsch".to_string());
        p.difficulty = Some(Difficulty::Medium);
        p.prep_time = Some(15);
        p.cook_time = Some(45);
        let html = renderer(&manifest).dish_card(&p).into_string();

        assert!(html.contains(r#"href="/posts/borsch/""#));
        assert!(html.contains("450 ккал"));
        assert!(html.contains("Средне"));
        assert!(html.contains("⏱️ 60 мин"));
        assert!(html.contains("card-placeholder"));
    }

    #[test]
    fn dish_card_time_needs_both_values() {
        let manifest = sample_manifest();
        let mut p = recipe("r1", Some("Обед"), None);
        p.prep_time = Some(15);
        let html = renderer(&manifest).dish_card(&p).into_string();
        assert!(!html.contains("⏱️"));
        assert!(!html.contains("ккал"));
        // no slug: card is not a link
        assert!(!html.contains("<a"));
    }

    #[test]
    fn dish_card_uses_image_url() {
        let manifest = sample_manifest();
        let mut p = recipe("r1", Some("Обед"), Some(1));
        p.image_url = Some("https://img.example/soup.jpg".to_string());
        let html = renderer(&manifest).dish_card(&p).into_string();
        assert!(html.contains(r#"src="https://img.example/soup.jpg""#));
    }

    #[test]
    fn recipe_post_has_recipe_schema() {
        let manifest = sample_manifest();
        let p = find_post(&manifest, "oatmeal");
        let html = renderer(&manifest).render_post(p).into_string();

        assert!(html.contains(r#""@type": "Recipe""#));
        assert!(html.contains(r#""recipeCuisine": "Russian""#));
        assert!(html.contains("recipe-facts"));
        assert!(html.contains("<title>Овсянка | Body Metrics</title>"));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
    }

    #[test]
    fn plain_post_has_article_schema() {
        let manifest = sample_manifest();
        let p = post("n1", "news");
        let html = renderer(&manifest).render_post(&p).into_string();
        assert!(html.contains(r#""@type": "Article""#));
        assert!(!html.contains("recipe-facts"));
    }

    #[test]
    fn cms_page_renders_body() {
        let manifest = sample_manifest();
        let mut about = page("g1", "about");
        about.heading = Some("О проекте".to_string());
        let html = renderer(&manifest).render_cms_page(&about).into_string();
        assert!(html.contains("<h1>О проекте</h1>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://bodymetrics.ru/about/">"#));
    }

    #[test]
    fn food_page_groups_in_input_order() {
        let posts = vec![
            recipe("1", Some("Обед"), Some(100)),
            recipe("2", Some("Завтрак"), Some(200)),
            recipe("3", Some("Обед"), Some(300)),
            recipe("4", None, Some(400)),
        ];
        let groups = group_in_order(&posts);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Обед");
        let ids: Vec<&str> = groups[0].1.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn draft_mode_banner_and_robots() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = sample_manifest();
        manifest.draft_mode = true;
        let report = generate_site(&manifest, tmp.path(), fixed_now()).unwrap();

        assert!(report.draft_mode);
        let html = read(tmp.path(), "index.html");
        assert!(html.contains("draft-banner"));
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
        assert_eq!(read(tmp.path(), "robots.txt"), "User-agent: *\nDisallow: /\n");
    }

    #[test]
    fn unsafe_slugs_in_manifest_are_not_written() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("a/dist");
        let mut manifest = sample_manifest();
        manifest.posts.push(post("evil-post", "../../escaped"));
        manifest.pages.push(page("evil-page", "../outside"));

        let report = generate_site(&manifest, &dist, fixed_now()).unwrap();

        assert!(!tmp.path().join("escaped").exists());
        assert!(!tmp.path().join("a/outside").exists());
        assert!(report.pages.iter().all(|p| !p.path.contains("..")));
        assert_eq!(report.count(PageKind::Page), 1);
    }

    #[test]
    fn robots_points_to_sitemap() {
        assert_eq!(
            robots_txt("https://bodymetrics.ru", false),
            "User-agent: *\nAllow: /\n\nSitemap: https://bodymetrics.ru/sitemap.xml\n"
        );
    }

    #[test]
    fn web_manifest_fields() {
        let tmp = TempDir::new().unwrap();
        generate_site(&sample_manifest(), tmp.path(), fixed_now()).unwrap();
        let value: Value = serde_json::from_str(&read(tmp.path(), "manifest.json")).unwrap();
        assert_eq!(value["short_name"], "Body Metrics");
        assert_eq!(value["theme_color"], "#00d4aa");
        assert_eq!(value["start_url"], "/");
    }

    #[test]
    fn analytics_tag_follows_config() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = sample_manifest();
        generate_site(&manifest, tmp.path(), fixed_now()).unwrap();
        assert!(read(tmp.path(), "index.html").contains("mc.yandex.ru/metrika/tag.js"));

        manifest.config.analytics.enabled = false;
        generate_site(&manifest, tmp.path(), fixed_now()).unwrap();
        assert!(!read(tmp.path(), "index.html").contains("mc.yandex.ru"));
    }

    #[test]
    fn navigation_includes_cms_pages() {
        let nav = build_navigation(&[page("g1", "about")]);
        let paths: Vec<&str> = nav.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/food/", "/about/"]);
    }

    #[test]
    fn nav_marks_current_item() {
        let nav = build_navigation(&[]);
        let html = render_nav(&nav, "/food/").into_string();
        assert!(html.contains(r#"<li class="current"><a href="/food/">"#));
    }

    #[test]
    fn css_includes_color_variables() {
        let tmp = TempDir::new().unwrap();
        generate_site(&sample_manifest(), tmp.path(), fixed_now()).unwrap();
        let html = read(tmp.path(), "index.html");
        assert!(html.contains("--color-accent: #00d4aa"));
    }

    #[test]
    fn format_date_variants() {
        assert_eq!(format_date("2024-03-01"), "01.03.2024");
        assert_eq!(format_date("2024-03-01T10:00:00Z"), "01.03.2024");
        assert_eq!(format_date("вчера"), "вчера");
    }

    #[test]
    fn html_escape_in_maud() {
        let manifest = sample_manifest();
        let p = post("x", "x");
        let mut p = Post {
            title: "<script>alert('x')</script>".to_string(),
            ..p
        };
        p.excerpt = Some("a & b".to_string());
        let html = renderer(&manifest).render_post(&p).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
