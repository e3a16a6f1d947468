//! End-to-end build from the fixture export: fetch → manifest file → generate.

use bodymetrics_site::config::SiteConfig;
use bodymetrics_site::fetch::{self, Manifest};
use bodymetrics_site::generate::{self, PageKind};
use bodymetrics_site::source::FileSource;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/export.json")
}

fn fetch_fixture(draft_mode: bool) -> Manifest {
    let source = FileSource::open(&fixture()).unwrap();
    fetch::fetch(&source, &SiteConfig::default(), draft_mode, now()).unwrap()
}

/// Write the manifest the way the CLI does, then generate from the file.
fn build(draft_mode: bool) -> (TempDir, generate::GenerateReport) {
    let tmp = TempDir::new().unwrap();
    let manifest_path = tmp.path().join("manifest.json");
    let json = serde_json::to_string_pretty(&fetch_fixture(draft_mode)).unwrap();
    fs::write(&manifest_path, json).unwrap();
    let report = generate::generate(&manifest_path, &tmp.path().join("dist")).unwrap();
    (tmp, report)
}

fn read(tmp: &TempDir, rel: &str) -> String {
    fs::read_to_string(tmp.path().join("dist").join(rel)).unwrap()
}

/// Pull every JSON-LD block out of a page.
fn json_ld_blocks(html: &str) -> Vec<Value> {
    let open = r#"<script type="application/ld+json">"#;
    html.split(open)
        .skip(1)
        .map(|rest| {
            let end = rest.find("</script>").unwrap();
            serde_json::from_str(&rest[..end]).unwrap()
        })
        .collect()
}

#[test]
fn manifest_survives_the_file_round_trip() {
    let manifest = fetch_fixture(false);
    let json = serde_json::to_string(&manifest).unwrap();
    let back: Manifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, manifest);
    assert_eq!(back.fetched_at(), Some(now()));
}

#[test]
fn writes_every_route() {
    let (tmp, report) = build(false);
    let dist = tmp.path().join("dist");

    for rel in [
        "index.html",
        "food/index.html",
        "posts/oatmeal/index.html",
        "posts/syrniki/index.html",
        "posts/borsch/index.html",
        "posts/healthy-sleep/index.html",
        "about/index.html",
        "sitemap.xml",
        "robots.txt",
        "manifest.json",
    ] {
        assert!(dist.join(rel).exists(), "missing {rel}");
    }
    assert!(!dist.join("profile").exists());

    assert_eq!(report.count(PageKind::Post), 4);
    assert_eq!(report.count(PageKind::Page), 1);
}

#[test]
fn slider_ranks_categories_by_size() {
    let (tmp, report) = build(false);
    assert_eq!(
        report.slider,
        vec![
            ("Завтрак".to_string(), 2),
            ("Обед".to_string(), 1),
            ("Ужин".to_string(), 1),
        ]
    );

    let html = read(&tmp, "index.html");
    // Higher calories first within a category.
    let syrniki = html.find(r#"href="/posts/syrniki/""#).unwrap();
    let oatmeal = html.find(r#"href="/posts/oatmeal/""#).unwrap();
    assert!(syrniki < oatmeal);
    // The unslugged salad is shown but not linked.
    assert!(html.contains("Салат без адреса"));
}

#[test]
fn sitemap_lists_static_and_document_routes() {
    let (tmp, report) = build(false);
    let xml = read(&tmp, "sitemap.xml");

    assert_eq!(report.sitemap_entries, 8);
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains("<loc>https://bodymetrics.ru</loc>"));
    assert!(xml.contains("<loc>https://bodymetrics.ru/food</loc>"));
    assert!(xml.contains("<loc>https://bodymetrics.ru/profile</loc>"));
    assert!(xml.contains("<loc>https://bodymetrics.ru/about</loc>"));
    assert!(xml.contains("<loc>https://bodymetrics.ru/posts/oatmeal</loc>"));
    assert!(xml.contains("<lastmod>2024-03-02T08:30:00Z</lastmod>"));
    // Borsch has no _updatedAt: falls back to the fetch time.
    assert!(xml.contains("<lastmod>2025-01-15T12:00:00.000Z</lastmod>"));
    assert!(!xml.contains("<loc>https://bodymetrics.ru/posts/</loc>"));
}

#[test]
fn recipe_page_carries_recipe_json_ld() {
    let (tmp, _) = build(false);
    let html = read(&tmp, "posts/oatmeal/index.html");
    let blocks = json_ld_blocks(&html);

    assert_eq!(blocks.len(), 1);
    let recipe = &blocks[0];
    assert_eq!(recipe["@context"], "https://schema.org");
    assert_eq!(recipe["@type"], "Recipe");
    assert_eq!(recipe["name"], "Овсянка");
    assert_eq!(recipe["recipeCategory"], "Завтрак");
    assert_eq!(recipe["prepTime"], "PT5M");
    assert_eq!(recipe["cookTime"], "PT10M");
    assert_eq!(recipe["totalTime"], "PT15M");
    assert_eq!(recipe["nutrition"]["calories"], "320 calories");
    assert_eq!(recipe["url"], "https://bodymetrics.ru/posts/oatmeal/");
}

#[test]
fn article_page_carries_article_json_ld() {
    let (tmp, _) = build(false);
    let html = read(&tmp, "posts/healthy-sleep/index.html");
    let blocks = json_ld_blocks(&html);

    assert_eq!(blocks[0]["@type"], "Article");
    assert_eq!(blocks[0]["datePublished"], "2024-04-05T07:00:00Z");
    assert!(html.contains(r#"<a href="https://bodymetrics.ru/food/">рецептов</a>"#));
}

#[test]
fn home_page_has_website_and_organization() {
    let (tmp, _) = build(false);
    let html = read(&tmp, "index.html");
    let types: Vec<String> = json_ld_blocks(&html)
        .iter()
        .map(|v| v["@type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["WebSite", "Organization"]);
    assert!(html.contains("<title>Body Metrics</title>"));
}

#[test]
fn draft_build_is_not_indexable() {
    let (tmp, report) = build(true);
    assert!(report.draft_mode);
    assert_eq!(read(&tmp, "robots.txt"), "User-agent: *\nDisallow: /\n");
    for rel in ["index.html", "posts/oatmeal/index.html", "about/index.html"] {
        let html = read(&tmp, rel);
        assert!(html.contains(r#"content="noindex, nofollow""#), "{rel} is indexable");
    }
}
