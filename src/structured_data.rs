//! Schema.org JSON-LD builder.
//!
//! Produces the minimal schema.org shapes embedded in page `<head>`s as
//! `<script type="application/ld+json">`. Every shape shares a common core
//! (`name`, `description`, `url`, `image`, `inLanguage`, dates); the schema
//! type adds its own properties on top. Missing optional values fall back
//! to the base URL, the stock social image and the build time.

use crate::content::Post;
use crate::sitemap::timestamp;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

const SCHEMA_CONTEXT: &str = "https://schema.org";
const LANGUAGE: &str = "ru-RU";
const DEFAULT_CATEGORY: &str = "Healthy";
const CUISINE: &str = "Russian";
const LOGO_SIZE: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaType {
    #[default]
    WebSite,
    Article,
    Recipe,
    Organization,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebSite => "WebSite",
            Self::Article => "Article",
            Self::Recipe => "Recipe",
            Self::Organization => "Organization",
        }
    }
}

/// Site-wide values shared by every schema on a build.
#[derive(Debug, Clone)]
pub struct SchemaContext {
    /// Normalized base URL, no trailing slash.
    pub base_url: String,
    /// Stands in for missing publish/modify dates.
    pub now: DateTime<Utc>,
    /// Article publisher when the input names none.
    pub publisher: String,
    /// Organization social profiles.
    pub same_as: Vec<String>,
}

impl SchemaContext {
    fn favicon(&self) -> String {
        format!("{}/favicon.ico", self.base_url)
    }

    fn fallback_image(&self) -> String {
        format!("{}/images/og-image.jpg", self.base_url)
    }
}

/// Numeric recipe facts rendered into the Recipe shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFacts {
    pub servings: Option<u32>,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    pub calories: Option<u32>,
}

impl RecipeFacts {
    pub fn from_post(post: &Post) -> Self {
        Self {
            servings: post.servings,
            prep_minutes: post.prep_time,
            cook_minutes: post.cook_time,
            calories: post.calories,
        }
    }

    fn total_minutes(&self) -> Option<u32> {
        match (self.prep_minutes, self.cook_minutes) {
            (Some(prep), Some(cook)) => prep.checked_add(cook),
            _ => None,
        }
    }
}

/// Display fields for one schema object.
#[derive(Debug, Clone, Default)]
pub struct SchemaInput {
    pub schema_type: SchemaType,
    pub title: String,
    pub description: String,
    /// Canonical URL; the base URL when empty.
    pub url: String,
    pub image: Option<String>,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    /// Overrides [`SchemaContext::publisher`]. An empty string omits it.
    pub publisher: Option<String>,
    pub recipe: Option<RecipeFacts>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn person(name: &str) -> Value {
    json!({ "@type": "Person", "name": name })
}

/// Build the JSON-LD object for `input`.
pub fn build(input: &SchemaInput, ctx: &SchemaContext) -> Value {
    let now = timestamp(ctx.now);
    let mut data = Map::new();
    data.insert("@context".into(), json!(SCHEMA_CONTEXT));
    data.insert("@type".into(), json!(input.schema_type.as_str()));
    data.insert("name".into(), json!(input.title));
    data.insert("description".into(), json!(input.description));
    data.insert(
        "url".into(),
        json!(non_empty(Some(input.url.as_str())).unwrap_or(ctx.base_url.as_str())),
    );
    data.insert(
        "image".into(),
        json!(
            non_empty(input.image.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| ctx.fallback_image())
        ),
    );
    data.insert("inLanguage".into(), json!(LANGUAGE));
    data.insert(
        "datePublished".into(),
        json!(non_empty(input.published_time.as_deref()).unwrap_or(now.as_str())),
    );
    data.insert(
        "dateModified".into(),
        json!(non_empty(input.modified_time.as_deref()).unwrap_or(now.as_str())),
    );

    let author = non_empty(input.author.as_deref());
    let category = non_empty(input.category.as_deref());

    match input.schema_type {
        SchemaType::WebSite => {
            data.insert(
                "potentialAction".into(),
                json!({
                    "@type": "SearchAction",
                    "target": {
                        "@type": "EntryPoint",
                        "urlTemplate": format!("{}/search?q={{search_term_string}}", ctx.base_url),
                    },
                    "query-input": "required name=search_term_string",
                }),
            );
        }
        SchemaType::Article => {
            if let Some(name) = author {
                data.insert("author".into(), person(name));
            }
            let publisher = input.publisher.as_deref().unwrap_or(&ctx.publisher);
            if !publisher.is_empty() {
                data.insert(
                    "publisher".into(),
                    json!({
                        "@type": "Organization",
                        "name": publisher,
                        "logo": {
                            "@type": "ImageObject",
                            "url": ctx.favicon(),
                            "width": LOGO_SIZE,
                            "height": LOGO_SIZE,
                        },
                    }),
                );
            }
            if let Some(section) = category {
                data.insert("articleSection".into(), json!(section));
            }
            if !input.tags.is_empty() {
                data.insert("keywords".into(), json!(input.tags.join(", ")));
            }
        }
        SchemaType::Recipe => {
            data.insert(
                "recipeCategory".into(),
                json!(category.unwrap_or(DEFAULT_CATEGORY)),
            );
            data.insert("recipeCuisine".into(), json!(CUISINE));
            if let Some(name) = author {
                data.insert("author".into(), person(name));
            }
            if let Some(facts) = &input.recipe {
                insert_recipe_facts(&mut data, facts);
            }
        }
        SchemaType::Organization => {
            data.insert("logo".into(), json!(ctx.favicon()));
            data.insert("sameAs".into(), json!(ctx.same_as));
        }
    }

    Value::Object(data)
}

fn insert_recipe_facts(data: &mut Map<String, Value>, facts: &RecipeFacts) {
    if let Some(servings) = facts.servings {
        data.insert("recipeYield".into(), json!(servings.to_string()));
    }
    let durations = [
        ("prepTime", facts.prep_minutes),
        ("cookTime", facts.cook_minutes),
        ("totalTime", facts.total_minutes()),
    ];
    for (key, minutes) in durations {
        if let Some(m) = minutes {
            data.insert(key.into(), json!(format!("PT{m}M")));
        }
    }
    if let Some(calories) = facts.calories {
        data.insert(
            "nutrition".into(),
            json!({
                "@type": "NutritionInformation",
                "calories": format!("{calories} calories"),
            }),
        );
    }
}

/// Pretty-printed JSON safe for an inline `<script>` element.
pub fn to_json_ld(value: &Value) -> String {
    // Value serialization cannot fail: keys are always strings.
    serde_json::to_string_pretty(value)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

/// Home page WebSite object.
pub fn website_schema(ctx: &SchemaContext, title: &str, description: &str) -> Value {
    build(
        &SchemaInput {
            schema_type: SchemaType::WebSite,
            title: title.to_string(),
            description: description.to_string(),
            url: ctx.base_url.clone(),
            ..Default::default()
        },
        ctx,
    )
}

/// Publisher Organization object.
pub fn organization_schema(ctx: &SchemaContext, name: &str, description: &str) -> Value {
    build(
        &SchemaInput {
            schema_type: SchemaType::Organization,
            title: name.to_string(),
            description: description.to_string(),
            url: ctx.base_url.clone(),
            ..Default::default()
        },
        ctx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixed_now;

    fn ctx() -> SchemaContext {
        SchemaContext {
            base_url: "https://bodymetrics.ru".to_string(),
            now: fixed_now(),
            publisher: "Body Metrics".to_string(),
            same_as: vec![
                "https://t.me/bodymetrics".to_string(),
                "https://vk.com/bodymetrics".to_string(),
            ],
        }
    }

    fn input(schema_type: SchemaType) -> SchemaInput {
        SchemaInput {
            schema_type,
            title: "Салат".to_string(),
            description: "Лёгкий салат".to_string(),
            url: "https://bodymetrics.ru/posts/salad".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn common_fields_with_defaults() {
        let value = build(&input(SchemaType::Article), &ctx());
        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "Article");
        assert_eq!(value["name"], "Салат");
        assert_eq!(value["description"], "Лёгкий салат");
        assert_eq!(value["url"], "https://bodymetrics.ru/posts/salad");
        assert_eq!(value["image"], "https://bodymetrics.ru/images/og-image.jpg");
        assert_eq!(value["inLanguage"], "ru-RU");
        assert_eq!(value["datePublished"], "2025-01-15T12:00:00.000Z");
        assert_eq!(value["dateModified"], "2025-01-15T12:00:00.000Z");
    }

    #[test]
    fn empty_url_falls_back_to_base() {
        let mut i = input(SchemaType::WebSite);
        i.url.clear();
        assert_eq!(build(&i, &ctx())["url"], "https://bodymetrics.ru");
    }

    #[test]
    fn explicit_dates_and_image_kept() {
        let mut i = input(SchemaType::Article);
        i.image = Some("https://cdn.sanity.io/x.jpg".to_string());
        i.published_time = Some("2024-01-01".to_string());
        i.modified_time = Some("2024-02-01".to_string());
        let value = build(&i, &ctx());
        assert_eq!(value["image"], "https://cdn.sanity.io/x.jpg");
        assert_eq!(value["datePublished"], "2024-01-01");
        assert_eq!(value["dateModified"], "2024-02-01");
    }

    #[test]
    fn website_has_search_action() {
        let value = build(&input(SchemaType::WebSite), &ctx());
        let action = &value["potentialAction"];
        assert_eq!(action["@type"], "SearchAction");
        assert_eq!(
            action["target"]["urlTemplate"],
            "https://bodymetrics.ru/search?q={search_term_string}"
        );
        assert_eq!(action["query-input"], "required name=search_term_string");
    }

    #[test]
    fn article_fields() {
        let mut i = input(SchemaType::Article);
        i.author = Some("Анна".to_string());
        i.category = Some("Обед".to_string());
        i.tags = vec!["салат".to_string(), "овощи".to_string()];
        let value = build(&i, &ctx());

        assert_eq!(value["author"]["@type"], "Person");
        assert_eq!(value["author"]["name"], "Анна");
        assert_eq!(value["publisher"]["name"], "Body Metrics");
        assert_eq!(value["publisher"]["logo"]["url"], "https://bodymetrics.ru/favicon.ico");
        assert_eq!(value["publisher"]["logo"]["width"], 64);
        assert_eq!(value["articleSection"], "Обед");
        assert_eq!(value["keywords"], "салат, овощи");
    }

    #[test]
    fn article_without_optionals() {
        let value = build(&input(SchemaType::Article), &ctx());
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("author"));
        assert!(!obj.contains_key("articleSection"));
        assert!(!obj.contains_key("keywords"));
        assert!(obj.contains_key("publisher"));
    }

    #[test]
    fn article_publisher_override_and_removal() {
        let mut i = input(SchemaType::Article);
        i.publisher = Some("Другой".to_string());
        assert_eq!(build(&i, &ctx())["publisher"]["name"], "Другой");

        i.publisher = Some(String::new());
        assert!(build(&i, &ctx()).get("publisher").is_none());
    }

    #[test]
    fn recipe_without_author_has_cuisine_and_no_author() {
        let value = build(&input(SchemaType::Recipe), &ctx());
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("author"));
        assert_eq!(value["recipeCuisine"], "Russian");
        assert_eq!(value["recipeCategory"], "Healthy");
    }

    #[test]
    fn recipe_with_author_and_category() {
        let mut i = input(SchemaType::Recipe);
        i.author = Some("Анна".to_string());
        i.category = Some("Завтрак".to_string());
        let value = build(&i, &ctx());
        assert_eq!(value["author"]["name"], "Анна");
        assert_eq!(value["recipeCategory"], "Завтрак");
        assert_eq!(value["recipeCuisine"], "Russian");
    }

    #[test]
    fn recipe_facts() {
        let mut i = input(SchemaType::Recipe);
        i.recipe = Some(RecipeFacts {
            servings: Some(2),
            prep_minutes: Some(10),
            cook_minutes: Some(15),
            calories: Some(320),
        });
        let value = build(&i, &ctx());
        assert_eq!(value["recipeYield"], "2");
        assert_eq!(value["prepTime"], "PT10M");
        assert_eq!(value["cookTime"], "PT15M");
        assert_eq!(value["totalTime"], "PT25M");
        assert_eq!(value["nutrition"]["calories"], "320 calories");
    }

    #[test]
    fn recipe_facts_partial() {
        let mut i = input(SchemaType::Recipe);
        i.recipe = Some(RecipeFacts {
            prep_minutes: Some(10),
            ..Default::default()
        });
        let value = build(&i, &ctx());
        let obj = value.as_object().unwrap();
        assert_eq!(value["prepTime"], "PT10M");
        assert!(!obj.contains_key("totalTime"));
        assert!(!obj.contains_key("nutrition"));
    }

    #[test]
    fn recipe_total_time_overflow_is_omitted() {
        let mut i = input(SchemaType::Recipe);
        i.recipe = Some(RecipeFacts {
            prep_minutes: Some(u32::MAX),
            cook_minutes: Some(1),
            ..Default::default()
        });
        let value = build(&i, &ctx());
        assert_eq!(value["cookTime"], "PT1M");
        assert!(!value.as_object().unwrap().contains_key("totalTime"));
    }

    #[test]
    fn organization_logo_and_links() {
        let value = organization_schema(&ctx(), "Body Metrics", "desc");
        assert_eq!(value["@type"], "Organization");
        assert_eq!(value["logo"], "https://bodymetrics.ru/favicon.ico");
        assert_eq!(value["sameAs"][0], "https://t.me/bodymetrics");
        assert_eq!(value["sameAs"][1], "https://vk.com/bodymetrics");
        assert_eq!(value["url"], "https://bodymetrics.ru");
    }

    #[test]
    fn website_preset() {
        let value = website_schema(&ctx(), "Body Metrics", "desc");
        assert_eq!(value["@type"], "WebSite");
        assert_eq!(value["name"], "Body Metrics");
    }

    #[test]
    fn json_ld_is_pretty_and_script_safe() {
        let mut i = input(SchemaType::Article);
        i.description = "</script><script>alert(1)".to_string();
        let out = to_json_ld(&build(&i, &ctx()));
        assert!(out.contains('\n'));
        assert!(!out.contains("</script>"));
        assert!(out.contains("<\\/script>"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["description"], "</script><script>alert(1)");
    }
}
