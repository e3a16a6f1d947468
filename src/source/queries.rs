//! GROQ queries sent to the CMS.
//!
//! Projections rename CMS fields to the shapes in [`crate::content`]
//! (`slug.current` → `slug`, resolved asset URLs, author names).

pub const SETTINGS_QUERY: &str = r#"*[_type == "settings"][0]{
  title,
  description,
  "ogImage": ogImage{ "url": asset->url, alt, metadataBase }
}"#;

pub const POSTS_QUERY: &str = r#"*[_type == "post" && defined(slug.current)] | order(date desc, _updatedAt desc) {
  _id,
  "title": coalesce(title, "Untitled"),
  "slug": slug.current,
  coverImage,
  imageUrl,
  category,
  servings,
  prepTime,
  cookTime,
  difficulty,
  calories,
  excerpt,
  "date": coalesce(date, _updatedAt),
  _updatedAt,
  "author": coalesce(author->firstName + " " + author->lastName, author->name),
  content,
  tags
}"#;

pub const PAGES_QUERY: &str = r#"*[_type == "page" && defined(slug.current)]{
  _id,
  "title": coalesce(name, title, "Untitled"),
  "slug": slug.current,
  heading,
  subheading,
  body,
  _updatedAt
}"#;

pub const SITEMAP_QUERY: &str = r#"*[_type == "page" || _type == "post" && defined(slug.current)] | order(_type asc) {
  "slug": slug.current,
  _type,
  _updatedAt
}"#;
