//! Category grouping for the home page "top dishes" slider.
//!
//! Posts are partitioned by their category label, each group is ranked by
//! calories (highest first) and cut to the top N, and the largest
//! categories are kept. Both sorts are stable, so ties keep the order the
//! CMS returned.
//!
//! ```text
//! [Завтрак 300, Завтрак 600, Обед 400]
//!   → [("Завтрак", [600, 300]), ("Обед", [400])]
//! ```

use crate::config::HomeConfig;
use crate::content::Post;
use std::collections::HashMap;

/// Default number of category sections.
pub const MAX_CATEGORIES: usize = 4;
/// Default number of posts per category.
pub const MAX_POSTS_PER_CATEGORY: usize = 10;

/// How much of the grouping to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimits {
    pub categories: usize,
    pub posts_per_category: usize,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            categories: MAX_CATEGORIES,
            posts_per_category: MAX_POSTS_PER_CATEGORY,
        }
    }
}

impl From<&HomeConfig> for RankLimits {
    fn from(home: &HomeConfig) -> Self {
        Self {
            categories: home.slider_categories,
            posts_per_category: home.slider_posts,
        }
    }
}

/// One slider section: a category label and its ranked posts.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub posts: Vec<&'a Post>,
    /// Group size before truncation (used for ordering).
    pub total: usize,
}

/// Group and rank with the default limits (4 categories × 10 posts).
pub fn rank_by_category(posts: &[Post]) -> Vec<CategoryGroup<'_>> {
    rank_by_category_with(posts, RankLimits::default())
}

/// Group posts by category and rank them.
///
/// - Posts without a (non-empty) category are left out.
/// - Within a group: calories descending, missing calories count as zero,
///   then the first `posts_per_category` are kept.
/// - Groups: original member count descending, first-seen order on ties,
///   then the first `categories` are kept.
pub fn rank_by_category_with(posts: &[Post], limits: RankLimits) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for post in posts {
        let Some(category) = post.category_label() else {
            continue;
        };
        let slot = *index.entry(category).or_insert_with(|| {
            groups.push(CategoryGroup {
                category,
                posts: Vec::new(),
                total: 0,
            });
            groups.len() - 1
        });
        groups[slot].posts.push(post);
    }

    for group in &mut groups {
        group.total = group.posts.len();
        group
            .posts
            .sort_by(|a, b| b.calories_or_zero().cmp(&a.calories_or_zero()));
        group.posts.truncate(limits.posts_per_category);
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(limits.categories);
    groups
}
