use serde::Serialize;

pub const PAGE_SIZE: u32 = 9;

pub const EXCERPT_MAX_CHARS: usize = 150;

pub const EXCERPT_SUFFIX: &str = "...";

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_AUTHOR: &str = "Postman Oil Team";
pub const DEFAULT_CATEGORY: &str = "Recipes";
pub const DEFAULT_EXCERPT: &str =
    "A delicious recipe prepared with Postman Oil. Read the full recipe for ingredients and method.";
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=800&q=80";

pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub slug: String,
    pub featured_image: String,
    pub date: String,
    pub author: String,
    pub categories: Vec<String>,
    pub read_time: String,
    pub original_url: String,
}

impl Post {
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(|c| c.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn satisfies_invariants(&self) -> bool {
        let excerpt_len = self.excerpt.chars().count();
        !self.categories.is_empty()
            && !self.excerpt.contains('<')
            && !self.excerpt.contains('>')
            && excerpt_len <= EXCERPT_MAX_CHARS + EXCERPT_SUFFIX.len()
            && !self.featured_image.is_empty()
            && self.read_time.ends_with(" min read")
    }
}

pub fn format_read_time(minutes: usize) -> String {
    format!("{} min read", minutes.max(1))
}
