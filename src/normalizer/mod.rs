pub mod text;

use std::collections::HashMap;

use serde_json::Value;

use crate::pagination::total_pages_for;
use crate::post::{
    format_read_time, Post, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_EXCERPT, DEFAULT_TITLE,
    FALLBACK_IMAGE_URL, PAGE_SIZE,
};

const TOTAL_POSTS_HEADERS: &[&str] = &["x-wp-total", "x-total-count"];
const TOTAL_PAGES_HEADERS: &[&str] = &["x-wp-totalpages", "x-total-pages"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedTotals {
    pub total_posts: u64,
    pub total_pages: u32,
}

#[derive(Clone, Debug)]
pub struct NormalizedPage {
    pub posts: Vec<Post>,
    pub totals: FeedTotals,
}

#[derive(Clone, Copy, Debug)]
pub struct NormalizeContext<'a> {
    pub site_url: &'a str,
    pub page: u32,
}

fn header_number(headers: &HashMap<String, String>, names: &[&str]) -> Option<u64> {
    names
        .iter()
        .filter_map(|name| headers.get(*name))
        .find_map(|value| value.trim().parse::<u64>().ok())
}

pub fn totals_from_headers(
    headers: &HashMap<String, String>,
    page: u32,
    items_on_page: usize,
) -> FeedTotals {
    // An empty page says nothing about how many pages precede it.
    let derived_posts = if items_on_page == 0 {
        0
    } else {
        u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE) + items_on_page as u64
    };
    let total_posts = header_number(headers, TOTAL_POSTS_HEADERS).unwrap_or(derived_posts);
    let derived_pages = total_pages_for(total_posts);
    let header_pages = header_number(headers, TOTAL_PAGES_HEADERS)
        .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
        .unwrap_or(0);
    FeedTotals {
        total_posts,
        total_pages: header_pages.max(derived_pages),
    }
}

pub fn normalize_page(
    items: &[Value],
    headers: &HashMap<String, String>,
    ctx: NormalizeContext<'_>,
) -> NormalizedPage {
    let offset = u64::from(ctx.page.saturating_sub(1)) * u64::from(PAGE_SIZE);
    let posts = items
        .iter()
        .take(PAGE_SIZE as usize)
        .enumerate()
        .map(|(i, raw)| normalize_post(raw, offset + i as u64 + 1, ctx.site_url))
        .collect::<Vec<_>>();
    let totals = totals_from_headers(headers, ctx.page, items.len());
    NormalizedPage { posts, totals }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn str_at<'a>(raw: &'a Value, pointer: &str) -> Option<&'a str> {
    non_empty(raw.pointer(pointer).and_then(Value::as_str))
}

fn post_id(raw: &Value) -> Option<u64> {
    match raw.get("id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn categories(raw: &Value) -> Vec<String> {
    let names = raw
        .pointer("/_embedded/wp:term/0")
        .and_then(Value::as_array)
        .map(|terms| {
            terms
                .iter()
                .filter_map(|term| non_empty(term.get("name").and_then(Value::as_str)))
                .map(text::decode_entities)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if names.is_empty() {
        vec![DEFAULT_CATEGORY.to_string()]
    } else {
        names
    }
}

fn excerpt(raw: &Value) -> String {
    let plain = [str_at(raw, "/excerpt/rendered"), str_at(raw, "/content/rendered")]
        .into_iter()
        .flatten()
        .map(text::strip_markup)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_EXCERPT.to_string());
    text::truncate_excerpt(&plain)
}

fn fallback_url(site_url: &str, slug: &str, id: u64) -> String {
    let site = site_url.trim_end_matches('/');
    if slug.is_empty() {
        format!("{site}/?p={id}")
    } else {
        format!("{site}/blog/{slug}")
    }
}

pub fn normalize_post(raw: &Value, position: u64, site_url: &str) -> Post {
    let id = post_id(raw).unwrap_or(position);
    let title = str_at(raw, "/title/rendered")
        .map(text::strip_markup)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let slug = str_at(raw, "/slug")
        .map(str::to_string)
        .unwrap_or_else(|| text::slugify(&title));
    let featured_image = str_at(raw, "/_embedded/wp:featuredmedia/0/source_url")
        .unwrap_or(FALLBACK_IMAGE_URL)
        .to_string();
    let date = text::display_date_or_now(str_at(raw, "/date").or_else(|| str_at(raw, "/date_gmt")));
    let author = str_at(raw, "/author_name")
        .or_else(|| str_at(raw, "/_embedded/author/0/name"))
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string();
    let words = str_at(raw, "/content/rendered")
        .map(text::word_count)
        .unwrap_or(0);
    let original_url = str_at(raw, "/link")
        .map(str::to_string)
        .unwrap_or_else(|| fallback_url(site_url, &slug, id));

    Post {
        id,
        title,
        excerpt: excerpt(raw),
        slug,
        featured_image,
        date,
        author,
        categories: categories(raw),
        read_time: format_read_time(text::read_minutes(words)),
        original_url,
    }
}
