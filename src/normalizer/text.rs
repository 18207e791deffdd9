use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::post::{EXCERPT_MAX_CHARS, EXCERPT_SUFFIX, WORDS_PER_MINUTE};

fn tag_re() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap())
}

// `&lt;` and `&gt;` stay encoded so decoded text can never reintroduce markup.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&hellip;", "…"),
    ("&#8230;", "…"),
    ("&#8211;", "–"),
    ("&#8212;", "—"),
    ("&#8216;", "‘"),
    ("&#8217;", "’"),
    ("&#8220;", "“"),
    ("&#8221;", "”"),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&#038;", "&"),
    ("&amp;", "&"),
];

pub fn decode_entities(input: &str) -> String {
    let mut out = input.to_string();
    for (entity, replacement) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// Removes every tag and any stray angle bracket, then collapses whitespace.
pub fn strip_markup(html: &str) -> String {
    let without_tags = tag_re().replace_all(html, "");
    let decoded = decode_entities(&without_tags);
    decoded
        .replace(['<', '>'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push_str(EXCERPT_SUFFIX);
    out
}

pub fn word_count(html: &str) -> usize {
    strip_markup(html).split_whitespace().count()
}

pub fn read_minutes(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn slugify(value: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Parses the timestamp shapes WordPress emits (`date` is local and has no
/// offset, `date_gmt` likewise, some proxies add one).
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_display_date(dt: &NaiveDateTime) -> String {
    dt.format("%B %-d, %Y").to_string()
}

pub fn display_date_or_now(raw: Option<&str>) -> String {
    let parsed = raw.and_then(parse_post_date);
    let dt = parsed.unwrap_or_else(|| Local::now().naive_local());
    format_display_date(&dt)
}
