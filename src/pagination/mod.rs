use std::fmt;

use serde::Serialize;

use crate::post::PAGE_SIZE;

pub const ELLIPSIS: &str = "…";

const COMPACT_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(n) => serializer.serialize_u32(*n),
            PageToken::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{n}"),
            PageToken::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

pub fn page_tokens(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    use PageToken::{Ellipsis, Page};

    if total_pages <= COMPACT_LIMIT {
        return (1..=total_pages).map(Page).collect();
    }
    if current_page <= 3 {
        return vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total_pages)];
    }
    if current_page >= total_pages - 2 {
        let mut out = vec![Page(1), Ellipsis];
        out.extend((total_pages - 3..=total_pages).map(Page));
        return out;
    }
    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

pub fn total_pages_for(total_posts: u64) -> u32 {
    let pages = total_posts.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

pub fn is_navigable(page: u32, total_pages: u32) -> bool {
    page >= 1 && page <= total_pages
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub tokens: Vec<PageToken>,
}

impl PaginationControls {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
            prev_disabled: current_page <= 1,
            next_disabled: current_page >= total_pages,
            tokens: page_tokens(current_page, total_pages),
        }
    }

    pub fn is_current(&self, token: PageToken) -> bool {
        token == PageToken::Page(self.current_page)
    }
}
