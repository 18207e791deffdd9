pub mod report;

use serde::Serialize;

use crate::pagination::PaginationControls;
use crate::post::Post;
use crate::runner::ContentSource;
use crate::view::PageState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub route: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_posts: u64,
    pub source: Option<ContentSource>,
    pub error: Option<String>,
    pub posts: Vec<Post>,
    pub pagination: PaginationControls,
}

pub fn build_report(state: &PageState, route: &str) -> PageReport {
    PageReport {
        route: route.to_string(),
        current_page: state.current_page,
        total_pages: state.total_pages,
        total_posts: state.total_posts,
        source: state.source.clone(),
        error: state.error.clone(),
        posts: state.posts.clone(),
        pagination: state.controls(),
    }
}

pub fn pagination_line(controls: &PaginationControls) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(if controls.prev_disabled { "(prev)" } else { "prev" }.to_string());
    for token in controls.tokens.iter() {
        if controls.is_current(*token) {
            parts.push(format!("[{token}]"));
        } else {
            parts.push(token.to_string());
        }
    }
    parts.push(if controls.next_disabled { "(next)" } else { "next" }.to_string());
    parts.join(" ")
}

pub fn render_text(report: &PageReport) -> Vec<u8> {
    let mut out = String::new();
    if let Some(error) = report.error.as_deref() {
        out.push_str(&format!("error: {error}\n"));
        out.push_str("Try Again\n");
        return out.into_bytes();
    }
    for p in report.posts.iter() {
        out.push_str(&format!(
            "{} | {} | {} | {} | {}\n",
            p.title,
            p.date,
            p.author,
            p.categories.join(", "),
            p.read_time
        ));
        out.push_str(&format!("  {}\n", p.excerpt));
        out.push_str(&format!("  {}\n", p.original_url));
    }
    out.push_str(&pagination_line(&report.pagination));
    out.push('\n');
    out.into_bytes()
}

pub fn render_json(report: &PageReport) -> Vec<u8> {
    serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(report: &PageReport) -> Vec<u8> {
    report::render_html(report)
}

pub fn render(format: OutputFormat, report: &PageReport) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
        OutputFormat::Html => render_html(report),
    }
}
