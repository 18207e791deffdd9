use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::post::PAGE_SIZE;

pub const POSTS_ROUTE: &str = "/wp-json/wp/v2/posts";

pub const DEFAULT_PREFIXES: &[&str] = &["", "/blog"];

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no endpoint answered with a success status ({attempted} tried)")]
    NotFound { attempted: usize },

    #[error("response from {url} is not a JSON array of posts: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointCandidate {
    pub prefix: String,
    pub embed: bool,
}

impl EndpointCandidate {
    pub fn url(&self, site_url: &str, page: u32) -> Option<reqwest::Url> {
        let site = site_url.trim().trim_end_matches('/');
        let prefix = self.prefix.trim().trim_end_matches('/');
        let prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        let mut url = reqwest::Url::parse(&format!("{site}{prefix}{POSTS_ROUTE}")).ok()?;
        if url.cannot_be_a_base() {
            return None;
        }
        {
            let mut query = url.query_pairs_mut();
            if self.embed {
                query.append_pair("_embed", "1");
            }
            query.append_pair("per_page", &PAGE_SIZE.to_string());
            query.append_pair("page", &page.to_string());
        }
        Some(url)
    }
}

pub fn build_candidates<S: AsRef<str>>(prefixes: &[S]) -> Vec<EndpointCandidate> {
    let mut out = Vec::with_capacity(prefixes.len() * 2);
    for prefix in prefixes {
        for embed in [true, false] {
            let candidate = EndpointCandidate {
                prefix: prefix.as_ref().trim().to_string(),
                embed,
            };
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out
}

pub fn default_candidates() -> Vec<EndpointCandidate> {
    build_candidates(DEFAULT_PREFIXES)
}

#[derive(Clone, Debug)]
pub struct ProbeHit {
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub items: Vec<Value>,
    pub attempts: usize,
    pub duration_ms: u128,
}

pub fn header_map_to_hashmap(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (k, v) in headers.iter() {
        if let Ok(v) = v.to_str() {
            out.insert(k.as_str().to_lowercase(), v.to_string());
        }
    }
    out
}

/// Returns the first candidate answering 2xx.
pub async fn probe(
    client: &reqwest::Client,
    site_url: &str,
    candidates: &[EndpointCandidate],
    page: u32,
) -> Result<ProbeHit, ProbeError> {
    let started = Instant::now();
    for (attempt, candidate) in candidates.iter().enumerate() {
        let url = match candidate.url(site_url, page) {
            Some(url) => url,
            None => {
                debug!(prefix = %candidate.prefix, "skipping candidate with unbuildable url");
                continue;
            }
        };
        let url_str = url.to_string();
        let resp = match client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url = %url_str, error = %e, "candidate request failed");
                continue;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            debug!(url = %url_str, status = status.as_u16(), "candidate rejected");
            continue;
        }

        let headers = header_map_to_hashmap(resp.headers());
        let items = resp
            .json::<Vec<Value>>()
            .await
            .map_err(|e| ProbeError::InvalidBody {
                url: url_str.clone(),
                source: e,
            })?;
        info!(url = %url_str, status = status.as_u16(), items = items.len(), "endpoint answered");
        return Ok(ProbeHit {
            url: url_str,
            status: status.as_u16(),
            headers,
            items,
            attempts: attempt + 1,
            duration_ms: started.elapsed().as_millis(),
        });
    }
    Err(ProbeError::NotFound {
        attempted: candidates.len(),
    })
}
