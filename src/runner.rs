use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fallback;
use crate::normalizer::{self, FeedTotals, NormalizeContext};
use crate::post::Post;
use crate::prober::{self, EndpointCandidate, ProbeError};

pub const DEFAULT_SITE_URL: &str = "https://postmanoil.com";
pub const DEFAULT_TIMEOUT_SECONDS: usize = 10;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; recipe-feed/0.3; +https://postmanoil.com)";

#[derive(Clone, Debug)]
pub struct Options {
    pub site_url: String,
    pub prefixes: Vec<String>,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub header: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            prefixes: prober::DEFAULT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            proxy: None,
            header: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid site URL: {url}")]
    InvalidSiteUrl { url: String },

    #[error("no endpoint prefixes configured")]
    NoPrefixes,

    #[error("invalid timeout {value}, expected positive number of seconds")]
    InvalidTimeout { value: usize },

    #[error("invalid header '{header}', expected 'Key: Value'")]
    InvalidHeader { header: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentSource {
    Live { endpoint: String },
    Fallback { reason: String },
}

#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub page: u32,
    pub posts: Vec<Post>,
    pub totals: FeedTotals,
    pub source: ContentSource,
}

impl FetchedPage {
    pub fn fallback(page: u32, reason: impl Into<String>) -> Self {
        Self {
            page,
            posts: fallback::fallback_page(page),
            totals: fallback::fallback_totals(),
            source: ContentSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ContentSource::Fallback { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    client: reqwest::Client,
    candidates: Vec<EndpointCandidate>,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, FeedError> {
        if reqwest::Url::parse(options.site_url.trim()).is_err() {
            return Err(FeedError::InvalidSiteUrl {
                url: options.site_url.clone(),
            });
        }
        if options.prefixes.is_empty() {
            return Err(FeedError::NoPrefixes);
        }
        if options.timeout_seconds == 0 {
            return Err(FeedError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        let client = build_client(
            options.proxy.as_deref(),
            options.header.as_deref(),
            options.timeout_seconds,
        )?;
        let candidates = prober::build_candidates(&options.prefixes);
        Ok(Self {
            options,
            client,
            candidates,
        })
    }

    pub fn candidates(&self) -> &[EndpointCandidate] {
        &self.candidates
    }

    pub async fn fetch_page(&self, page: u32) -> Result<FetchedPage, FeedError> {
        let hit = prober::probe(
            &self.client,
            &self.options.site_url,
            &self.candidates,
            page,
        )
        .await?;
        debug!(
            url = %hit.url,
            attempts = hit.attempts,
            duration_ms = hit.duration_ms as u64,
            "normalizing page"
        );
        let normalized = normalizer::normalize_page(
            &hit.items,
            &hit.headers,
            NormalizeContext {
                site_url: &self.options.site_url,
                page,
            },
        );
        Ok(FetchedPage {
            page,
            posts: normalized.posts,
            totals: normalized.totals,
            source: ContentSource::Live { endpoint: hit.url },
        })
    }

    pub async fn fetch_page_or_fallback(&self, page: u32) -> FetchedPage {
        match self.fetch_page(page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(page, error = %e, "serving placeholder recipes");
                FetchedPage::fallback(page, e.to_string())
            }
        }
    }
}

pub fn parse_header(
    raw: &str,
) -> Result<(reqwest::header::HeaderName, reqwest::header::HeaderValue), FeedError> {
    let invalid = || FeedError::InvalidHeader {
        header: raw.to_string(),
    };
    let (key, value) = raw.split_once(':').ok_or_else(invalid)?;
    let key = reqwest::header::HeaderName::from_str(key.trim()).map_err(|_| invalid())?;
    let value = reqwest::header::HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((key, value))
}

fn build_client(
    proxy: Option<&str>,
    header: Option<&str>,
    timeout_seconds: usize,
) -> Result<reqwest::Client, FeedError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    if let Some(raw) = header.filter(|h| !h.trim().is_empty()) {
        let (key, value) = parse_header(raw)?;
        headers.append(key, value);
    }

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| FeedError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FeedError::HttpClientBuild { source: e })
}
