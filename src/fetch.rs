use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{
    assets::{Badge, decode::decode_badge},
    foundation::error::{BannerError, BannerResult},
};

pub const SHIELDS_BADGE_ENDPOINT: &str = "img.shields.io/badge/";
pub const RASTER_SUFFIX: &str = ".png";
pub const ACCEPT_IMAGES: &str = "image/png,image/*;q=0.9,*/*;q=0.8";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Characters of a non-image body kept in [`BannerError::ContentType`].
pub const SNIPPET_CHARS: usize = 200;

/// Source of raw badge image bytes.
pub trait BadgeFetcher {
    fn fetch(&self, url: &str) -> BannerResult<Vec<u8>>;
}

/// Rewrites a shields badge URL so it asks for PNG instead of SVG.
///
/// `.../badge/NAME-COLOR?style=x` becomes `.../badge/NAME-COLOR.png?style=x`. Other URLs and
/// URLs whose path already ends in `.png` are returned unchanged.
pub fn rasterize_url(url: &str) -> String {
    if !url.contains(SHIELDS_BADGE_ENDPOINT) {
        return url.to_string();
    }
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };
    if base.ends_with(RASTER_SUFFIX) {
        return url.to_string();
    }
    match query {
        Some(query) => format!("{base}{RASTER_SUFFIX}?{query}"),
        None => format!("{base}{RASTER_SUFFIX}"),
    }
}

/// Fails unless `content_type` names an image.
pub fn check_content_type(url: &str, content_type: Option<&str>, body: &[u8]) -> BannerResult<()> {
    let ctype = content_type.unwrap_or_default().to_ascii_lowercase();
    if ctype.contains("image") {
        return Ok(());
    }
    let snippet: String = String::from_utf8_lossy(body)
        .chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    Err(BannerError::ContentType {
        url: url.to_string(),
        content_type: ctype,
        snippet,
    })
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> BannerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("badge-banner/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl BadgeFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str) -> BannerResult<Vec<u8>> {
        let url = rasterize_url(url);

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, ACCEPT_IMAGES)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| BannerError::request(&url, e.to_string()))?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = resp
            .bytes()
            .map_err(|e| BannerError::request(&url, format!("read body: {e}")))?;

        check_content_type(&url, content_type.as_deref(), &body)?;
        tracing::debug!(bytes = body.len(), "fetched badge");
        Ok(body.to_vec())
    }
}

/// Fetches and decodes every URL in order. Failures are logged and skipped, so the result may
/// be shorter than `urls` (or empty).
pub fn fetch_badges<S: AsRef<str>>(fetcher: &dyn BadgeFetcher, urls: &[S]) -> Vec<Badge> {
    let mut badges = Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.as_ref();
        match fetcher.fetch(url).and_then(|bytes| decode_badge(&bytes)) {
            Ok(badge) => badges.push(badge),
            Err(err) => tracing::warn!(url, error = %err, "failed to fetch badge, skipping"),
        }
    }
    badges
}
