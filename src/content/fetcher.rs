//! Content fetching for posts whose body lives outside the data file

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SiteError};

/// Retrieves the raw text a post's `contentPath` points at
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<String>;
}

/// Reads content from the static asset directory
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    static_dir: PathBuf,
}

impl LocalFetcher {
    pub fn new<P: AsRef<Path>>(static_dir: P) -> Self {
        Self {
            static_dir: static_dir.as_ref().to_path_buf(),
        }
    }

    /// Resolve a site-relative path inside the static directory
    ///
    /// Paths may not climb out of the static root.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let relative = Path::new(reference.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(SiteError::fetch_failed(
                reference,
                "path escapes the static directory",
            ));
        }
        Ok(self.static_dir.join(relative))
    }
}

#[async_trait]
impl ContentFetcher for LocalFetcher {
    async fn fetch(&self, reference: &str) -> Result<String> {
        let path = self.resolve(reference)?;
        tracing::debug!("Reading content from {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SiteError::fetch_failed(reference, e))
    }
}

/// Fetches content with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpFetcher {
    /// Build the client; fails when the TLS backend cannot be initialised
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Absolute URL for a content reference
    pub fn url_for(&self, reference: &str) -> String {
        if is_absolute_url(reference) {
            return reference.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                reference.trim_start_matches('/')
            ),
            None => reference.to_string(),
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, reference: &str) -> Result<String> {
        let url = self.url_for(reference);
        tracing::debug!("Fetching content from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SiteError::fetch_failed(&url, e))?;
        let response = response
            .error_for_status()
            .map_err(|e| SiteError::fetch_failed(&url, e))?;
        response
            .text()
            .await
            .map_err(|e| SiteError::fetch_failed(&url, e))
    }
}

/// Routes each reference to the right fetcher
///
/// Absolute `http(s)` URLs always go over HTTP. Relative paths go over HTTP
/// when a content base URL is configured and are read from disk otherwise.
pub struct SiteFetcher {
    local: LocalFetcher,
    http: HttpFetcher,
    remote_by_default: bool,
}

impl SiteFetcher {
    pub fn new<P: AsRef<Path>>(
        static_dir: P,
        content_base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let remote_by_default = content_base_url.is_some();
        Ok(Self {
            local: LocalFetcher::new(static_dir),
            http: HttpFetcher::new(content_base_url, timeout)?,
            remote_by_default,
        })
    }
}

#[async_trait]
impl ContentFetcher for SiteFetcher {
    async fn fetch(&self, reference: &str) -> Result<String> {
        if self.remote_by_default || is_absolute_url(reference) {
            self.http.fetch(reference).await
        } else {
            self.local.fetch(reference).await
        }
    }
}

fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}
