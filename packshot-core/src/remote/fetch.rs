use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::foundation::error::{PackshotError, PackshotResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("packshot/", env!("CARGO_PKG_VERSION"));
const MAX_BODY_BYTES: u64 = 50 * 1024 * 1024;

/// Source of remote bytes. The pipelines only depend on this trait so tests
/// can substitute an in-memory fetcher.
pub trait ResourceFetcher: Send + Sync {
    fn fetch_bytes(&self, url: &str) -> PackshotResult<Vec<u8>>;
}

/// Blocking HTTP fetcher over a `ureq` agent.
///
/// HTTP statuses are inspected manually rather than surfaced as transport
/// errors, so callers can tell a 404 (expected skip) from everything else.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> PackshotResult<Vec<u8>> {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build();
        let agent: ureq::Agent = config.into();

        let mut response = agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| PackshotError::fetch_transport(url, e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(PackshotError::fetch_status(url, status));
        }

        response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| PackshotError::fetch_transport(url, e.to_string()))
    }
}

/// Fetch a URL and deserialize its JSON body.
pub fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    url: &str,
) -> PackshotResult<T> {
    let bytes = fetcher.fetch_bytes(url)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| PackshotError::decode(format!("json from {url}: {e}")))
}

/// Fetch each endpoint's JSON array and concatenate the results in endpoint
/// order. Any failure here is batch-fatal and propagates.
pub fn fetch_merged<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    urls: &[String],
) -> PackshotResult<Vec<T>> {
    let mut merged = Vec::new();
    for url in urls {
        merged.extend(fetch_json::<Vec<T>>(fetcher, url)?);
    }
    Ok(merged)
}
