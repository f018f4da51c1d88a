use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, warn};

use crate::{fallback_payload, ContentFetcher, FetchConfig, FetchError};

/// Blocking HTTP GET with the fallback payload on any failure.
///
/// One bounded request per call: no retries, no caching. The client is built
/// once in [`new`](Self::new) and reused, so connection pooling still applies
/// across calls.
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: Client,
    cfg: FetchConfig,
}

impl HttpContentFetcher {
    /// Validates `cfg` and builds the underlying client.
    pub fn new(cfg: FetchConfig) -> Result<Self, FetchError> {
        cfg.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, cfg })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.cfg
    }

    /// Performs the request and reports exactly why it failed.
    pub fn try_get(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Request(format!("failed to read body: {e}")))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}

impl ContentFetcher for HttpContentFetcher {
    fn get(&self, url: &str) -> String {
        let start = Instant::now();
        match self.try_get(url) {
            Ok(body) => {
                debug!(
                    url,
                    body_len = body.len(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "fetch_success"
                );
                body
            }
            Err(err) => {
                warn!(
                    url,
                    error = %err,
                    transient = err.is_transient(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "fetch_fallback"
                );
                fallback_payload().to_string()
            }
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl("empty url".into()));
    }
    let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl(format!("{trimmed}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme `{other}` in {trimmed}"
        ))),
    }
}
