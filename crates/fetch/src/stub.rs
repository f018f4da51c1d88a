use crate::{fallback_payload, ContentFetcher};

/// Never touches the network; every call yields [`fallback_payload`].
///
/// Used when fetching is disabled in config and for air-gapped runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl ContentFetcher for OfflineFetcher {
    fn get(&self, _url: &str) -> String {
        fallback_payload().to_string()
    }
}

/// Returns the same body for every URL.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    body: String,
}

impl StaticFetcher {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl ContentFetcher for StaticFetcher {
    fn get(&self, _url: &str) -> String {
        self.body.clone()
    }
}
