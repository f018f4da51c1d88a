//! Workspace umbrella crate for chatcanon.
//!
//! This crate wires a [`ContentFetcher`] into chat-record normalization so
//! callers can turn raw capture records into canonical [`Message`]s with a
//! single API entry point, one at a time or in batches.

pub mod config;

pub use config::{
    ChatCanonConfig, ConfigLoadError, FetchYamlConfig, LoggingYamlConfig, PipelineYamlConfig,
};
pub use fetch::{
    fallback_payload, ContentFetcher, FetchConfig, FetchError, HttpContentFetcher,
    OfflineFetcher, StaticFetcher, FALLBACK_DATADESCS,
};
pub use normalize::{
    extract_title, format_duration, normalize, CanonicalKind, Message, Normalized, TransportTag,
    CHAT_HISTORY_DEFAULT, CONTENT_SHARING_DEFAULT, MINI_PROGRAM_DEFAULT, PAYMENT_LINK_TEXT,
    PICTURE_TEXT, STICKER_TEXT, VOICE_CALL_DEFAULT, VOICE_DEFAULT,
};

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while building a [`Pipeline`].
///
/// Normalizing records never fails; only set-up does.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("configuration failure: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("fetcher construction failed: {0}")]
    Fetcher(#[from] FetchError),
}

/// One line of a capture export.
///
/// `type` is the transport tag; `message` may be null or missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub raw_type: String,
    #[serde(default)]
    pub chat_time: Option<DateTime<Utc>>,
}

/// Metrics observer for normalized records.
pub trait NormalizeMetrics: Send + Sync {
    fn record_normalize(&self, latency: Duration, tag: &TransportTag, kind: &CanonicalKind);
}

/// Install or clear the global normalize metrics recorder.
pub fn set_normalize_metrics(recorder: Option<Arc<dyn NormalizeMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn NormalizeMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn NormalizeMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn NormalizeMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn NormalizeMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record(self, raw_type: &str, kind: &CanonicalKind) {
        let tag = TransportTag::parse(raw_type);
        self.recorder
            .record_normalize(self.start.elapsed(), &tag, kind);
    }
}

/// Normalization with a shared fetcher.
///
/// Cheap to clone; clones share the fetcher and its HTTP connection pool.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn ContentFetcher>,
    parallel: bool,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            fetcher,
            parallel: false,
        }
    }

    /// A pipeline that never touches the network.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineFetcher))
    }

    /// Builds the fetcher the config asks for.
    pub fn from_config(cfg: &ChatCanonConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let fetcher: Arc<dyn ContentFetcher> = if cfg.fetch.enabled {
            Arc::new(HttpContentFetcher::new(cfg.fetch.to_fetch_config())?)
        } else {
            Arc::new(OfflineFetcher)
        };
        info!(
            fetch_enabled = cfg.fetch.enabled,
            timeout_secs = cfg.fetch.timeout_secs,
            parallel = cfg.pipeline.parallel,
            "pipeline_ready"
        );
        Ok(Self::new(fetcher).with_parallel(cfg.pipeline.parallel))
    }

    /// Loads a YAML config file and builds from it.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let cfg = ChatCanonConfig::from_file(path)?;
        Self::from_config(&cfg)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn fetcher(&self) -> &dyn ContentFetcher {
        self.fetcher.as_ref()
    }

    /// [`normalize`](normalize::normalize) with this pipeline's fetcher.
    pub fn normalize(&self, raw_message: Option<&str>, raw_type: &str) -> Normalized {
        let span = MetricsSpan::start();
        let normalized = normalize::normalize(raw_message, raw_type, self.fetcher());
        if let Some(span) = span {
            span.record(raw_type, &normalized.kind);
        }
        normalized
    }

    /// Turns one raw record into a processed [`Message`].
    pub fn ingest(&self, record: RawRecord) -> Message {
        let span = MetricsSpan::start();
        let RawRecord {
            sender,
            message,
            raw_type,
            chat_time,
        } = record;
        let msg = Message::ingest(sender, message, raw_type, chat_time, self.fetcher());
        if let (Some(span), Some(kind)) = (span, msg.canonical_type()) {
            span.record(msg.raw_type().unwrap_or_default(), kind);
        }
        msg
    }

    /// Ingests every record; the output is in input order either way.
    pub fn ingest_batch(&self, records: Vec<RawRecord>) -> Vec<Message> {
        if self.parallel {
            records
                .into_par_iter()
                .map(|record| self.ingest(record))
                .collect()
        } else {
            records
                .into_iter()
                .map(|record| self.ingest(record))
                .collect()
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::offline()
    }
}
