use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Upper bound for the single request a fetch is allowed to make.
pub const MAX_TIMEOUT_SECS: u64 = 60;

/// Settings for [`HttpContentFetcher`](crate::HttpContentFetcher).
///
/// # Example
/// ```
/// use fetch::FetchConfig;
///
/// let cfg = FetchConfig {
///     timeout_secs: 15,
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout, in seconds. `1..=60`.
    pub timeout_secs: u64,
    /// TCP/TLS connect timeout, in seconds. Must not exceed `timeout_secs`.
    pub connect_timeout_secs: u64,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: MAX_TIMEOUT_SECS,
            connect_timeout_secs: 10,
            user_agent: concat!("chatcanon/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Checks the timeouts are usable. Cheap; call once at start-up.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(FetchError::InvalidConfig(format!(
                "timeout_secs must be within 1..={MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            )));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > self.timeout_secs {
            return Err(FetchError::InvalidConfig(format!(
                "connect_timeout_secs must be within 1..={}, got {}",
                self.timeout_secs, self.connect_timeout_secs
            )));
        }
        Ok(())
    }
}
