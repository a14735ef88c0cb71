//! Configuration types for discovery and message sources.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`DiscoveryConfig`] - fetch-size growth and its safety caps
//! - [`TwilioConfig`] - credentials and transport settings for the Twilio source
//!
//! # Example
//!
//! ```rust
//! use smsexport::config::DiscoveryConfig;
//! use std::time::Duration;
//!
//! let config = DiscoveryConfig::new()
//!     .with_initial_limit(100)
//!     .with_max_rounds(10)
//!     .with_deadline(Duration::from_secs(60));
//!
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Configuration for the doubling window discovery.
///
/// Discovery starts at `initial_limit` records and doubles until the
/// requested start date is covered. The caps turn a runaway source into
/// an [`ExportError::UnboundedGrowth`] instead of an endless loop.
///
/// # Example
///
/// ```rust
/// use smsexport::config::DiscoveryConfig;
///
/// let config = DiscoveryConfig::new().with_max_limit(10_000);
/// assert_eq!(config.initial_limit, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Fetch size of the first round (default: 50)
    pub initial_limit: usize,

    /// Largest fetch size discovery may request (default: 1,000,000)
    pub max_limit: usize,

    /// Maximum number of fetch rounds (default: 32)
    pub max_rounds: usize,

    /// Wall-clock budget for the whole discovery, checked between fetches
    /// (default: none)
    #[serde(default)]
    pub deadline: Option<Duration>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            initial_limit: 50,
            max_limit: 1_000_000,
            max_rounds: 32,
            deadline: None,
        }
    }
}

impl DiscoveryConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first fetch size.
    #[must_use]
    pub fn with_initial_limit(mut self, limit: usize) -> Self {
        self.initial_limit = limit;
        self
    }

    /// Sets the largest fetch size.
    #[must_use]
    pub fn with_max_limit(mut self, limit: usize) -> Self {
        self.max_limit = limit;
        self
    }

    /// Sets the maximum number of rounds.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the wall-clock budget.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Checks that the caps are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] if a limit is zero or the initial
    /// limit exceeds the maximum.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.initial_limit == 0 {
            return Err(ExportError::config("initial fetch size must be positive"));
        }
        if self.max_rounds == 0 {
            return Err(ExportError::config("max rounds must be positive"));
        }
        if self.initial_limit > self.max_limit {
            return Err(ExportError::config(format!(
                "initial fetch size {} exceeds max fetch size {}",
                self.initial_limit, self.max_limit
            )));
        }
        Ok(())
    }
}

/// Default Twilio REST endpoint.
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Largest page Twilio serves for the Messages list.
pub const TWILIO_MAX_PAGE_SIZE: usize = 1000;

/// Configuration for the Twilio message source.
///
/// The auth token is never printed by `Debug` and never serialized.
///
/// # Example
///
/// ```rust
/// use smsexport::config::TwilioConfig;
/// use std::time::Duration;
///
/// let config = TwilioConfig::new("ACxxxxxxxx", "secret")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(5);
///
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    /// Account SID used in the request path and as the basic-auth user
    pub account_sid: String,

    /// Auth token used as the basic-auth password
    #[serde(skip_serializing, default)]
    pub auth_token: String,

    /// API base URL (default: `https://api.twilio.com`)
    pub base_url: String,

    /// Records requested per page, capped at 1000 (default: 1000)
    pub page_size: usize,

    /// Per-request timeout (default: 30s)
    pub timeout: Duration,

    /// Retries for rate-limited, 5xx or failed connections (default: 3)
    pub max_retries: u32,

    /// Base delay of the exponential retry backoff (default: 500ms)
    pub retry_backoff: Duration,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            base_url: TWILIO_API_BASE.to_string(),
            page_size: TWILIO_MAX_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl TwilioConfig {
    /// Environment variable holding the account SID.
    pub const ENV_ACCOUNT_SID: &'static str = "TWILIO_ACCOUNT_SID";

    /// Environment variable holding the auth token.
    pub const ENV_AUTH_TOKEN: &'static str = "TWILIO_AUTH_TOKEN";

    /// Creates a configuration with the given credentials and defaults.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    /// Reads credentials from `TWILIO_ACCOUNT_SID` and `TWILIO_AUTH_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self, ExportError> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ExportError::config(format!("{name} is not set")))
        };
        Ok(Self::new(
            read(Self::ENV_ACCOUNT_SID)?,
            read(Self::ENV_AUTH_TOKEN)?,
        ))
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the page size, clamped to `1..=1000`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, TWILIO_MAX_PAGE_SIZE);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry count.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the base retry delay.
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Checks that credentials are present.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.account_sid.trim().is_empty() {
            return Err(ExportError::config("Twilio account SID is empty"));
        }
        if self.auth_token.is_empty() {
            return Err(ExportError::config("Twilio auth token is empty"));
        }
        Ok(())
    }
}
