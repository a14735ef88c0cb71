//! The message record exported by smsexport.
//!
//! A [`Record`] is the fixed-shape, statically-typed form of one message
//! entry from the remote history. Only [`created_at`](Record::created_at)
//! takes part in ordering; the remaining fields are payload, carried to the
//! exporter untouched.
//!
//! # Examples
//!
//! ```
//! use smsexport::Record;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//! let record = Record::new(ts)
//!     .with_from("+15550001111")
//!     .with_to("+15550002222")
//!     .with_body("See you at noon")
//!     .with_direction("outbound-api");
//!
//! assert_eq!(record.date_key().value(), 20240615);
//! ```
//!
//! ## Serialization
//!
//! Records deserialize from their own field names and from the names the
//! JSON exporters write (`time`, `content`), so a JSON export can be fed
//! back in through the file source. Twilio's `date_created` is accepted
//! too.
//!
//! ```
//! use smsexport::Record;
//!
//! let json = r#"{"created_at":"2024-06-15T12:00:00Z","from":"+1555","content":"Hi"}"#;
//! let record: Record = serde_json::from_str(json)?;
//! assert_eq!(record.body, "Hi");
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{DateKey, Dated};

/// One message from the remote history.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `created_at` | `DateTime<Utc>` | Creation time, the ordering key |
/// | `from` | `String` | Sender address |
/// | `to` | `String` | Recipient address |
/// | `status` | `String` | Delivery status as reported by the source |
/// | `body` | `String` | Message text |
/// | `direction` | `String` | `inbound`, `outbound-api`, ... |
/// | `sid` | `Option<String>` | Source-specific identifier |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// When the message was created at the source.
    #[serde(alias = "date_created", alias = "time")]
    pub created_at: DateTime<Utc>,

    /// Sender address.
    #[serde(default)]
    pub from: String,

    /// Recipient address.
    #[serde(default)]
    pub to: String,

    /// Delivery status.
    #[serde(default)]
    pub status: String,

    /// Message text.
    #[serde(default, alias = "content")]
    pub body: String,

    /// Message direction.
    #[serde(default)]
    pub direction: String,

    /// Source-specific identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sid: Option<String>,
}

impl Record {
    /// Creates a record with the given timestamp and empty payload.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            from: String::new(),
            to: String::new(),
            status: String::new(),
            body: String::new(),
            direction: String::new(),
            sid: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    #[must_use]
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Returns the calendar key of [`created_at`](Self::created_at) in UTC.
    pub fn date_key(&self) -> DateKey {
        DateKey::from_datetime(&self.created_at)
    }
}

impl Dated for Record {
    fn date_key(&self) -> DateKey {
        Record::date_key(self)
    }
}
