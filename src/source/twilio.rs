//! Twilio Messages API source.
//!
//! Serves `list_recent(limit)` by reading the account's Messages list
//! (which Twilio returns newest first) page by page until `limit` records
//! are collected or the list ends.

use std::num::NonZeroUsize;
use std::thread;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Batch, PageFetcher};
use crate::Record;
use crate::config::TwilioConfig;
use crate::error::{ExportError, Result};

/// One page of `GET /2010-04-01/Accounts/{sid}/Messages.json`.
#[derive(Debug, Deserialize)]
struct MessagePage {
    #[serde(default)]
    messages: Vec<TwilioMessage>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<u64>,
    message: String,
}

impl TwilioMessage {
    fn into_record(self) -> Result<Record> {
        let raw = self
            .date_created
            .ok_or_else(|| ExportError::parse("Twilio message", "missing date_created"))?;
        let created_at = parse_twilio_date(&raw)?;

        let mut record = Record::new(created_at)
            .with_from(self.from.unwrap_or_default())
            .with_to(self.to.unwrap_or_default())
            .with_status(self.status.unwrap_or_default())
            .with_body(self.body.unwrap_or_default())
            .with_direction(self.direction.unwrap_or_default());
        record.sid = self.sid;
        Ok(record)
    }
}

/// Parses Twilio's RFC 2822 timestamps (`Wed, 18 Aug 2010 20:01:40 +0000`).
fn parse_twilio_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ExportError::parse("Twilio date", format!("'{raw}': {e}")))
}

/// Message source backed by the Twilio REST API.
///
/// # Example
///
/// ```no_run
/// use smsexport::config::TwilioConfig;
/// use smsexport::source::{PageFetcher, TwilioSource};
/// use std::num::NonZeroUsize;
///
/// # fn main() -> smsexport::Result<()> {
/// let mut source = TwilioSource::new(TwilioConfig::from_env()?)?;
/// let latest = source.list_recent(NonZeroUsize::new(20).unwrap())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TwilioSource {
    http: Client,
    config: TwilioConfig,
}

impl TwilioSource {
    /// Builds the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] if credentials are missing or the
    /// client cannot be constructed.
    pub fn new(config: TwilioConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .user_agent(concat!("smsexport/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExportError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// The configuration this source was built with.
    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn first_page_url(&self, page_size: usize) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json?PageSize={}",
            self.base_url(),
            self.config.account_sid,
            page_size
        )
    }

    /// Fetches one page, retrying throttling, server errors and connection
    /// failures with exponential backoff.
    fn get_page(&self, url: &str, limit: usize) -> Result<MessagePage> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = self
                .http
                .get(url)
                .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
                .send();

            let failure = match outcome {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<MessagePage>()
                        .map_err(|e| ExportError::source_unavailable(limit, e));
                }
                Ok(resp) => {
                    let status = resp.status();
                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    let detail = describe_error_body(status, resp.text().unwrap_or_default());
                    if !retryable || attempt >= self.config.max_retries {
                        return Err(ExportError::source_unavailable(limit, detail));
                    }
                    detail
                }
                Err(err) => {
                    let retryable = err.is_timeout() || err.is_connect();
                    if !retryable || attempt >= self.config.max_retries {
                        return Err(ExportError::source_unavailable(limit, err));
                    }
                    err.to_string()
                }
            };

            let delay = self.config.retry_backoff * 2u32.saturating_pow(attempt);
            attempt += 1;
            warn!(
                attempt,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Twilio request failed, retrying"
            );
            thread::sleep(delay);
        }
    }
}

fn describe_error_body(status: StatusCode, body: String) -> String {
    match serde_json::from_str::<TwilioErrorBody>(&body) {
        Ok(TwilioErrorBody {
            code: Some(code),
            message,
        }) => format!("HTTP {status}: {message} (code {code})"),
        Ok(TwilioErrorBody { message, .. }) => format!("HTTP {status}: {message}"),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

impl PageFetcher for TwilioSource {
    fn name(&self) -> &'static str {
        "Twilio"
    }

    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
        let limit = limit.get();
        let page_size = limit.min(self.config.page_size).max(1);
        let mut url = self.first_page_url(page_size);
        let mut records = Vec::with_capacity(limit.min(self.config.page_size * 4));
        let mut pages = 0usize;

        loop {
            let page = self.get_page(&url, limit)?;
            pages += 1;
            let received = page.messages.len();
            for message in page.messages {
                records.push(message.into_record()?);
            }

            if records.len() >= limit || received == 0 {
                break;
            }
            match page.next_page_uri {
                Some(next) => url = format!("{}{}", self.base_url(), next),
                None => break,
            }
        }

        records.truncate(limit);
        debug!(limit, pages, returned = records.len(), "Twilio fetch complete");
        Ok(records)
    }
}
