//! Music month bulk loading
//!
//! Fetches a JSON document shaped as
//! `{"start_time": "<RFC 3339>", "days": [{"day": 1, "prompt": "..."}]}`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Size limit, request timeout and duplicate day rejection
//! - 1.0.0: Initial URL fetch

use log::{debug, warn};
use std::time::Duration;
use thiserror::Error;

use super::prompts::PeriodPromptSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthFileError {
    #[error("url does not point at a .json file")]
    WrongSuffix,

    #[error("couldn't fetch month file: {0}")]
    Fetch(String),

    #[error("couldn't read month file body: {0}")]
    Read(String),

    #[error("month file is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("day {0} appears more than once")]
    DuplicateDay(u32),
}

impl MonthFileError {
    /// Reply shown to whoever ran the setup command
    pub fn user_message(&self) -> String {
        match self {
            MonthFileError::WrongSuffix => "Give me a .json file".to_string(),
            MonthFileError::Fetch(_) => "Couldn't get the file from the URL provided".to_string(),
            MonthFileError::Read(_) => "Error reading the file bytes".to_string(),
            MonthFileError::InvalidJson(_) => "Invalid JSON".to_string(),
            MonthFileError::DuplicateDay(day) => {
                format!("Invalid JSON: day {day} appears more than once")
            }
        }
    }
}

/// Reject URLs that do not end in `.json`
pub fn check_json_url(url: &str) -> Result<(), MonthFileError> {
    if url.trim().ends_with(".json") {
        Ok(())
    } else {
        Err(MonthFileError::WrongSuffix)
    }
}

/// Parse and validate a month document
pub fn parse_month_document(bytes: &[u8]) -> Result<PeriodPromptSet, MonthFileError> {
    let set: PeriodPromptSet =
        serde_json::from_slice(bytes).map_err(|e| MonthFileError::InvalidJson(e.to_string()))?;

    if let Some(day) = set.duplicate_day() {
        return Err(MonthFileError::DuplicateDay(day));
    }
    Ok(set)
}

/// Download a month document with a size limit and timeout, then parse it
pub async fn fetch_month_document(
    url: &str,
    max_bytes: u64,
    timeout_secs: u64,
) -> Result<PeriodPromptSet, MonthFileError> {
    let url = url.trim();
    check_json_url(url)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| MonthFileError::Fetch(e.to_string()))?;

    let mut response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            MonthFileError::Fetch(format!("request timed out after {timeout_secs} seconds"))
        } else {
            MonthFileError::Fetch(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MonthFileError::Fetch(format!("server returned HTTP {status}")));
    }

    if let Some(content_length) = response.content_length() {
        if content_length > max_bytes {
            return Err(MonthFileError::Read(format!(
                "file is {content_length} bytes, limit is {max_bytes}"
            )));
        }
    }

    // Content-Length is optional, the limit also holds while streaming
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| MonthFileError::Read(e.to_string()))?
    {
        if (bytes.len() + chunk.len()) as u64 > max_bytes {
            return Err(MonthFileError::Read(format!(
                "file is larger than the {max_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        warn!("Month file at {url} is empty");
    }

    debug!("Fetched month file from {url} ({} bytes)", bytes.len());
    parse_month_document(&bytes)
}
