//! Dated prompt sets and day lookup
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: `NotFound` and `NoActivePeriod` reported separately
//! - 1.0.0: Initial prompt set model

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::BotError;

/// Identity of a persisted prompt set
pub type PeriodId = i64;

/// Format used whenever a start date is shown to users
pub const PRETTY_DATE_FORMAT: &str = "%B %-d, %Y";

/// One day's prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPrompt {
    #[serde(rename = "day")]
    pub day_number: u32,
    pub prompt: String,
}

impl DayPrompt {
    pub fn new(day_number: u32, prompt: impl Into<String>) -> Self {
        Self {
            day_number,
            prompt: prompt.into(),
        }
    }
}

/// A music month: a start date plus prompts keyed by day number
///
/// Day numbers are unique within a set but need not be sorted or contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPromptSet {
    pub start_time: DateTime<Utc>,
    pub days: Vec<DayPrompt>,
}

impl PeriodPromptSet {
    /// First day number that appears more than once, if any
    pub fn duplicate_day(&self) -> Option<u32> {
        let mut seen = std::collections::HashSet::new();
        self.days
            .iter()
            .map(|d| d.day_number)
            .find(|day| !seen.insert(*day))
    }

    pub fn pretty_start(&self) -> String {
        self.start_time.format(PRETTY_DATE_FORMAT).to_string()
    }

    /// One `<Month> <day>: <prompt>` line per entry, in authored order
    pub fn listing(&self) -> String {
        let month = self.start_time.format("%B").to_string();
        self.days
            .iter()
            .map(|d| format!("{month} {}: {}\n", d.day_number, d.prompt))
            .collect()
    }

    /// Prompt text for `day`
    pub fn prompt_for(&self, day: u32) -> Result<&str, BotError> {
        self.days
            .iter()
            .find(|d| d.day_number == day)
            .map(|d| d.prompt.as_str())
            .ok_or(BotError::NotFound { day })
    }
}

/// Resolve the prompt for `day` in whichever set is active
pub fn resolve_prompt(active: Option<&PeriodPromptSet>, day: u32) -> Result<&str, BotError> {
    active.ok_or(BotError::NoActivePeriod)?.prompt_for(day)
}

/// Persistent collection of prompt sets
#[async_trait]
pub trait PeriodStore: Send + Sync {
    async fn insert_period(&self, set: &PeriodPromptSet) -> Result<PeriodId, BotError>;

    /// The set with the smallest start time strictly after `after`, and
    /// strictly before `before` when given
    async fn first_period_after(
        &self,
        after: DateTime<Utc>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Option<PeriodPromptSet>, BotError>;
}
