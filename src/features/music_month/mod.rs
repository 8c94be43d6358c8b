//! # Music Month Feature
//!
//! Dated daily prompts for a month, bulk loaded from a JSON file.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod loader;
pub mod period;
pub mod prompts;

pub use loader::{check_json_url, fetch_month_document, parse_month_document, MonthFileError};
pub use period::{PeriodWindow, ResolvedPeriod};
pub use prompts::{resolve_prompt, DayPrompt, PeriodId, PeriodPromptSet, PeriodStore};
