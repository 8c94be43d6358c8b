//! Current-period windowing
//!
//! A music month is considered current when it starts inside a window that
//! runs from shortly before the first of this calendar month up to the first
//! of the next one. The early edge is widened by a configurable number of
//! grace days so a month registered to start a little early still counts.
//!
//! All arithmetic is in UTC with boundaries at midnight.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Grace days configurable instead of fixed
//! - 1.0.0: Initial window resolution

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};

use super::prompts::{PeriodPromptSet, PeriodStore};
use crate::core::config::MAX_GRACE_DAYS;
use crate::core::BotError;

/// Bounds used to decide which prompt set is current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// Exclusive lower bound on a set's start time
    pub start: DateTime<Utc>,
    /// Exclusive upper bound for a set to count as active
    pub end: DateTime<Utc>,
}

/// Whether a resolved set is running now or only scheduled
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPeriod {
    Active(PeriodPromptSet),
    Upcoming(PeriodPromptSet),
}

impl ResolvedPeriod {
    pub fn set(&self) -> &PeriodPromptSet {
        match self {
            ResolvedPeriod::Active(set) | ResolvedPeriod::Upcoming(set) => set,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ResolvedPeriod::Active(_))
    }
}

impl PeriodWindow {
    /// Window for the calendar month containing `now`
    ///
    /// Starts `grace_days` before the last day of the previous month and ends
    /// exactly at the first of the next month. Grace is capped at
    /// [`MAX_GRACE_DAYS`].
    pub fn current(now: DateTime<Utc>, grace_days: u32) -> Self {
        let grace_days = grace_days.min(MAX_GRACE_DAYS);
        let today = now.date_naive();
        let first = today - Days::new(u64::from(today.day0()));
        let next_first = first + Months::new(1);
        let start = first - Days::new(1 + u64::from(grace_days));

        PeriodWindow {
            start: midnight(start),
            end: midnight(next_first),
        }
    }

    /// True when a set starting at `start_time` is active in this window
    pub fn is_active(&self, start_time: DateTime<Utc>) -> bool {
        start_time > self.start && start_time < self.end
    }

    /// Classify a set already known to start after the window start
    pub fn classify(&self, set: PeriodPromptSet) -> ResolvedPeriod {
        if set.start_time >= self.end {
            ResolvedPeriod::Upcoming(set)
        } else {
            ResolvedPeriod::Active(set)
        }
    }

    /// The earliest set starting after the window start, active or upcoming
    ///
    /// Among sets with identical start times the pick is whichever the store
    /// returns first.
    pub async fn current_or_next(
        &self,
        store: &dyn PeriodStore,
    ) -> Result<Option<ResolvedPeriod>, BotError> {
        let found = store.first_period_after(self.start, None).await?;
        Ok(found.map(|set| self.classify(set)))
    }

    /// The earliest set that is active in this window
    pub async fn active(
        &self,
        store: &dyn PeriodStore,
    ) -> Result<Option<PeriodPromptSet>, BotError> {
        store.first_period_after(self.start, Some(self.end)).await
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::features::music_month::prompts::DayPrompt;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn set_starting(start_time: DateTime<Utc>, prompt: &str) -> PeriodPromptSet {
        PeriodPromptSet {
            start_time,
            days: vec![DayPrompt::new(1, prompt)],
        }
    }

    #[test]
    fn test_mid_month_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap();
        let window = PeriodWindow::current(now, 1);

        // Last day of May minus one day
        assert_eq!(window.start, date(2024, 5, 30));
        assert_eq!(window.end, date(2024, 7, 1));
    }

    #[test]
    fn test_active_versus_upcoming() {
        let window = PeriodWindow::current(date(2024, 6, 15), 1);

        assert!(window.is_active(date(2024, 6, 1)));
        assert!(window.classify(set_starting(date(2024, 6, 1), "a")).is_active());

        assert!(!window.is_active(date(2024, 7, 1)));
        assert!(!window.classify(set_starting(date(2024, 7, 1), "b")).is_active());
    }

    #[test]
    fn test_grace_admits_early_start() {
        let window = PeriodWindow::current(date(2024, 6, 2), 1);
        assert!(window.is_active(date(2024, 5, 31)));
        assert!(window.is_active(Utc.with_ymd_and_hms(2024, 5, 30, 0, 0, 1).unwrap()));
        assert!(!window.is_active(date(2024, 5, 30)));
    }

    #[test]
    fn test_grace_is_configurable() {
        let now = date(2024, 6, 15);
        assert_eq!(PeriodWindow::current(now, 0).start, date(2024, 5, 31));
        assert_eq!(PeriodWindow::current(now, 3).start, date(2024, 5, 28));
    }

    #[test]
    fn test_oversized_grace_is_capped() {
        let now = date(2024, 6, 15);
        let capped = PeriodWindow::current(now, MAX_GRACE_DAYS);
        assert_eq!(capped.start, date(2024, 5, 3));
        assert_eq!(PeriodWindow::current(now, u32::MAX), capped);
        assert_eq!(PeriodWindow::current(now, 29), capped);
    }

    #[test]
    fn test_month_length_edges() {
        // 29-day February (leap year)
        let window = PeriodWindow::current(date(2024, 3, 10), 1);
        assert_eq!(window.start, date(2024, 2, 28));
        assert_eq!(window.end, date(2024, 4, 1));

        // 28-day February
        let window = PeriodWindow::current(date(2023, 3, 31), 1);
        assert_eq!(window.start, date(2023, 2, 27));

        let window = PeriodWindow::current(date(2023, 2, 28), 1);
        assert_eq!(window.start, date(2023, 1, 30));
        assert_eq!(window.end, date(2023, 3, 1));

        // 31-day month, year rollover on both edges
        let window = PeriodWindow::current(date(2024, 1, 1), 1);
        assert_eq!(window.start, date(2023, 12, 30));
        assert_eq!(window.end, date(2024, 2, 1));

        let window = PeriodWindow::current(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap(), 1);
        assert_eq!(window.start, date(2024, 11, 29));
        assert_eq!(window.end, date(2025, 1, 1));
    }

    #[tokio::test]
    async fn test_current_or_next_prefers_earliest_start() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_period(&set_starting(date(2024, 8, 1), "august"))
            .await
            .unwrap();
        db.insert_period(&set_starting(date(2024, 6, 1), "june"))
            .await
            .unwrap();
        db.insert_period(&set_starting(date(2024, 5, 1), "may"))
            .await
            .unwrap();

        let window = PeriodWindow::current(date(2024, 6, 15), 1);
        let resolved = window.current_or_next(&db).await.unwrap().unwrap();
        assert!(resolved.is_active());
        assert_eq!(resolved.set().days[0].prompt, "june");

        let active = window.active(&db).await.unwrap().unwrap();
        assert_eq!(active.days[0].prompt, "june");
    }

    #[tokio::test]
    async fn test_only_future_set_is_upcoming() {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_period(&set_starting(date(2024, 7, 1), "july"))
            .await
            .unwrap();

        let window = PeriodWindow::current(date(2024, 6, 15), 1);
        let resolved = window.current_or_next(&db).await.unwrap().unwrap();
        assert!(!resolved.is_active());
        assert_eq!(resolved.set().start_time, date(2024, 7, 1));

        assert!(window.active(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nothing_planned() {
        let db = Database::new(":memory:").await.unwrap();
        let window = PeriodWindow::current(date(2024, 6, 15), 1);

        assert!(window.current_or_next(&db).await.unwrap().is_none());
        assert!(window.active(&db).await.unwrap().is_none());
    }
}
