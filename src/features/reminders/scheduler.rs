//! # Reminder Scheduler
//!
//! Polls the reminder store on a fixed interval and delivers due reminders as
//! direct messages.
//!
//! Delivery is best effort: every due record is deleted after its delivery
//! attempt whether or not the attempt succeeded, so a reminder whose DM fails
//! is lost rather than retried.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Injected store and sink, cooperative shutdown, per-tick reports
//! - 1.0.0: Initial polling loop over the database

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::notifier::{notify, NotificationSink};
use super::store::ReminderStore;
use crate::core::BotError;

/// Outcome of one scan-and-deliver cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Due records found by the query
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Records removed from the store
    pub deleted: usize,
}

#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn ReminderStore>,
    sink: Arc<dyn NotificationSink>,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        sink: Arc<dyn NotificationSink>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            sink,
            interval,
        }
    }

    /// Run one tick at `now`
    ///
    /// A failing query aborts the tick. Failures delivering or deleting an
    /// individual record are logged and the scan moves on.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport, BotError> {
        let due = self.store.due_reminders(now).await?;
        let mut report = TickReport::default();

        for record in due {
            report.due += 1;
            let recipient = &record.reminder.recipient_id;

            match notify(
                self.sink.as_ref(),
                recipient,
                &record.reminder.notification_text(),
            )
            .await
            {
                Ok(()) => {
                    report.delivered += 1;
                    info!("Delivered reminder {} to user {recipient}", record.id);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Couldn't deliver reminder {} to user {recipient}: {e}", record.id);
                }
            }

            // Purged regardless of the delivery outcome
            match self.store.delete_reminder(record.id).await {
                Ok(()) => report.deleted += 1,
                Err(e) => error!("Failed to delete reminder {}: {e}", record.id),
            }
        }

        Ok(report)
    }

    /// Tick every interval until `shutdown` is cancelled
    ///
    /// Cancellation is only observed between ticks; a tick in progress runs to
    /// completion.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "⏰ Reminder scheduler started (checking every {}s)",
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Reminder scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.tick(Utc::now()).await {
                        Ok(report) if report.due > 0 => info!(
                            "Reminder tick: {} due, {} delivered, {} failed, {} deleted",
                            report.due, report.delivered, report.failed, report.deleted
                        ),
                        Ok(_) => debug!("Reminder tick: nothing due"),
                        Err(e) => error!("Something went wrong getting reminders: {e}"),
                    }
                }
            }
        }
    }

    /// Start the loop on a background task
    pub fn spawn(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let shutdown = token.clone();
        let task = tokio::spawn(async move { self.run(shutdown).await });
        SchedulerHandle { token, task }
    }
}

/// Control handle for a spawned scheduler
pub struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Token that stops the scheduler when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Prevent further ticks and wait for the current one to finish
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            error!("Reminder scheduler task ended abnormally: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::features::reminders::notifier::ChannelHandle;
    use crate::features::reminders::store::{DueReminders, Reminder, ReminderId};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Records every send; recipients listed in `unreachable` fail to open.
    /// With `reject_sends` every channel opens but no message is accepted.
    #[derive(Default)]
    struct FakeSink {
        unreachable: Vec<String>,
        reject_sends: bool,
        send_attempts: AtomicUsize,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeSink {
        fn failing_for(recipient: &str) -> Self {
            Self {
                unreachable: vec![recipient.to_string()],
                ..Self::default()
            }
        }

        fn rejecting_sends() -> Self {
            Self {
                reject_sends: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl NotificationSink for FakeSink {
        async fn open_channel(&self, recipient_id: &str) -> Result<ChannelHandle, BotError> {
            if self.unreachable.iter().any(|r| r == recipient_id) {
                return Err(BotError::RecipientUnreachable {
                    recipient_id: recipient_id.to_string(),
                    reason: "DMs closed".to_string(),
                });
            }
            Ok(ChannelHandle(recipient_id.to_string()))
        }

        async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), BotError> {
            self.send_attempts.fetch_add(1, Ordering::SeqCst);
            if self.reject_sends {
                return Err(BotError::DeliveryFailed("message rejected".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((channel.0.clone(), text.to_string()));
            Ok(())
        }
    }

    /// A store whose reads always fail
    struct UnreachableStore {
        queries: AtomicUsize,
    }

    #[async_trait]
    impl ReminderStore for UnreachableStore {
        async fn insert_reminder(&self, _reminder: &Reminder) -> Result<ReminderId, BotError> {
            Err(BotError::StoreUnavailable("offline".to_string()))
        }

        async fn due_reminders(&self, _now: DateTime<Utc>) -> Result<DueReminders, BotError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Err(BotError::StoreUnavailable("offline".to_string()))
        }

        async fn delete_reminder(&self, _id: ReminderId) -> Result<(), BotError> {
            Err(BotError::StoreUnavailable("offline".to_string()))
        }
    }

    /// Reads from a real database but refuses every delete
    struct UndeletableStore {
        inner: Database,
        delete_attempts: AtomicUsize,
    }

    #[async_trait]
    impl ReminderStore for UndeletableStore {
        async fn insert_reminder(&self, reminder: &Reminder) -> Result<ReminderId, BotError> {
            self.inner.insert_reminder(reminder).await
        }

        async fn due_reminders(&self, now: DateTime<Utc>) -> Result<DueReminders, BotError> {
            self.inner.due_reminders(now).await
        }

        async fn delete_reminder(&self, _id: ReminderId) -> Result<(), BotError> {
            self.delete_attempts.fetch_add(1, Ordering::SeqCst);
            Err(BotError::StoreUnavailable("read-only".to_string()))
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, minute, 0).unwrap()
    }

    async fn seeded_store() -> Database {
        let db = Database::new(":memory:").await.unwrap();
        db.insert_reminder(&Reminder::new("alice", "stretch", at(11, 0)))
            .await
            .unwrap();
        db.insert_reminder(&Reminder::new("bob", "call mum", at(11, 30)))
            .await
            .unwrap();
        db.insert_reminder(&Reminder::new("carol", "later", at(18, 0)))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_tick_delivers_and_deletes_due_only() {
        let db = seeded_store().await;
        let sink = Arc::new(FakeSink::default());
        let scheduler =
            ReminderScheduler::new(Arc::new(db.clone()), sink.clone(), Duration::from_secs(60));

        let report = scheduler.tick(at(12, 0)).await.unwrap();
        assert_eq!(
            report,
            TickReport {
                due: 2,
                delivered: 2,
                failed: 0,
                deleted: 2
            }
        );

        let mut recipients: Vec<String> =
            sink.sent.lock().await.iter().map(|(r, _)| r.clone()).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["alice", "bob"]);

        let remaining: Vec<_> = db.due_reminders(at(23, 0)).await.unwrap().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].reminder.recipient_id, "carol");
    }

    #[tokio::test]
    async fn test_failed_delivery_still_deletes() {
        // Best-effort delivery: bob never gets his DM, but his record is
        // purged all the same.
        let db = seeded_store().await;
        let sink = Arc::new(FakeSink::failing_for("bob"));
        let scheduler =
            ReminderScheduler::new(Arc::new(db.clone()), sink.clone(), Duration::from_secs(60));

        let report = scheduler.tick(at(12, 0)).await.unwrap();
        assert_eq!(report.due, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.deleted, 2);

        let sent = sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice");
        drop(sent);

        let remaining: Vec<_> = db.due_reminders(at(23, 0)).await.unwrap().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].reminder.recipient_id, "carol");
    }

    #[tokio::test]
    async fn test_rejected_send_still_deletes() {
        let db = seeded_store().await;
        let sink = Arc::new(FakeSink::rejecting_sends());
        let scheduler =
            ReminderScheduler::new(Arc::new(db.clone()), sink.clone(), Duration::from_secs(60));

        let report = scheduler.tick(at(12, 0)).await.unwrap();
        assert_eq!(
            report,
            TickReport {
                due: 2,
                delivered: 0,
                failed: 2,
                deleted: 2,
            }
        );
        assert_eq!(sink.send_attempts.load(Ordering::SeqCst), 2);
        assert!(sink.sent.lock().await.is_empty());
        assert_eq!(db.due_reminders(at(12, 0)).await.unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_stop_the_scan() {
        let store = Arc::new(UndeletableStore {
            inner: seeded_store().await,
            delete_attempts: AtomicUsize::new(0),
        });
        let sink = Arc::new(FakeSink::rejecting_sends());
        let scheduler = ReminderScheduler::new(store.clone(), sink.clone(), Duration::from_secs(60));

        let report = scheduler.tick(at(12, 0)).await.unwrap();
        assert_eq!(
            report,
            TickReport {
                due: 2,
                delivered: 0,
                failed: 2,
                deleted: 0,
            }
        );
        assert_eq!(sink.send_attempts.load(Ordering::SeqCst), 2);
        assert_eq!(store.delete_attempts.load(Ordering::SeqCst), 2);

        // Undeleted records come back on the next tick
        assert_eq!(store.due_reminders(at(12, 0)).await.unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_second_tick_is_idle() {
        let db = seeded_store().await;
        let sink = Arc::new(FakeSink::default());
        let scheduler =
            ReminderScheduler::new(Arc::new(db.clone()), sink.clone(), Duration::from_secs(60));

        scheduler.tick(at(12, 0)).await.unwrap();
        let sent_before = sink.sent.lock().await.len();

        let report = scheduler.tick(at(12, 1)).await.unwrap();
        assert_eq!(report, TickReport::default());
        assert_eq!(sink.sent.lock().await.len(), sent_before);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_tick() {
        let store = Arc::new(UnreachableStore {
            queries: AtomicUsize::new(0),
        });
        let sink = Arc::new(FakeSink::default());
        let scheduler = ReminderScheduler::new(store.clone(), sink.clone(), Duration::from_secs(60));

        let err = scheduler.tick(at(12, 0)).await.unwrap_err();
        assert!(matches!(err, BotError::StoreUnavailable(_)));
        assert!(sink.sent.lock().await.is_empty());
        assert_eq!(store.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawned_scheduler_ticks_and_stops() {
        let store = Arc::new(UnreachableStore {
            queries: AtomicUsize::new(0),
        });
        let sink = Arc::new(FakeSink::default());
        let scheduler =
            ReminderScheduler::new(store.clone(), sink, Duration::from_millis(20));

        let handle = scheduler.spawn();
        tokio::time::sleep(Duration::from_millis(70)).await;
        handle.stop().await;

        // Failing reads do not stop the loop; each interval retries
        let ticks = store.queries.load(Ordering::SeqCst);
        assert!(ticks >= 2, "expected repeated ticks, got {ticks}");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.queries.load(Ordering::SeqCst), ticks);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_ticks() {
        let store = Arc::new(UnreachableStore {
            queries: AtomicUsize::new(0),
        });
        let scheduler = ReminderScheduler::new(
            store.clone(),
            Arc::new(FakeSink::default()),
            Duration::from_millis(10),
        );

        let token = CancellationToken::new();
        token.cancel();
        scheduler.run(token).await;

        assert_eq!(store.queries.load(Ordering::SeqCst), 0);
    }
}
