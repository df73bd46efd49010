//! Background delivery of booking notifications.
//!
//! Request handlers call [`NotificationDispatcher::booking_created`], which
//! only enqueues. A single worker task drains the queue, retrying each job
//! with exponential backoff. An attempt that outlives
//! `NotificationConfig::attempt_timeout` is abandoned and counts as failed.
//! Delivery results never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::email::{EmailError, EmailService};
use crate::config::NotificationConfig;
use crate::models::Booking;
use crate::slack::{SlackError, SlackWebhook, build_booking_created_message};

/// Errors from a notification channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Slack(#[from] SlackError),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

/// A channel that can announce new bookings.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logs.
    fn channel(&self) -> &'static str;

    /// Deliver the new-booking notice.
    async fn booking_created(&self, booking: &Booking) -> Result<(), NotifyError>;
}

#[async_trait]
impl Notifier for SlackWebhook {
    fn channel(&self) -> &'static str {
        "slack"
    }

    async fn booking_created(&self, booking: &Booking) -> Result<(), NotifyError> {
        self.post(&build_booking_created_message(booking)).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailService {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn booking_created(&self, booking: &Booking) -> Result<(), NotifyError> {
        self.send_booking_created(booking).await?;
        Ok(())
    }
}

struct Job {
    notifier: Arc<dyn Notifier>,
    booking: Arc<Booking>,
}

/// Enqueues notification jobs for the background worker.
///
/// Clones share one queue. The worker exits once every clone is dropped
/// and the queue is empty.
#[derive(Clone)]
pub struct NotificationDispatcher {
    queue: Option<mpsc::Sender<Job>>,
    notifiers: Arc<[Arc<dyn Notifier>]>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels: Vec<&str> = self.notifiers.iter().map(|n| n.channel()).collect();
        f.debug_struct("NotificationDispatcher")
            .field("channels", &channels)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// A dispatcher with no channels. Every booking logs a warning.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            queue: None,
            notifiers: Arc::new([]),
        }
    }

    /// Start the worker for `notifiers`.
    ///
    /// Returns the dispatcher and the worker handle, or no handle when
    /// `notifiers` is empty. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        notifiers: Vec<Arc<dyn Notifier>>,
        config: NotificationConfig,
    ) -> (Self, Option<JoinHandle<()>>) {
        if notifiers.is_empty() {
            return (Self::disabled(), None);
        }

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(rx, config));

        let dispatcher = Self {
            queue: Some(tx),
            notifiers: notifiers.into(),
        };
        (dispatcher, Some(worker))
    }

    /// Returns `true` if at least one channel is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    /// Enqueue one job per channel for a newly created booking.
    ///
    /// Never blocks. Jobs that do not fit in the queue are dropped.
    pub fn booking_created(&self, booking: &Booking) {
        let Some(queue) = &self.queue else {
            warn!(booking_id = %booking.id, "Notification channels not configured, skipping");
            return;
        };

        let booking = Arc::new(booking.clone());
        for notifier in self.notifiers.iter() {
            let job = Job {
                notifier: Arc::clone(notifier),
                booking: Arc::clone(&booking),
            };
            match queue.try_send(job) {
                Ok(()) => debug!(
                    booking_id = %booking.id,
                    channel = notifier.channel(),
                    "Notification queued"
                ),
                Err(TrySendError::Full(_)) => warn!(
                    booking_id = %booking.id,
                    channel = notifier.channel(),
                    "Notification queue full, dropping"
                ),
                Err(TrySendError::Closed(_)) => warn!(
                    booking_id = %booking.id,
                    channel = notifier.channel(),
                    "Notification worker stopped, dropping"
                ),
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt - 1)`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

async fn run_worker(mut rx: mpsc::Receiver<Job>, config: NotificationConfig) {
    while let Some(job) = rx.recv().await {
        deliver(&job, &config).await;
    }
    info!("Notification worker stopped");
}

async fn deliver(job: &Job, config: &NotificationConfig) {
    let channel = job.notifier.channel();
    let booking_id = job.booking.id;
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let outcome =
            tokio::time::timeout(config.attempt_timeout, job.notifier.booking_created(&job.booking))
                .await
                .unwrap_or_else(|_| Err(NotifyError::Timeout(config.attempt_timeout)));

        match outcome {
            Ok(()) => {
                info!(%booking_id, channel, attempt, "Notification delivered");
                return;
            }
            Err(e) if attempt < max_attempts => {
                let delay = backoff_delay(config.base_backoff, attempt);
                warn!(
                    %booking_id,
                    channel,
                    attempt,
                    error = %e,
                    retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Notification failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!(
                    %booking_id,
                    channel,
                    attempts = max_attempts,
                    error = %e,
                    "Notification failed, giving up"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::Utc;

    use otelier_core::{Email, HotelId, StayDates, UserId};

    use super::*;
    use crate::models::NewBooking;

    /// Fails the first `failures` calls, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Notifier for Flaky {
        fn channel(&self) -> &'static str {
            "flaky"
        }

        async fn booking_created(&self, _booking: &Booking) -> Result<(), NotifyError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(NotifyError::Other(format!("failure {call}")))
            } else {
                Ok(())
            }
        }
    }

    fn config(max_attempts: u32) -> NotificationConfig {
        NotificationConfig {
            queue_capacity: 8,
            max_attempts,
            base_backoff: Duration::from_millis(1),
            attempt_timeout: Duration::from_millis(50),
        }
    }

    /// Never finishes a delivery.
    struct Hang {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Notifier for Hang {
        fn channel(&self) -> &'static str {
            "hang"
        }

        async fn booking_created(&self, _booking: &Booking) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    fn booking() -> Booking {
        NewBooking {
            hotel_id: HotelId::generate(),
            guest_name: "Ada".to_string(),
            guest_email: Email::parse("ada@example.com").unwrap(),
            room_number: "7".to_string(),
            stay: StayDates::new(
                "2025-06-01".parse().unwrap(),
                "2025-06-02".parse().unwrap(),
            )
            .unwrap(),
            created_by: UserId::parse("u").unwrap(),
        }
        .into_booking(Utc::now())
    }

    #[test]
    fn test_backoff_doubles() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let flaky = Flaky::new(2);
        let (dispatcher, worker) = NotificationDispatcher::spawn(vec![flaky.clone() as Arc<dyn Notifier>], config(3));

        dispatcher.booking_created(&booking());
        drop(dispatcher);
        worker.unwrap().await.unwrap();

        assert_eq!(flaky.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let flaky = Flaky::new(u32::MAX);
        let (dispatcher, worker) = NotificationDispatcher::spawn(vec![flaky.clone() as Arc<dyn Notifier>], config(2));

        dispatcher.booking_created(&booking());
        dispatcher.booking_created(&booking());
        drop(dispatcher);
        worker.unwrap().await.unwrap();

        assert_eq!(flaky.calls(), 4);
    }

    #[tokio::test]
    async fn test_one_job_per_channel() {
        let first = Flaky::new(0);
        let second = Flaky::new(0);
        let (dispatcher, worker) =
            NotificationDispatcher::spawn(vec![first.clone() as Arc<dyn Notifier>, second.clone()], config(1));

        dispatcher.booking_created(&booking());
        drop(dispatcher);
        worker.unwrap().await.unwrap();

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_hung_channel_does_not_block_queue() {
        let hang = Arc::new(Hang {
            calls: AtomicU32::new(0),
        });
        let behind = Flaky::new(0);
        let (dispatcher, worker) = NotificationDispatcher::spawn(
            vec![hang.clone() as Arc<dyn Notifier>, behind.clone()],
            config(2),
        );

        dispatcher.booking_created(&booking());
        drop(dispatcher);
        tokio::time::timeout(Duration::from_secs(5), worker.unwrap())
            .await
            .expect("worker drained the queue")
            .unwrap();

        assert_eq!(hang.calls.load(Ordering::SeqCst), 2);
        assert_eq!(behind.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_channels_is_disabled() {
        let (dispatcher, worker) = NotificationDispatcher::spawn(Vec::new(), config(1));
        assert!(worker.is_none());
        assert!(!dispatcher.is_enabled());
        // Warns and returns
        dispatcher.booking_created(&booking());
    }
}
