// ── Snapshot poller ──
//
// Owned periodic scheduler replacing ambient module-level timers.
// Lifecycle is explicit: `spawn` starts the schedule, `shutdown` stops
// it and joins the task. Single-flight: each tick is awaited before
// the next interval fire is observed, and missed fires are skipped
// rather than bursted — a slow backend can never stack fetches.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The unit of work a [`Poller`] drives once per interval.
///
/// `tick` borrows the task mutably for the duration of one run, which
/// is what serializes ticks: the scheduler cannot observe the next
/// interval fire until the returned future resolves.
pub trait PollTask: Send + 'static {
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Handle for a running periodic schedule.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown)
/// leaves the task running until its cancellation token fires; tie the
/// token to the consuming view's lifetime for automatic teardown.
#[derive(Debug)]
pub struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start driving `task` every `period`.
    ///
    /// The first tick fires immediately, not after one full period, so
    /// the first paint is never delayed. Cancellation is cooperative:
    /// it takes effect at the next scheduling boundary, never mid-tick.
    pub fn spawn<T: PollTask>(period: Duration, mut task: T) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = interval.tick() => task.tick().await,
                }
            }
            debug!("poll schedule stopped");
        });

        Self { cancel, handle }
    }

    /// A child token that fires when this poller is shut down.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Stop the schedule and join the task.
    ///
    /// Once this returns, no further tick will run. An in-flight tick
    /// is allowed to finish first (cooperative cancellation).
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
