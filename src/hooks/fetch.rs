/*!
 * FetchTask: a stateful async fetch with loading/error/refetch lifecycle
 *
 * Each task owns one snapshot of `{value, loading, error, phase}` published
 * through a watch channel. Views read the snapshot or subscribe to changes;
 * the task owner cancels it on unmount, after which late results are
 * discarded.
 */

use futures::future::BoxFuture;
use harvest_connect::ConnectError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Produces one fetch future per call
pub type Fetcher<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, ConnectError>> + Send + Sync>;

/// Lifecycle phase of a fetch task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Observable state of a fetch task
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Last successfully fetched value. Survives later failures.
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
            phase: Phase::Idle,
        }
    }
}

impl<T> FetchState<T> {
    /// True once a fetch has completed, either way
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Failed) && !self.loading
    }
}

/// A single fetch operation wrapped in a state machine.
///
/// `Idle → Loading → Ready | Failed`, and `refetch` re-enters `Loading`.
/// Overlapping refetches are not serialized: whichever completes last wins.
pub struct FetchTask<T> {
    name: &'static str,
    fallback: &'static str,
    auto_fetch: bool,
    fetcher: Fetcher<T>,
    state: watch::Sender<FetchState<T>>,
    mounted: AtomicBool,
    cancel: CancellationToken,
}

impl<T> FetchTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a task that fetches on its own when mounted
    pub fn new(name: &'static str, fallback: &'static str, fetcher: Fetcher<T>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            name,
            fallback,
            auto_fetch: true,
            fetcher,
            state,
            mounted: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a task that only fetches on `refetch`
    pub fn manual(name: &'static str, fallback: &'static str, fetcher: Fetcher<T>) -> Self {
        Self {
            auto_fetch: false,
            ..Self::new(name, fallback, fetcher)
        }
    }

    /// Tie this task's lifetime to `parent`: cancelling the parent cancels it
    pub fn with_parent(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current state
    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Watch for state changes
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Activate the task. The first call on an auto-fetch task starts
    /// exactly one background fetch and returns true; every other call is
    /// a no-op.
    pub fn mount(self: &Arc<Self>) -> bool {
        if self.cancel.is_cancelled() || !self.auto_fetch {
            return false;
        }
        if self.mounted.swap(true, Ordering::SeqCst) {
            return false;
        }

        debug!("Mounting {}", self.name);
        self.begin();

        let task = Arc::clone(self);
        tokio::spawn(async move {
            task.run_fetch().await;
        });
        true
    }

    /// Fetch again and wait for the result to be applied
    pub async fn refetch(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.begin();
        self.run_fetch().await;
    }

    /// Start a refetch in the background
    pub fn spawn_refetch(self: &Arc<Self>) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.begin();

        let task = Arc::clone(self);
        tokio::spawn(async move {
            task.run_fetch().await;
        });
    }

    /// Wait until no fetch is in flight, or the task is cancelled
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.state.subscribe();
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = rx.wait_for(|s| !s.loading) => {}
        }
        self.snapshot()
    }

    /// Unmount: in-flight results are dropped and later fetches are no-ops
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Unmounting {}", self.name);
        }
        self.cancel.cancel();
        self.abandon();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.phase = Phase::Loading;
        });
    }

    /// Leave the loading state without applying a result. The last good
    /// value, if any, stays published.
    fn abandon(&self) {
        self.state.send_if_modified(|s| {
            if !s.loading {
                return false;
            }
            s.loading = false;
            s.phase = if s.value.is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
            true
        });
    }

    async fn run_fetch(&self) {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("{} cancelled, discarding in-flight fetch", self.name);
                self.abandon();
                return;
            }
            result = (self.fetcher)() => result,
        };

        // Cancelled between completion and apply
        if self.cancel.is_cancelled() {
            self.abandon();
            return;
        }

        match result {
            Ok(value) => self.state.send_modify(|s| {
                s.value = Some(value);
                s.error = None;
                s.loading = false;
                s.phase = Phase::Ready;
            }),
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    self.fallback.to_string()
                } else {
                    message
                };
                warn!("{} failed: {}", self.name, message);
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    s.loading = false;
                    s.phase = Phase::Failed;
                });
            }
        }
    }
}
