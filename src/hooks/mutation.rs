/*!
 * MutationTask: a manually triggered update call with loading/error state
 */

use futures::future::BoxFuture;
use harvest_connect::ConnectError;
use tokio::sync::watch;
use tracing::error;

/// Performs one update call per request
pub type Action<Req, T> =
    Box<dyn Fn(Req) -> BoxFuture<'static, Result<T, ConnectError>> + Send + Sync>;

/// Observable state of a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<String>,
}

pub struct MutationTask<Req, T> {
    name: &'static str,
    fallback: &'static str,
    action: Action<Req, T>,
    state: watch::Sender<MutationState>,
}

impl<Req, T> MutationTask<Req, T> {
    pub fn new(name: &'static str, fallback: &'static str, action: Action<Req, T>) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self {
            name,
            fallback,
            action,
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn snapshot(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    /// Submit `request`. On failure the error is recorded and `None` is
    /// returned; nothing is raised to the caller.
    pub async fn run(&self, request: Req) -> Option<T> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = (self.action)(request).await;

        match result {
            Ok(value) => {
                self.state.send_modify(|s| s.loading = false);
                Some(value)
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    self.fallback.to_string()
                } else {
                    message
                };
                error!("{} failed: {}", self.name, message);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                None
            }
        }
    }
}
