//! Scripted in-memory transport for testing
//!
//! This provides an implementation of `ActorTransport` that replays canned
//! wire values, so the client and the hooks built on it can be exercised
//! without a running replica.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::error::ConnectError;
use crate::transport::{ActorTransport, Method};

/// One scripted outcome
#[derive(Debug, Clone)]
enum Reply {
    Value(Value),
    Fail(String),
    Delayed(Duration, Box<Reply>),
    Gated(Arc<Notify>, Box<Reply>),
}

/// Mock transport for testing
///
/// Replies are queued per method. The last queued reply for a method is
/// sticky: it keeps being returned once the queue is down to it.
///
/// # Example
///
/// ```rust
/// use harvest_connect::mock::MockActor;
/// use harvest_connect::{MarketplaceClient, Method};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mock = MockActor::new();
/// mock.respond(Method::HealthCheck, serde_json::json!("OK"));
///
/// let client = MarketplaceClient::with_transport(Arc::new(mock.clone()));
/// assert_eq!(client.health_check().await?, "OK");
/// assert_eq!(mock.call_count(Method::HealthCheck), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockActor {
    replies: Arc<Mutex<HashMap<Method, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<(Method, Vec<Value>)>>>,
    root_key_fails: Arc<AtomicBool>,
    root_key_fetches: Arc<Mutex<u32>>,
}

impl MockActor {
    /// Create a mock with no scripted replies
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
    }

    /// Queue a successful wire value
    pub fn respond(&self, method: Method, value: Value) {
        self.push(method, Reply::Value(value));
    }

    /// Queue a transport failure
    pub fn fail(&self, method: Method, message: &str) {
        self.push(method, Reply::Fail(message.to_string()));
    }

    /// Queue a wire value that arrives after `delay`
    pub fn respond_after(&self, method: Method, delay: Duration, value: Value) {
        self.push(
            method,
            Reply::Delayed(delay, Box::new(Reply::Value(value))),
        );
    }

    /// Queue a wire value held back until `gate` is notified
    pub fn respond_when(&self, method: Method, gate: Arc<Notify>, value: Value) {
        self.push(method, Reply::Gated(gate, Box::new(Reply::Value(value))));
    }

    /// Queue a transport failure held back until `gate` is notified
    pub fn fail_when(&self, method: Method, gate: Arc<Notify>, message: &str) {
        self.push(
            method,
            Reply::Gated(gate, Box::new(Reply::Fail(message.to_string()))),
        );
    }

    /// Make root key fetches fail
    pub fn fail_root_key(&self) {
        self.root_key_fails.store(true, Ordering::SeqCst);
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<(Method, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: Method) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == method)
            .count()
    }

    pub fn root_key_fetches(&self) -> u32 {
        *self.root_key_fetches.lock().unwrap()
    }

    fn next_reply(&self, method: Method) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&method)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

async fn resolve(reply: Reply) -> Result<Value, ConnectError> {
    let mut reply = reply;
    loop {
        reply = match reply {
            Reply::Value(value) => return Ok(value),
            Reply::Fail(message) => return Err(ConnectError::Transport(message)),
            Reply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                *inner
            }
            Reply::Gated(gate, inner) => {
                gate.notified().await;
                *inner
            }
        };
    }
}

#[async_trait]
impl ActorTransport for MockActor {
    async fn fetch_root_key(&self) -> Result<(), ConnectError> {
        *self.root_key_fetches.lock().unwrap() += 1;
        if self.root_key_fails.load(Ordering::SeqCst) {
            return Err(ConnectError::Transport(
                "connection refused (mock replica down)".to_string(),
            ));
        }
        Ok(())
    }

    async fn call(&self, method: Method, args: Vec<Value>) -> Result<Value, ConnectError> {
        self.calls.lock().unwrap().push((method, args));

        let reply = self.next_reply(method).ok_or_else(|| {
            ConnectError::Transport(format!("no scripted reply for {}", method))
        })?;

        resolve(reply).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let mock = MockActor::new();
        let result = mock.call(Method::GetPlatformStats, vec![]).await;
        assert!(matches!(result, Err(ConnectError::Transport(_))));
        assert_eq!(mock.call_count(Method::GetPlatformStats), 1);
    }

    #[tokio::test]
    async fn test_queue_then_sticky_last() {
        let mock = MockActor::new();
        mock.respond(Method::HealthCheck, json!("first"));
        mock.respond(Method::HealthCheck, json!("second"));

        assert_eq!(mock.call(Method::HealthCheck, vec![]).await.unwrap(), json!("first"));
        assert_eq!(mock.call(Method::HealthCheck, vec![]).await.unwrap(), json!("second"));
        assert_eq!(mock.call(Method::HealthCheck, vec![]).await.unwrap(), json!("second"));
    }

    #[tokio::test]
    async fn test_gated_reply_waits_for_notify() {
        let mock = MockActor::new();
        let gate = Arc::new(Notify::new());
        mock.respond_when(Method::HealthCheck, gate.clone(), json!("OK"));

        gate.notify_one();
        let value = mock.call(Method::HealthCheck, vec![]).await.unwrap();
        assert_eq!(value, json!("OK"));
    }

    #[tokio::test]
    async fn test_root_key_failure_toggle() {
        let mock = MockActor::new();
        assert!(mock.fetch_root_key().await.is_ok());
        mock.fail_root_key();
        assert!(mock.fetch_root_key().await.is_err());
        assert_eq!(mock.root_key_fetches(), 2);
    }
}
