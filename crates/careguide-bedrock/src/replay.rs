//! Scripted in-process model for tests and offline runs.
//!
//! Replies are routed by the request's call site and, optionally, by a
//! needle that must appear in the first user message. Each route holds a
//! queue; the last reply of a queue is repeated once the others are used
//! up. Every request is counted and kept for inspection.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use careguide_core::models::token_count::{TokenCount, TokenUsage};
use careguide_core::models::transaction::TransactionType;

use crate::client::{ModelClient, ModelReply, ModelRequest};
use crate::error::BedrockError;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Debug)]
struct Route {
    step: TransactionType,
    needle: Option<String>,
    queue: VecDeque<Scripted>,
}

impl Route {
    fn matches(&self, request: &ModelRequest) -> bool {
        if self.step != request.step {
            return false;
        }
        match &self.needle {
            None => true,
            Some(needle) => request
                .messages
                .first()
                .is_some_and(|m| m.content.contains(needle.as_str())),
        }
    }

    fn next(&mut self) -> Option<Scripted> {
        if self.queue.len() > 1 {
            self.queue.pop_front()
        } else {
            self.queue.front().cloned()
        }
    }
}

#[derive(Debug)]
pub struct ReplayClient {
    model_id: String,
    routes: Mutex<Vec<Route>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ModelRequest>>,
}

impl Default for ReplayClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayClient {
    pub fn new() -> Self {
        Self {
            model_id: "replay".to_string(),
            routes: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply for every request from `step`.
    pub fn on(self, step: TransactionType, reply: impl Into<String>) -> Self {
        self.push(step, None, Scripted::Reply(reply.into()))
    }

    /// Queue a reply for requests from `step` whose first user message
    /// contains `needle`. Needle routes are checked before plain ones.
    pub fn on_matching(
        self,
        step: TransactionType,
        needle: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        self.push(step, Some(needle.into()), Scripted::Reply(reply.into()))
    }

    /// Queue an invocation failure for every request from `step`.
    pub fn fail(self, step: TransactionType, message: impl Into<String>) -> Self {
        self.push(step, None, Scripted::Fail(message.into()))
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of requests received from `step`.
    pub fn calls_for(&self, step: TransactionType) -> usize {
        self.requests().iter().filter(|r| r.step == step).count()
    }

    /// Copies of every request received, in arrival order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn push(self, step: TransactionType, needle: Option<String>, scripted: Scripted) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            match routes
                .iter_mut()
                .find(|r| r.step == step && r.needle == needle)
            {
                Some(route) => route.queue.push_back(scripted),
                None => {
                    let route = Route {
                        step,
                        needle,
                        queue: VecDeque::from([scripted]),
                    };
                    // Needle routes are more specific; keep them first.
                    if route.needle.is_some() {
                        routes.insert(0, route);
                    } else {
                        routes.push(route);
                    }
                }
            }
        }
        self
    }

    fn next_for(&self, request: &ModelRequest) -> Option<Scripted> {
        let mut routes = self.routes.lock().ok()?;
        routes
            .iter_mut()
            .find(|r| r.matches(request))
            .and_then(Route::next)
    }
}

impl ModelClient for ReplayClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn converse(&self, request: &ModelRequest) -> Result<ModelReply, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.next_for(request) {
            Some(Scripted::Reply(text)) => Ok(ModelReply {
                usage: TokenUsage {
                    tokens: TokenCount {
                        input: request.system.len() as u64 / 4,
                        output: text.len() as u64 / 4,
                    },
                    cost_usd: 0.0,
                },
                text,
            }),
            Some(Scripted::Fail(message)) => Err(BedrockError::Invocation(message)),
            None => Err(BedrockError::Invocation(format!(
                "no scripted reply for {} request",
                request.step
            ))),
        }
    }
}
