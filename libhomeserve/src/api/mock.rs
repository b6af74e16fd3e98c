//! Scripted transport for tests
//!
//! Responses are queued per route (`"METHOD path"`). A queued response is
//! consumed by the next matching request; a sticky response answers every
//! request once the queue for that route is empty. Requests with no scripted
//! answer fail with a 404 so a missing fixture shows up as a slice error
//! rather than a hang.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use super::{ApiRequest, Transport};
use crate::error::ActionError;

#[derive(Debug, Clone)]
struct ScriptedResponse {
    result: Result<Value, ActionError>,
    delay: Duration,
}

/// A request as the mock saw it, with the token that was attached
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub request: ApiRequest,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    sticky: Mutex<HashMap<String, ScriptedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    token: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one successful response for `route`
    pub fn respond<T: Serialize>(&self, route: &str, body: T) -> &Self {
        self.respond_after(route, body, Duration::ZERO)
    }

    /// Queue one successful response that settles after `delay`
    pub fn respond_after<T: Serialize>(&self, route: &str, body: T, delay: Duration) -> &Self {
        let result = serde_json::to_value(body).map_err(ActionError::from);
        self.enqueue(route, ScriptedResponse { result, delay });
        self
    }

    /// Queue one failure for `route`
    pub fn fail(&self, route: &str, error: ActionError) -> &Self {
        self.fail_after(route, error, Duration::ZERO)
    }

    pub fn fail_after(&self, route: &str, error: ActionError, delay: Duration) -> &Self {
        self.enqueue(
            route,
            ScriptedResponse {
                result: Err(error),
                delay,
            },
        );
        self
    }

    /// Answer every request to `route` with `body` once its queue is empty
    pub fn respond_always<T: Serialize>(&self, route: &str, body: T) -> &Self {
        let result = serde_json::to_value(body).map_err(ActionError::from);
        self.sticky.lock().insert(
            route.to_string(),
            ScriptedResponse {
                result,
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests sent to `route`
    pub fn calls(&self, route: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|recorded| recorded.request.route() == route)
            .count()
    }

    /// Most recent request sent to `route`
    pub fn last_request(&self, route: &str) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|recorded| recorded.request.route() == route)
            .cloned()
    }

    /// Token currently attached to outgoing requests
    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn enqueue(&self, route: &str, response: ScriptedResponse) {
        self.queued
            .lock()
            .entry(route.to_string())
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, route: &str) -> Option<ScriptedResponse> {
        let queued = self
            .queued
            .lock()
            .get_mut(route)
            .and_then(VecDeque::pop_front);
        queued.or_else(|| self.sticky.lock().get(route).cloned())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ActionError> {
        let route = request.route();
        let token = self.token();
        self.requests.lock().push(RecordedRequest { request, token });

        let Some(response) = self.next_response(&route) else {
            return Err(ActionError::Status {
                status: 404,
                message: format!("No mock response for {}", route),
            });
        };

        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock() = token;
    }
}
