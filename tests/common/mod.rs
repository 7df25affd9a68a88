#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use formadmin::services::http::{ApiRequest, ApiResponse, Transport};
use formadmin::ApiError;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// What the scripted transport does for one call.
pub enum Step {
    Reply(Option<Value>),
    Fail(ApiError),
    /// Sleeps, then replies. Honors the request's cancel token.
    Delayed(Duration, Option<Value>),
    /// Fires the token, then fails with `Cancelled` like a real transport.
    CancelWith(CancellationToken),
}

/// In-memory transport answering calls from a script.
///
/// Steps are consumed in call order unless the transport was built with
/// [`ScriptedTransport::keyed`], in which case each request picks the step
/// registered for the value of one body field.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    keyed: Option<(String, Mutex<HashMap<String, Step>>)>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn keyed(field: &str, steps: impl IntoIterator<Item = (&'static str, Step)>) -> Self {
        let routes = steps.into_iter().map(|(k, s)| (k.to_string(), s)).collect();
        Self {
            keyed: Some((field.to_string(), Mutex::new(routes))),
            ..Self::default()
        }
    }

    fn next_step(&self, request: &ApiRequest) -> Step {
        match &self.keyed {
            Some((field, routes)) => {
                let key = request
                    .body
                    .as_ref()
                    .and_then(|b| b[field.as_str()].as_str())
                    .expect("keyed request without routing field")
                    .to_string();
                routes.lock().unwrap().remove(&key).expect("no step for key")
            }
            None => self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more times than scripted"),
        }
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let cancel = request.options.cancel.clone();
        let step = self.next_step(&request);
        self.calls.lock().unwrap().push(request);

        match step {
            Step::Reply(body) => Ok(ApiResponse::new(201, body)),
            Step::Fail(err) => Err(err),
            Step::Delayed(delay, body) => match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => Err(ApiError::Cancelled),
                    _ = tokio::time::sleep(delay) => Ok(ApiResponse::new(201, body)),
                },
                None => {
                    tokio::time::sleep(delay).await;
                    Ok(ApiResponse::new(201, body))
                }
            },
            Step::CancelWith(token) => {
                token.cancel();
                Err(ApiError::Cancelled)
            }
        }
    }
}

pub fn transport_error(msg: &str) -> Step {
    Step::Fail(ApiError::Transport(msg.to_string()))
}
