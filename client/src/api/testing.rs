//! In-memory transport and delay for driving the client in unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::poll::Delay;
use super::transport::{HttpResponse, Transport};
use crate::error::{ClientError, ClientResult};

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = (u16, &'static str)>,
    {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| HttpResponse::new(status, body))
                    .collect(),
            ),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn respond(&self, request: SeenRequest) -> ClientResult<HttpResponse> {
        self.seen.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::Transport("no scripted response left".into()))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> ClientResult<HttpResponse> {
        let body = serde_json::from_slice(&body).ok();
        self.respond(SeenRequest {
            method: "POST",
            url: url.to_string(),
            body,
        })
    }

    async fn get(&self, url: &str) -> ClientResult<HttpResponse> {
        self.respond(SeenRequest {
            method: "GET",
            url: url.to_string(),
            body: None,
        })
    }
}

/// Records requested waits instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}
