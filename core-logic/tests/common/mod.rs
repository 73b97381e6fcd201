#![allow(dead_code)]

use async_trait::async_trait;
use core_logic::{HttpRequest, HttpResponse, HttpTransport, RequestError, Sleeper};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Replays canned outcomes in order; once empty, repeats the last one.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, RequestError>>>,
    last: Mutex<Option<Result<HttpResponse, RequestError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, RequestError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(outcome: Result<HttpResponse, RequestError>) -> Self {
        Self::new(vec![outcome])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(RequestError::network("script exhausted"))),
        }
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn ok(body: &str) -> Result<HttpResponse, RequestError> {
    Ok(HttpResponse::new(200, body))
}

pub fn status(code: u16, body: &str) -> Result<HttpResponse, RequestError> {
    Ok(HttpResponse::new(code, body))
}

pub fn network_error() -> Result<HttpResponse, RequestError> {
    Err(RequestError::network("connection reset by peer"))
}
