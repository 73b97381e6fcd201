use crate::config::{ProxyConfig, RequestContext};
use crate::error::RequestError;
use crate::utils::http::{HttpRequest, HttpResponse};
use crate::utils::wallet_manager::Account;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub success: bool,
    pub message: String,
    pub tx_hash: Option<String>,
}

#[async_trait]
pub trait Task<Ctx>: Send + Sync {
    /// Returns the name of the task
    fn name(&self) -> &str;

    /// Executes the task
    async fn run(&self, ctx: Ctx) -> Result<TaskResult>;
}

/// One physical HTTP round trip.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; `Err` is reserved for calls that produced no response at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError>;
}

/// Suspension point for every timed wait, so tests can run without real timers.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Processes one account end to end. Called once per account per cycle.
#[async_trait]
pub trait AccountProcessor: Send + Sync {
    async fn process(
        &self,
        account: Account,
        proxy: Option<ProxyConfig>,
        ctx: RequestContext,
    ) -> Result<()>;
}
