//! # Core Logic - Shared Utilities for Daily Quest Runners
//!
//! This crate provides the chain-agnostic plumbing used by the chain crates:
//! proxy-aware HTTP transports, the retrying request executor, account
//! loading, the sequential batch runner and logging setup.
//!
//! ## Modules
//!
//! - [`config`] - Proxy specifiers, proxy settings and context labels
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Seams for transports, sleeping, tasks and account processing
//! - [`utils`] - Executor, retry, proxy, wallet and runner utilities

pub mod config;
pub mod error;
pub mod traits;
pub mod utils;

pub use config::{ProxyConfig, ProxyScheme, ProxySettings, RequestContext};
pub use error::{ConfigError, RequestError, WalletError};
pub use traits::{AccountProcessor, HttpTransport, Sleeper, Task, TaskResult};

pub use utils::{
    setup_logger, Account, Backoff, BatchRunner, CycleScheduler, CycleSummary, FailureClass,
    HttpMethod, HttpRequest, HttpResponse, ProxyManager, ReqwestTransport, RequestExecutor,
    RetryPolicy, TokioSleeper, WalletManager,
};
