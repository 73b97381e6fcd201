//! # Utilities Module
//!
//! Transport, retry, loading and scheduling helpers shared by chain crates.

pub mod executor;
pub mod http;
pub(crate) mod logger;
pub mod proxy_manager;
pub mod retry;
pub mod runner;
pub mod wallet_manager;

pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport};
pub use logger::setup_logger;
pub use proxy_manager::ProxyManager;
pub use retry::{Backoff, FailureClass, RetryPolicy, TokioSleeper};
pub use runner::{BatchRunner, CycleScheduler, CycleSummary};
pub use wallet_manager::{Account, WalletManager};
