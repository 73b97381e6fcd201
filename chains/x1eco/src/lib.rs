//! X1 EcoChain daily quest runner.
//!
//! Logs every account in, completes the daily check-in, faucet and transfer
//! quests, and reports the account's points and balance. The shared plumbing
//! (transports, retries, batch loop) lives in `core_logic`.

pub mod api;
pub mod config;
pub mod processor;
pub mod task;
pub mod wallet;
pub mod workflow;

pub use api::{Profile, Quest, QuestCompletion, X1Api};
pub use config::X1Config;
pub use processor::{AccountTransport, ProxyTransportFactory, TransportFactory, X1Processor};
pub use wallet::{AlloyConnector, ChainAccount, WalletConnector};
pub use workflow::{AccountWorkflow, ProfileReport, WorkflowReport, WorkflowState};
