//! Daily quest tasks.
//!
//! Each task re-fetches the quest list, skips quests that are missing or
//! already done today, runs its side effect and then asks the server to mark
//! the quest complete. Only a failed quest fetch is an `Err`; everything else
//! is reported through [`TaskResult`].

pub mod t01_daily_login;
pub mod t02_claim_faucet;
pub mod t03_send_x1t;

pub use t01_daily_login::DailyLoginTask;
pub use t02_claim_faucet::ClaimFaucetTask;
pub use t03_send_x1t::SendX1tTask;

use crate::api::{Plain, Quest, QuestCompletion, X1Api};
use crate::config::X1Config;
use crate::wallet::ChainAccount;
use anyhow::{Context, Result};
use core_logic::{RequestContext, Sleeper};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub use core_logic::TaskResult;

/// Everything a quest task needs for one authenticated account.
#[derive(Clone)]
pub struct TaskContext {
    pub api: X1Api,
    pub wallet: Arc<dyn ChainAccount>,
    pub token: String,
    pub config: Arc<X1Config>,
    pub sleeper: Arc<dyn Sleeper>,
    pub request_ctx: RequestContext,
}

impl TaskContext {
    pub fn address(&self) -> String {
        self.wallet.address()
    }

    pub async fn pause(&self, secs: u64) {
        if secs > 0 {
            self.sleeper.sleep(Duration::from_secs(secs)).await;
        }
    }
}

/// Where a quest stands before its side effect runs.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestLookup {
    Missing,
    DoneToday,
    Open(Quest),
}

pub async fn lookup_quest(ctx: &TaskContext, title: &str) -> Result<QuestLookup> {
    let quests = ctx
        .api
        .quests(&ctx.token, &ctx.request_ctx)
        .await
        .context("Failed to fetch quests")?;

    Ok(match quests.into_iter().find(|q| q.title == title) {
        None => QuestLookup::Missing,
        Some(q) if q.is_completed_today => QuestLookup::DoneToday,
        Some(q) => QuestLookup::Open(q),
    })
}

/// Asks the server to mark `quest` done. Never fails: a rejected or errored
/// completion is logged and returned as an unsuccessful result.
pub async fn complete(ctx: &TaskContext, quest: &Quest) -> TaskResult {
    match ctx
        .api
        .complete_quest(&ctx.token, &quest.id, &ctx.request_ctx)
        .await
    {
        Ok(QuestCompletion::Completed { reward }) => {
            info!("Quest {} Completed! Reward: {}", quest.title, Plain(&reward));
            ctx.pause(ctx.config.settle_delay_secs).await;
            TaskResult {
                success: true,
                message: format!("{} completed", quest.title),
                tx_hash: None,
            }
        }
        Ok(QuestCompletion::NotCompleted { message }) => {
            warn!("Quest {} {}", quest.title, message);
            TaskResult {
                success: false,
                message,
                tx_hash: None,
            }
        }
        Err(e) => {
            error!("Failed to complete quest {}: {:#}", quest.title, e);
            TaskResult {
                success: false,
                message: e.to_string(),
                tx_hash: None,
            }
        }
    }
}

pub(crate) fn skipped(message: impl Into<String>) -> TaskResult {
    TaskResult {
        success: false,
        message: message.into(),
        tx_hash: None,
    }
}
