use super::{complete, lookup_quest, skipped, QuestLookup, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::Task;
use tracing::{error, info, warn};

/// Claims test X1T from the faucet, then completes the faucet quest.
#[derive(Debug, Clone, Default)]
pub struct ClaimFaucetTask;

impl ClaimFaucetTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Task<TaskContext> for ClaimFaucetTask {
    fn name(&self) -> &str {
        "02_claim_faucet"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        info!("Starting Claim Faucet Process...");
        let title = &ctx.config.quests.claim_faucet;

        let quest = match lookup_quest(&ctx, title).await? {
            QuestLookup::Missing => {
                warn!("{} quest not found.", title);
                return Ok(skipped("quest not found"));
            }
            QuestLookup::DoneToday => {
                warn!("Already Claimed Faucet Today.");
                return Ok(skipped("faucet already claimed today"));
            }
            QuestLookup::Open(quest) => quest,
        };

        let address = ctx.address();
        match ctx.api.claim_faucet(&address, &ctx.request_ctx).await {
            Ok(true) => info!("Faucet claimed successfully!"),
            Ok(false) => {
                error!("Failed to claim faucet: Faucet claim failed");
                return Ok(skipped("faucet claim failed"));
            }
            Err(e) => {
                error!("Failed to claim faucet: {:#}", e);
                return Ok(skipped(e.to_string()));
            }
        }

        ctx.pause(ctx.config.settle_delay_secs).await;
        Ok(complete(&ctx, &quest).await)
    }
}
