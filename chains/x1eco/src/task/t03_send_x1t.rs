//! Daily transaction quest: send a small random amount of native X1T to a
//! throwaway address and report the hash.

use super::{complete, lookup_quest, skipped, QuestLookup, TaskContext, TaskResult};
use crate::wallet::{random_address, random_amount};
use crate::workflow::mask_address;
use anyhow::Result;
use async_trait::async_trait;
use core_logic::Task;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SendX1tTask;

impl SendX1tTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Task<TaskContext> for SendX1tTask {
    fn name(&self) -> &str {
        "03_send_x1t"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        info!("Starting Daily TX Process...");
        let title = &ctx.config.quests.send_token;

        let quest = match lookup_quest(&ctx, title).await? {
            QuestLookup::Missing => {
                warn!("{} quest not found.", title);
                return Ok(skipped("quest not found"));
            }
            QuestLookup::DoneToday => {
                warn!("Already Sent TX Today.");
                return Ok(skipped("transaction already sent today"));
            }
            QuestLookup::Open(quest) => quest,
        };

        let recipient = random_address();
        let amount = random_amount(ctx.config.transfer_min, ctx.config.transfer_max);
        info!(
            "Sending {} X1T to {}...",
            amount,
            mask_address(&recipient.to_checksum(None))
        );

        let tx_hash = match ctx.wallet.send_native(recipient, amount).await {
            Ok(receipt) if receipt.success => {
                info!("TX sent successfully! Hash: {}", receipt.tx_hash);
                receipt.tx_hash
            }
            Ok(receipt) => {
                error!("Failed to send TX: TX failed ({})", receipt.tx_hash);
                return Ok(TaskResult {
                    success: false,
                    message: "Transfer reverted".to_string(),
                    tx_hash: Some(receipt.tx_hash),
                });
            }
            Err(e) => {
                error!("Failed to send TX: {:#}", e);
                return Ok(skipped(e.to_string()));
            }
        };

        ctx.pause(ctx.config.settle_delay_secs).await;
        let mut result = complete(&ctx, &quest).await;
        result.tx_hash = Some(tx_hash);
        Ok(result)
    }
}
