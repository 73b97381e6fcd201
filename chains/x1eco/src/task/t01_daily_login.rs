use super::{complete, lookup_quest, skipped, QuestLookup, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::Task;
use tracing::{info, warn};

/// Daily check-in. No side effect beyond the completion call.
#[derive(Debug, Clone, Default)]
pub struct DailyLoginTask;

impl DailyLoginTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Task<TaskContext> for DailyLoginTask {
    fn name(&self) -> &str {
        "01_daily_login"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        info!("Starting Daily Checkin Process...");
        let title = &ctx.config.quests.daily_login;

        match lookup_quest(&ctx, title).await? {
            QuestLookup::Missing => {
                warn!("{} quest not found.", title);
                Ok(skipped("quest not found"))
            }
            QuestLookup::DoneToday => {
                warn!("Already Checked-In Today.");
                Ok(skipped("already checked in today"))
            }
            QuestLookup::Open(quest) => Ok(complete(&ctx, &quest).await),
        }
    }
}
