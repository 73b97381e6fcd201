//! Per-account daily workflow.
//!
//! Linear state machine:
//! `Init → AddressDerived → Authenticated → CheckinEvaluated → FaucetEvaluated
//! → TxEvaluated → ProfileFetched → Done`, with `Failed` absorbing any
//! prerequisite failure. Quest steps never fail the account on their own;
//! only a failed quest fetch does.

use crate::api::{Plain, Profile, X1Api};
use crate::config::X1Config;
use crate::task::{
    ClaimFaucetTask, DailyLoginTask, SendX1tTask, TaskContext, TaskResult,
};
use crate::wallet::{ChainAccount, WalletConnector};
use anyhow::{Context, Result};
use core_logic::{Account, RequestContext, Sleeper, Task};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Init,
    AddressDerived,
    Authenticated,
    CheckinEvaluated,
    FaucetEvaluated,
    TxEvaluated,
    ProfileFetched,
    Done,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub address: String,
    pub points: String,
    pub rank: String,
    pub balance: String,
}

impl ProfileReport {
    pub fn new(profile: &Profile, balance: String) -> Self {
        Self {
            address: profile.address.clone(),
            points: Plain(&profile.points).to_string(),
            rank: Plain(&profile.rank).to_string(),
            balance,
        }
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | points {} | rank {} | {} X1T",
            mask_address(&self.address),
            self.points,
            self.rank,
            self.balance
        )
    }
}

/// What happened to one account in one cycle.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub state: WorkflowState,
    pub address: Option<String>,
    pub steps: Vec<(String, TaskResult)>,
    pub profile: Option<ProfileReport>,
    pub failure: Option<String>,
    /// Last state reached before `Failed`.
    pub failed_at: Option<WorkflowState>,
}

impl WorkflowReport {
    fn new() -> Self {
        Self {
            state: WorkflowState::Init,
            address: None,
            steps: Vec::new(),
            profile: None,
            failure: None,
            failed_at: None,
        }
    }

    fn advance(&mut self, next: WorkflowState) {
        debug!("Workflow {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn is_failed(&self) -> bool {
        self.state == WorkflowState::Failed
    }
}

/// `0x1234******abcdef`; `N/A` for an empty address.
pub fn mask_address(address: &str) -> String {
    if address.is_empty() {
        return "N/A".to_string();
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}******{}", head, tail)
}

pub struct AccountWorkflow {
    api: X1Api,
    connector: Arc<dyn WalletConnector>,
    rpc_client: reqwest::Client,
    config: Arc<X1Config>,
    sleeper: Arc<dyn Sleeper>,
}

impl AccountWorkflow {
    pub fn new(
        api: X1Api,
        connector: Arc<dyn WalletConnector>,
        rpc_client: reqwest::Client,
        config: Arc<X1Config>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            api,
            connector,
            rpc_client,
            config,
            sleeper,
        }
    }

    async fn pause(&self, secs: u64) {
        if secs > 0 {
            self.sleeper.sleep(Duration::from_secs(secs)).await;
        }
    }

    /// Runs the whole day for `account`. Never returns `Err`; failures end in
    /// [`WorkflowState::Failed`] with the reason recorded for the caller to log.
    pub async fn run(&self, account: &Account, ctx: &RequestContext) -> WorkflowReport {
        let mut report = WorkflowReport::new();
        info!("Starting account processing");

        match self.drive(account, ctx, &mut report).await {
            Ok(()) => {
                report.advance(WorkflowState::Done);
                info!("Completed account processing");
            }
            Err(e) => {
                report.failure = Some(format!("{:#}", e));
                report.failed_at = Some(report.state);
                report.advance(WorkflowState::Failed);
            }
        }
        report
    }

    async fn drive(
        &self,
        account: &Account,
        ctx: &RequestContext,
        report: &mut WorkflowReport,
    ) -> Result<()> {
        let wallet = self
            .connector
            .connect(account.private_key(), self.rpc_client.clone())
            .context("Invalid private key")?;
        let address = wallet.address();
        report.address = Some(address.clone());
        report.advance(WorkflowState::AddressDerived);

        info!("{:<15}: {}", "Masked Address", mask_address(&address));
        let ip = match self.api.public_ip(ctx).await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Failed to get IP: {:#}", e);
                "Error retrieving IP".to_string()
            }
        };
        info!("{:<15}: {}", "IP", ip);

        info!("Starting authentication process...");
        let token = self
            .authenticate(wallet.as_ref(), ctx)
            .await
            .context("Failed to sign and login")?;
        info!("Login Successfully");
        report.advance(WorkflowState::Authenticated);
        self.pause(self.config.login_settle_secs).await;

        let task_ctx = TaskContext {
            api: self.api.clone(),
            wallet,
            token,
            config: self.config.clone(),
            sleeper: self.sleeper.clone(),
            request_ctx: ctx.clone(),
        };

        let steps: [(Box<dyn Task<TaskContext>>, WorkflowState); 3] = [
            (Box::new(DailyLoginTask::new()), WorkflowState::CheckinEvaluated),
            (Box::new(ClaimFaucetTask::new()), WorkflowState::FaucetEvaluated),
            (Box::new(SendX1tTask::new()), WorkflowState::TxEvaluated),
        ];

        for (task, next) in steps {
            let result = task.run(task_ctx.clone()).await?;
            debug!(
                "Task {} finished: success={} {}",
                task.name(),
                result.success,
                result.message
            );
            report.steps.push((task.name().to_string(), result));
            report.advance(next);
            self.pause(self.config.step_gap_secs).await;
        }

        self.pause(self.config.profile_delay_secs).await;
        match self.profile(&task_ctx).await {
            Ok(profile) => {
                info!("Profile Info {}", ctx);
                info!("{:<15}: {}", "Wallet Address", mask_address(&profile.address));
                info!("{:<15}: {}", "Total Points", profile.points);
                info!("{:<15}: {}", "Rank", profile.rank);
                info!("{:<15}: {}", "X1T Balance", profile.balance);
                report.profile = Some(profile);
                report.advance(WorkflowState::ProfileFetched);
            }
            Err(e) => warn!("Failed to retrieve account info: {:#}", e),
        }

        Ok(())
    }

    async fn authenticate(&self, wallet: &dyn ChainAccount, ctx: &RequestContext) -> Result<String> {
        let address = wallet.address();
        let message = self.api.sign_in_message(&address, ctx).await?;
        let signature = wallet.sign_message(&message).await?;
        self.api.login(&address, &signature, ctx).await
    }

    async fn profile(&self, ctx: &TaskContext) -> Result<ProfileReport> {
        let profile = ctx.api.profile(&ctx.token, &ctx.request_ctx).await?;
        let balance = ctx.wallet.balance().await?;
        Ok(ProfileReport::new(&profile, balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_address() {
        assert_eq!(
            mask_address("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            "0x7099******dc79C8"
        );
        assert_eq!(mask_address(""), "N/A");
        assert_eq!(mask_address("0xshort"), "0xshort");
    }

    #[test]
    fn test_profile_report_renders_scalars() {
        let profile = Profile {
            address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
            points: json!(1250),
            rank: serde_json::Value::Null,
        };
        let report = ProfileReport::new(&profile, "0.75".to_string());
        assert_eq!(report.points, "1250");
        assert_eq!(report.rank, "N/A");
        assert_eq!(
            report.to_string(),
            "0x7099******dc79C8 | points 1250 | rank N/A | 0.75 X1T"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(WorkflowState::Done.is_terminal());
        assert!(WorkflowState::Failed.is_terminal());
        assert!(!WorkflowState::TxEvaluated.is_terminal());
    }
}
