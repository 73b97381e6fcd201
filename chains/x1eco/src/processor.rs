use crate::api::X1Api;
use crate::config::X1Config;
use crate::wallet::WalletConnector;
use crate::workflow::{AccountWorkflow, WorkflowReport};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::{
    Account, AccountProcessor, HttpTransport, ProxyConfig, ProxyManager, RequestContext,
    RequestExecutor, Sleeper,
};
use std::sync::Arc;
use std::time::Duration;

/// Network route for one account: the HTTP transport for API calls and the
/// reqwest client the RPC provider reuses.
#[derive(Clone)]
pub struct AccountTransport {
    pub http: Arc<dyn HttpTransport>,
    pub rpc_client: reqwest::Client,
}

pub trait TransportFactory: Send + Sync {
    /// `None` when no usable transport exists for `proxy`.
    fn build(&self, proxy: Option<&ProxyConfig>) -> Option<AccountTransport>;
}

/// Builds real reqwest transports through [`ProxyManager`].
#[derive(Debug, Clone)]
pub struct ProxyTransportFactory {
    timeout: Duration,
}

impl ProxyTransportFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl TransportFactory for ProxyTransportFactory {
    fn build(&self, proxy: Option<&ProxyConfig>) -> Option<AccountTransport> {
        let transport = ProxyManager::build_transport(proxy, self.timeout)?;
        let rpc_client = transport.client().clone();
        Some(AccountTransport {
            http: Arc::new(transport),
            rpc_client,
        })
    }
}

/// Glue between the batch runner and the per-account workflow.
pub struct X1Processor {
    config: Arc<X1Config>,
    transports: Arc<dyn TransportFactory>,
    connector: Arc<dyn WalletConnector>,
    sleeper: Arc<dyn Sleeper>,
}

impl X1Processor {
    pub fn new(
        config: Arc<X1Config>,
        transports: Arc<dyn TransportFactory>,
        connector: Arc<dyn WalletConnector>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            transports,
            connector,
            sleeper,
        }
    }

    /// Runs one account and hands back the full report.
    pub async fn run_account(
        &self,
        account: &Account,
        proxy: Option<&ProxyConfig>,
        ctx: &RequestContext,
    ) -> Result<WorkflowReport> {
        // A proxied account must never fall back to a direct connection.
        let transport = self.transports.build(proxy).ok_or_else(|| match proxy {
            Some(p) => anyhow!("No usable transport for proxy {}", p),
            None => anyhow!("Failed to build direct transport"),
        })?;

        let executor = RequestExecutor::new(transport.http, self.sleeper.clone(), self.config.retry);
        let api = X1Api::new(executor, &self.config);
        let workflow = AccountWorkflow::new(
            api,
            self.connector.clone(),
            transport.rpc_client,
            self.config.clone(),
            self.sleeper.clone(),
        );

        Ok(workflow.run(account, ctx).await)
    }
}

#[async_trait]
impl AccountProcessor for X1Processor {
    async fn process(
        &self,
        account: Account,
        proxy: Option<ProxyConfig>,
        ctx: RequestContext,
    ) -> Result<()> {
        let report = self.run_account(&account, proxy.as_ref(), &ctx).await?;
        if report.is_failed() {
            let reason = report.failure.unwrap_or_else(|| "unknown failure".to_string());
            return match report.failed_at {
                Some(state) => Err(anyhow!("{} (stopped at {:?})", reason, state)),
                None => Err(anyhow!(reason)),
            };
        }
        Ok(())
    }
}
