use crate::config::{ProxySettings, RequestContext};
use crate::traits::{AccountProcessor, Sleeper};
use crate::utils::wallet_manager::Account;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, Instrument};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Walks the account list one account at a time.
pub struct BatchRunner {
    sleeper: Arc<dyn Sleeper>,
    min_delay_secs: u64,
    max_delay_secs: u64,
}

impl BatchRunner {
    pub fn new(sleeper: Arc<dyn Sleeper>, min_delay_secs: u64, max_delay_secs: u64) -> Self {
        Self {
            sleeper,
            min_delay_secs: min_delay_secs.min(max_delay_secs),
            max_delay_secs: max_delay_secs.max(min_delay_secs),
        }
    }

    fn next_delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_delay_secs..=self.max_delay_secs);
        Duration::from_secs(secs)
    }

    /// Runs every account in input order. A failing or panicking account is
    /// logged and the batch moves on to the next one.
    pub async fn run_cycle(
        &self,
        processor: Arc<dyn AccountProcessor>,
        accounts: Vec<Account>,
        proxies: &ProxySettings,
    ) -> CycleSummary {
        let total = accounts.len();
        let mut summary = CycleSummary::default();
        let start_time = Instant::now();

        for (i, account) in accounts.into_iter().enumerate() {
            let ctx = RequestContext::for_account(i, total);
            let proxy = proxies.proxy_for(i).cloned();
            let span = tracing::info_span!("account", context = %ctx);

            if let Some(ref p) = proxy {
                info!(context = %ctx, "Using proxy {}", p);
            }

            // Spawned only to contain panics; awaited right away so accounts never overlap.
            let worker = processor.clone();
            let worker_ctx = ctx.clone();
            let handle = tokio::spawn(
                async move { worker.process(account, proxy, worker_ctx).await }.instrument(span),
            );

            summary.processed += 1;
            match handle.await {
                Ok(Ok(())) => summary.succeeded += 1,
                Ok(Err(e)) => {
                    summary.failed += 1;
                    error!(context = %ctx, "Error processing account: {:#}", e);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(context = %ctx, "Account worker panicked or failed to join: {}", e);
                }
            }

            if i + 1 < total {
                let delay = self.next_delay();
                info!("Waiting {}s before next account...", delay.as_secs());
                self.sleeper.sleep(delay).await;
            }
        }

        info!(
            "Cycle finished in {:.1}s | Processed: {} | Success: {} | Failed: {}",
            start_time.elapsed().as_secs_f64(),
            summary.processed,
            summary.succeeded,
            summary.failed
        );
        summary
    }
}

/// Repeats a cycle forever with a fixed pause in between.
pub struct CycleScheduler {
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
    max_cycles: Option<u64>,
}

impl CycleScheduler {
    pub fn new(interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            interval,
            sleeper,
            max_cycles: None,
        }
    }

    /// Stop after `cycles` runs instead of looping until the process is killed.
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles.max(1));
        self
    }

    /// Runs `cycle` with a one-based cycle number. Returns the number of
    /// cycles run, which only happens when a cycle limit is set.
    pub async fn run<F, Fut>(&self, mut cycle: F) -> u64
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut completed = 0u64;
        loop {
            cycle(completed + 1).await;
            completed += 1;

            if self.max_cycles.is_some_and(|max| completed >= max) {
                return completed;
            }

            info!("Cycle completed. Waiting {}...", describe(self.interval));
            self.sleeper.sleep(self.interval).await;
        }
    }
}

fn describe(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        let hours = secs / 3600;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_interval() {
        assert_eq!(describe(Duration::from_secs(86_400)), "24 hours");
        assert_eq!(describe(Duration::from_secs(3_600)), "1 hour");
        assert_eq!(describe(Duration::from_secs(90)), "90s");
    }
}
