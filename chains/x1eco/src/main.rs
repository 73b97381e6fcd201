use anyhow::Result;
use clap::Parser;
use core_logic::{
    setup_logger, BatchRunner, CycleScheduler, ProxyManager, ProxySettings, Sleeper,
    TokioSleeper, WalletManager,
};
use dialoguer::{theme::ColorfulTheme, Confirm};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use x1eco_daily::{AlloyConnector, ProxyTransportFactory, X1Config, X1Processor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/x1eco/config.toml")]
    config: String,
    /// Private key file, one key per line
    #[arg(short, long, default_value = WalletManager::PK_FILE)]
    keys: String,
    /// Proxy file, one proxy URL per line
    #[arg(short, long, default_value = ProxyManager::PROXY_FILE)]
    proxies: String,
    /// Use proxies without asking
    #[arg(long, conflicts_with = "no_proxy")]
    proxy: bool,
    /// Run direct without asking
    #[arg(long)]
    no_proxy: bool,
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

fn ask_use_proxy() -> bool {
    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Do you want to use proxy?")
        .default(false)
        .interact()
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Cannot prompt for proxy usage ({}). Proceeding without proxy.", e);
            false
        }
    }
}

fn proxy_settings(args: &Args) -> Result<ProxySettings> {
    let wanted = if args.proxy {
        true
    } else if args.no_proxy {
        false
    } else {
        ask_use_proxy()
    };

    if !wanted {
        info!("Proceeding without proxy.");
        return Ok(ProxySettings::disabled());
    }

    let proxies = ProxyManager::load_proxies(&args.proxies)?;
    if proxies.is_empty() {
        warn!("No proxies available, proceeding without proxy.");
        return Ok(ProxySettings::disabled());
    }
    Ok(ProxySettings::enabled(proxies))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Keep guard alive for file logging
    let _log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let config = match X1Config::load(&args.config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return Ok(());
        }
    };
    info!("Configuration loaded for chain ID: {}", config.chain_id);

    let proxies = match proxy_settings(&args) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("Failed to load proxies: {:#}", e);
            return Ok(());
        }
    };

    let connector = match AlloyConnector::new(&config.rpc_url, config.chain_id) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Invalid RPC settings: {:#}", e);
            return Ok(());
        }
    };

    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
    let processor = Arc::new(X1Processor::new(
        config.clone(),
        Arc::new(ProxyTransportFactory::new(config.request_timeout())),
        connector,
        sleeper.clone(),
    ));
    let runner = BatchRunner::new(
        sleeper.clone(),
        config.account_delay_min_secs,
        config.account_delay_max_secs,
    );

    let mut scheduler = CycleScheduler::new(config.cycle_interval(), sleeper);
    if args.once {
        scheduler = scheduler.with_max_cycles(1);
    }

    scheduler
        .run(|cycle| {
            let processor = processor.clone();
            let proxies = proxies.clone();
            let runner = &runner;
            let keys = args.keys.clone();
            async move {
                info!("Starting cycle {}", cycle);
                // Re-read every cycle so key edits apply without a restart.
                let accounts = match WalletManager::load_accounts(&keys) {
                    Ok(accounts) => accounts,
                    Err(e) => {
                        error!("Failed to read {}: {}. Skipping cycle.", keys, e);
                        return;
                    }
                };
                runner.run_cycle(processor, accounts, &proxies).await;
            }
        })
        .await;

    Ok(())
}
