use crate::config::ProxyConfig;
use crate::utils::http::ReqwestTransport;
use anyhow::{Context, Result};
use reqwest::{Client, Proxy};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    pub const PROXY_FILE: &'static str = "proxy.txt";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Loads proxies from a line-delimited file.
    /// Format expected: one `scheme://[user:pass@]host:port` per line, scheme one of
    /// http, https, socks4, socks5. Unsupported lines are dropped here so the
    /// pool only ever holds usable entries.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxies.", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut proxies = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<ProxyConfig>() {
                Ok(proxy) => proxies.push(proxy),
                Err(e) => warn!("Skipping proxy line: {}", e),
            }
        }

        if proxies.is_empty() {
            warn!("No proxies found in {}.", path.display());
        } else {
            info!(
                "Loaded {} prox{} from {}",
                proxies.len(),
                if proxies.len() == 1 { "y" } else { "ies" },
                path.display()
            );
        }
        Ok(proxies)
    }

    /// Builds the transport for one account.
    ///
    /// `None` proxy gives a direct transport. `None` is returned when the proxy
    /// cannot be turned into a working client.
    pub fn build_transport(
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Option<ReqwestTransport> {
        let mut client_builder = Client::builder().timeout(timeout);

        if let Some(proxy_conf) = proxy {
            let tunnel = match Proxy::all(&proxy_conf.url) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Unsupported proxy: {} ({})", proxy_conf, e);
                    return None;
                }
            };
            client_builder = client_builder.proxy(tunnel);
        }

        match client_builder.build() {
            Ok(client) => Some(ReqwestTransport::new(client, proxy.cloned())),
            Err(e) => {
                warn!("Failed to build HTTP client: {}", e);
                None
            }
        }
    }

    /// Same as [`ProxyManager::build_transport`] but from a raw specifier string.
    pub fn transport_for(proxy: Option<&str>, timeout: Duration) -> Option<ReqwestTransport> {
        match proxy {
            None => Self::build_transport(None, timeout),
            Some(raw) => match raw.parse::<ProxyConfig>() {
                Ok(conf) => Self::build_transport(Some(&conf), timeout),
                Err(_) => {
                    warn!("Unsupported proxy: {}", raw);
                    None
                }
            },
        }
    }
}
