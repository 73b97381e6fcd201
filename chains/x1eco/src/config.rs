use anyhow::Result;
use config::{Config, Environment, File};
use core_logic::{ConfigError, RetryPolicy};
use serde::Deserialize;
use std::time::Duration;

/// Quest titles as the server names them.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct QuestTitles {
    pub daily_login: String,
    pub claim_faucet: String,
    pub send_token: String,
}

impl Default for QuestTitles {
    fn default() -> Self {
        Self {
            daily_login: "Daily Login".to_string(),
            claim_faucet: "Claim Faucet".to_string(),
            send_token: "Send X1T".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct X1Config {
    pub api_url: String,
    pub faucet_url: String,
    pub ip_lookup_url: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub ref_code: String,
    pub quests: QuestTitles,
    /// Daily transfer amount range in X1T, upper bound exclusive.
    pub transfer_min: f64,
    pub transfer_max: f64,
    pub login_settle_secs: u64,
    pub settle_delay_secs: u64,
    pub step_gap_secs: u64,
    pub profile_delay_secs: u64,
    pub account_delay_min_secs: u64,
    pub account_delay_max_secs: u64,
    pub cycle_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for X1Config {
    fn default() -> Self {
        Self {
            api_url: "https://testnet-api.x1.one".to_string(),
            faucet_url: "https://nft-api.x1.one".to_string(),
            ip_lookup_url: "https://api.ipify.org?format=json".to_string(),
            rpc_url: "https://maculatus-rpc.x1eco.com".to_string(),
            chain_id: 10778,
            ref_code: String::new(),
            quests: QuestTitles::default(),
            transfer_min: 0.1,
            transfer_max: 0.5,
            login_settle_secs: 5,
            settle_delay_secs: 5,
            step_gap_secs: 2,
            profile_delay_secs: 5,
            account_delay_min_secs: 10,
            account_delay_max_secs: 15,
            cycle_interval_secs: 86_400,
            request_timeout_secs: 60,
            retry: RetryPolicy::default(),
        }
    }
}

impl X1Config {
    /// Layers an optional TOML file under `X1ECO_*` environment variables
    /// (nested keys use `__`, e.g. `X1ECO_RETRY__MAX_ATTEMPTS`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("X1ECO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api_url", &self.api_url),
            ("faucet_url", &self.faucet_url),
            ("ip_lookup_url", &self.ip_lookup_url),
            ("rpc_url", &self.rpc_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        }

        if !(self.transfer_min > 0.0 && self.transfer_min < self.transfer_max) {
            return Err(ConfigError::InvalidValue {
                field: "transfer_min".to_string(),
                reason: format!(
                    "expected 0 < transfer_min < transfer_max, got {} and {}",
                    self.transfer_min, self.transfer_max
                ),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.account_delay_min_secs > self.account_delay_max_secs {
            return Err(ConfigError::InvalidValue {
                field: "account_delay_min_secs".to_string(),
                reason: "must not exceed account_delay_max_secs".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    /// Config with every delay zeroed, for tests and dry runs.
    pub fn without_delays(mut self) -> Self {
        self.login_settle_secs = 0;
        self.settle_delay_secs = 0;
        self.step_gap_secs = 0;
        self.profile_delay_secs = 0;
        self.account_delay_min_secs = 0;
        self.account_delay_max_secs = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = X1Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain_id, 10778);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_backoff_ms, 2000);
        assert_eq!(config.quests.daily_login, "Daily Login");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = X1Config::load("definitely/not/here/config").unwrap();
        assert_eq!(config.api_url, "https://testnet-api.x1.one");
        assert_eq!(config.cycle_interval(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_environment_overrides_flat_and_nested_keys() {
        std::env::set_var("X1ECO_CHAIN_ID", "4242");
        std::env::set_var("X1ECO_RETRY__MAX_ATTEMPTS", "7");
        let loaded = X1Config::load("definitely/not/here/config");
        std::env::remove_var("X1ECO_CHAIN_ID");
        std::env::remove_var("X1ECO_RETRY__MAX_ATTEMPTS");

        let config = loaded.unwrap();
        assert_eq!(config.chain_id, 4242);
        assert_eq!(config.retry.max_attempts, 7);
        assert_eq!(config.retry.base_backoff_ms, 2000);
    }

    #[test]
    fn test_rejects_inverted_transfer_range() {
        let config = X1Config {
            transfer_min: 0.5,
            transfer_max: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = X1Config {
            rpc_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
