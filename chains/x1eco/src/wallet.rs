//! On-chain side of an account: key parsing, message signing and the native
//! X1T transfer.
//!
//! The RPC provider is built on the same reqwest client the API calls use, so
//! an account's chain traffic leaves through its assigned proxy.

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{hex, Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::ClientBuilder;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::transports::http::Http;
use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::WalletError;
use rand::Rng;
use std::sync::Arc;
use url::Url;

/// Number of decimals kept when randomizing a transfer amount.
pub const AMOUNT_DECIMALS: u32 = 6;

/// Amount of native token in micro units (10^-6 X1T).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub fn micros(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10f64.powi(AMOUNT_DECIMALS as i32)
    }

    /// Value in wei (18 decimals).
    pub fn to_wei(&self) -> U256 {
        U256::from(self.0) * U256::from(10u64.pow(18 - AMOUNT_DECIMALS))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.as_f64())
    }
}

/// Uniform amount in `[min, max)` X1T with six decimals.
pub fn random_amount(min: f64, max: f64) -> Amount {
    let scale = 10f64.powi(AMOUNT_DECIMALS as i32);
    let lo = (min * scale).round() as u64;
    let hi = (max * scale).round() as u64;
    if hi <= lo {
        return Amount(lo);
    }
    Amount(rand::thread_rng().gen_range(lo..hi))
}

/// Fresh random recipient. Nobody holds the key; the transfer only has to land.
pub fn random_address() -> Address {
    let bytes: [u8; 20] = rand::thread_rng().gen();
    Address::from_slice(&bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: String,
    pub success: bool,
}

/// A connected wallet.
#[async_trait]
pub trait ChainAccount: Send + Sync {
    /// Checksummed `0x` address.
    fn address(&self) -> String;

    /// EIP-191 personal-sign signature as `0x` hex.
    async fn sign_message(&self, message: &str) -> Result<String>;

    /// Sends native value and waits for the receipt.
    async fn send_native(&self, to: Address, amount: Amount) -> Result<TransferReceipt>;

    /// Native balance formatted in whole X1T.
    async fn balance(&self) -> Result<String>;
}

/// Turns a private key into a [`ChainAccount`].
///
/// Must fail with [`WalletError`] on a malformed key before any network I/O.
pub trait WalletConnector: Send + Sync {
    fn connect(
        &self,
        private_key: &str,
        client: reqwest::Client,
    ) -> Result<Arc<dyn ChainAccount>, WalletError>;
}

pub fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, WalletError> {
    private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| WalletError::InvalidKeyFormat {
            reason: e.to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct AlloyConnector {
    rpc_url: Url,
    chain_id: u64,
}

impl AlloyConnector {
    pub fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        Ok(Self {
            rpc_url: rpc_url.parse().context("Invalid RPC URL")?,
            chain_id,
        })
    }
}

impl WalletConnector for AlloyConnector {
    fn connect(
        &self,
        private_key: &str,
        client: reqwest::Client,
    ) -> Result<Arc<dyn ChainAccount>, WalletError> {
        let signer = parse_signer(private_key)?.with_chain_id(Some(self.chain_id));
        let address = signer.address();

        let http = Http::with_client(client, self.rpc_url.clone());
        let rpc = ClientBuilder::default().transport(http, false);
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(
            ProviderBuilder::new()
                .wallet(signer.clone())
                .connect_client(rpc),
        );

        Ok(Arc::new(AlloyAccount {
            signer,
            address,
            chain_id: self.chain_id,
            provider,
        }))
    }
}

pub struct AlloyAccount {
    signer: PrivateKeySigner,
    address: Address,
    chain_id: u64,
    provider: Arc<dyn Provider + Send + Sync>,
}

#[async_trait]
impl ChainAccount for AlloyAccount {
    fn address(&self) -> String {
        self.address.to_checksum(None)
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| WalletError::SigningFailed {
                reason: e.to_string(),
            })?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    async fn send_native(&self, to: Address, amount: Amount) -> Result<TransferReceipt> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_value(amount.to_wei())
            .with_chain_id(self.chain_id);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("Failed to send transfer")?;
        let tx_hash = format!("{:?}", pending.tx_hash());

        let receipt = pending
            .get_receipt()
            .await
            .context("Failed to get receipt")?;

        Ok(TransferReceipt {
            tx_hash,
            success: receipt.inner.status(),
        })
    }

    async fn balance(&self) -> Result<String> {
        let wei = self
            .provider
            .get_balance(self.address)
            .await
            .context("Failed to fetch balance")?;
        Ok(format_ether(wei))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn test_parse_signer_accepts_prefixed_and_bare_keys() {
        let a = parse_signer(KEY).unwrap();
        let b = parse_signer(KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_malformed_key_is_wallet_error() {
        assert!(matches!(
            parse_signer("0xnothex"),
            Err(WalletError::InvalidKeyFormat { .. })
        ));
    }

    #[test]
    fn test_connect_does_no_io_and_reports_address() {
        let connector = AlloyConnector::new("http://127.0.0.1:1", 10778).unwrap();
        let account = connector.connect(KEY, reqwest::Client::new()).unwrap();
        assert_eq!(
            account.address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
    }

    #[test]
    fn test_random_amount_bounds_and_precision() {
        for _ in 0..200 {
            let amount = random_amount(0.1, 0.5);
            assert!(amount.micros() >= 100_000 && amount.micros() < 500_000);
            assert_eq!(amount.to_wei() % U256::from(10u64.pow(12)), U256::ZERO);
        }
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from_micros(123_456).to_string(), "0.123456");
    }

    #[test]
    fn test_random_address_varies() {
        assert_ne!(random_address(), random_address());
    }
}
