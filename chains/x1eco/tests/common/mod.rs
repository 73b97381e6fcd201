#![allow(dead_code)]

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ProxyConfig, RequestError, Sleeper,
    WalletError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use x1eco_daily::processor::{AccountTransport, TransportFactory};
use x1eco_daily::wallet::{parse_signer, Amount, ChainAccount, TransferReceipt, WalletConnector};

pub const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ADDR_A: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const ADDR_B: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub label: String,
    pub token: Option<String>,
}

/// In-memory stand-in for the quest API, faucet and IP lookup.
///
/// Tokens are `token-<address>`, so quest lists can differ per account.
pub struct FakeServer {
    default_quests: Value,
    quests_for: HashMap<String, Value>,
    pub quests_status: u16,
    pub completion: (u16, Value),
    pub faucet_body: String,
    pub issue_token: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeServer {
    pub fn new(default_quests: Value) -> Self {
        Self {
            default_quests,
            quests_for: HashMap::new(),
            quests_status: 200,
            completion: (200, json!({"message": "Quest completed successfully", "reward": 10})),
            faucet_body: "ok".to_string(),
            issue_token: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_quests_for(mut self, address: &str, quests: Value) -> Self {
        self.quests_for.insert(address.to_string(), quests);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.label).collect()
    }

    fn quests(&self, token: Option<&str>) -> Value {
        let address = token.and_then(|t| t.strip_prefix("token-")).unwrap_or_default();
        self.quests_for
            .get(address)
            .cloned()
            .unwrap_or_else(|| self.default_quests.clone())
    }

    fn respond(&self, request: &HttpRequest) -> (String, HttpResponse) {
        let url = Url::parse(&request.url).unwrap();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let host = url.host_str().unwrap_or_default();

        match (&request.method, host, url.path()) {
            (HttpMethod::Get, "api.ipify.org", _) => {
                ("ip".into(), ok(json!({"ip": "203.0.113.7"})))
            }
            (HttpMethod::Get, _, "/signin") => (
                "signin:get".into(),
                ok(json!({"message": format!("Sign in to X1 as {}", query["address"])})),
            ),
            (HttpMethod::Post(body), _, "/signin") => {
                let address = body["address"].as_str().unwrap_or_default();
                assert!(body["signature"].as_str().unwrap().starts_with("0x"));
                let reply = if self.issue_token {
                    json!({"token": format!("token-{}", address)})
                } else {
                    json!({})
                };
                ("signin:post".into(), ok(reply))
            }
            (HttpMethod::Get, _, "/quests") => (
                "quests".into(),
                HttpResponse::new(
                    self.quests_status,
                    self.quests(request.token.as_deref()).to_string(),
                ),
            ),
            (HttpMethod::Post(_), _, "/quests") => (
                format!("complete:{}", query["quest_id"]),
                HttpResponse::new(self.completion.0, self.completion.1.to_string()),
            ),
            (HttpMethod::Get, _, "/testnet/faucet") => (
                "faucet".into(),
                HttpResponse::new(200, self.faucet_body.clone()),
            ),
            (HttpMethod::Get, _, "/me") => {
                let address = request
                    .token
                    .as_deref()
                    .and_then(|t| t.strip_prefix("token-"))
                    .unwrap_or_default();
                (
                    "me".into(),
                    ok(json!({"address": address, "points": 120, "rank": 7})),
                )
            }
            _ => ("unknown".into(), HttpResponse::new(404, "not found")),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeServer {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        let (label, response) = self.respond(request);
        self.calls.lock().unwrap().push(Call {
            label,
            token: request.token.clone(),
        });
        Ok(response)
    }
}

pub fn ok(body: Value) -> HttpResponse {
    HttpResponse::new(200, body.to_string())
}

pub fn all_quests(completed_today: bool) -> Value {
    json!([
        {"id": 1, "title": "Daily Login", "is_completed_today": completed_today, "reward": 10},
        {"id": 2, "title": "Claim Faucet", "is_completed_today": completed_today, "reward": 20},
        {"id": 3, "title": "Send X1T", "is_completed_today": completed_today, "reward": 30},
    ])
}

/// Hands every account the same fake server, and remembers the proxies asked for.
pub struct SharedTransport {
    pub server: Arc<FakeServer>,
    pub available: bool,
    pub requested: Mutex<Vec<Option<String>>>,
}

impl SharedTransport {
    pub fn new(server: Arc<FakeServer>) -> Self {
        Self {
            server,
            available: true,
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl TransportFactory for SharedTransport {
    fn build(&self, proxy: Option<&ProxyConfig>) -> Option<AccountTransport> {
        self.requested
            .lock()
            .unwrap()
            .push(proxy.map(|p| p.url.clone()));
        if !self.available {
            return None;
        }
        Some(AccountTransport {
            http: self.server.clone(),
            rpc_client: reqwest::Client::new(),
        })
    }
}

/// Real key handling and signing, scripted chain I/O.
pub struct FakeConnector {
    pub transfer_succeeds: bool,
    pub transfers: Arc<Mutex<Vec<(String, Address, Amount)>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self {
            transfer_succeeds: true,
            transfers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn transfers(&self) -> Vec<(String, Address, Amount)> {
        self.transfers.lock().unwrap().clone()
    }
}

impl WalletConnector for FakeConnector {
    fn connect(
        &self,
        private_key: &str,
        _client: reqwest::Client,
    ) -> Result<Arc<dyn ChainAccount>, WalletError> {
        let signer = parse_signer(private_key)?;
        Ok(Arc::new(FakeAccount {
            signer,
            transfer_succeeds: self.transfer_succeeds,
            transfers: self.transfers.clone(),
        }))
    }
}

struct FakeAccount {
    signer: PrivateKeySigner,
    transfer_succeeds: bool,
    transfers: Arc<Mutex<Vec<(String, Address, Amount)>>>,
}

#[async_trait]
impl ChainAccount for FakeAccount {
    fn address(&self) -> String {
        self.signer.address().to_checksum(None)
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self.signer.sign_message(message.as_bytes()).await?;
        Ok(format!("0x{}", alloy::primitives::hex::encode(signature.as_bytes())))
    }

    async fn send_native(&self, to: Address, amount: Amount) -> Result<TransferReceipt> {
        self.transfers
            .lock()
            .unwrap()
            .push((self.address(), to, amount));
        Ok(TransferReceipt {
            tx_hash: "0xfeed".to_string(),
            success: self.transfer_succeeds,
        })
    }

    async fn balance(&self) -> Result<String> {
        Ok("1.5".to_string())
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|s| Duration::from_secs(*s)).collect()
}
