//! Typed client for the X1 testnet quest API.
//!
//! Every call goes through the [`RequestExecutor`], so retries, backoff and
//! failure logging are uniform. Response shapes are decoded here; callers only
//! see domain types.

use crate::config::X1Config;
use anyhow::{anyhow, Context, Result};
use core_logic::{HttpRequest, RequestContext, RequestExecutor};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Quest {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed_today: bool,
    #[serde(default)]
    pub reward: Value,
}

/// Server ids arrive as numbers or strings depending on the endpoint version.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub points: Value,
    #[serde(default)]
    pub rank: Value,
}

/// Outcome of a quest completion call. Neither variant is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestCompletion {
    Completed { reward: Value },
    NotCompleted { message: String },
}

/// Renders JSON scalars without quotes, `null` as `N/A`.
pub struct Plain<'a>(pub &'a Value);

impl fmt::Display for Plain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("N/A"),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

#[derive(Deserialize)]
struct SignInMessage {
    message: Option<String>,
}

#[derive(Deserialize)]
struct SignInToken {
    token: Option<String>,
}

#[derive(Deserialize)]
struct CompletionBody {
    message: Option<String>,
    #[serde(default)]
    reward: Value,
}

#[derive(Deserialize)]
struct IpBody {
    ip: Option<String>,
}

#[derive(Clone)]
pub struct X1Api {
    executor: RequestExecutor,
    api_url: String,
    faucet_url: String,
    ip_lookup_url: String,
    ref_code: String,
}

impl X1Api {
    pub fn new(executor: RequestExecutor, config: &X1Config) -> Self {
        Self {
            executor,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            faucet_url: config.faucet_url.trim_end_matches('/').to_string(),
            ip_lookup_url: config.ip_lookup_url.clone(),
            ref_code: config.ref_code.clone(),
        }
    }

    pub fn signin_url(&self) -> String {
        format!("{}/signin", self.api_url)
    }

    pub fn quests_url(&self) -> String {
        format!("{}/quests", self.api_url)
    }

    pub fn profile_url(&self) -> String {
        format!("{}/me", self.api_url)
    }

    pub fn faucet_url(&self, address: &str) -> String {
        format!("{}/testnet/faucet?address={}", self.faucet_url, address)
    }

    /// Public IP as seen by the lookup service through this transport.
    pub async fn public_ip(&self, ctx: &RequestContext) -> Result<String> {
        let resp = self
            .executor
            .execute(HttpRequest::get(&self.ip_lookup_url), ctx)
            .await?;
        let body: IpBody = resp.json()?;
        Ok(body.ip.unwrap_or_else(|| "Unknown".to_string()))
    }

    /// First half of the login handshake: the message the wallet must sign.
    pub async fn sign_in_message(&self, address: &str, ctx: &RequestContext) -> Result<String> {
        let url = format!("{}?address={}", self.signin_url(), address);
        let resp = self.executor.execute(HttpRequest::get(url), ctx).await?;
        let body: SignInMessage = resp.json()?;
        body.message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| anyhow!("No message received from signin GET"))
    }

    /// Second half of the handshake: trades the signature for a bearer token.
    pub async fn login(
        &self,
        address: &str,
        signature: &str,
        ctx: &RequestContext,
    ) -> Result<String> {
        let payload = json!({
            "signature": signature,
            "address": address,
            "ref_code": self.ref_code,
        });
        let resp = self
            .executor
            .execute(HttpRequest::post(self.signin_url(), payload), ctx)
            .await?;
        let body: SignInToken = resp.json()?;
        body.token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("Login failed: No token received"))
    }

    pub async fn quests(&self, token: &str, ctx: &RequestContext) -> Result<Vec<Quest>> {
        let resp = self
            .executor
            .execute(HttpRequest::get(self.quests_url()).with_token(token), ctx)
            .await?;
        resp.json::<Vec<Quest>>()
            .context("Failed to decode quest list")
    }

    /// Marks a quest done. A 400 or a reply without "successfully" means the
    /// server already counts it, which is reported as `NotCompleted`.
    pub async fn complete_quest(
        &self,
        token: &str,
        quest_id: &str,
        ctx: &RequestContext,
    ) -> Result<QuestCompletion> {
        let url = format!("{}?quest_id={}", self.quests_url(), quest_id);
        let request = HttpRequest::post(url, json!({}))
            .with_token(token)
            .accepting_client_errors();
        let resp = self.executor.execute(request, ctx).await?;

        let body: Option<CompletionBody> = resp.json().ok();
        let (message, reward) = match body {
            Some(b) => (b.message, b.reward),
            None => (None, Value::Null),
        };

        match message {
            Some(m) if resp.status != 400 && m.contains("successfully") => {
                Ok(QuestCompletion::Completed { reward })
            }
            other => Ok(QuestCompletion::NotCompleted {
                message: other
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Already completed".to_string()),
            }),
        }
    }

    /// Returns `true` only when the faucet answers with the literal `ok`.
    pub async fn claim_faucet(&self, address: &str, ctx: &RequestContext) -> Result<bool> {
        let resp = self
            .executor
            .execute(HttpRequest::get(self.faucet_url(address)), ctx)
            .await?;
        let body = resp.body.trim();
        let answer = serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string());
        Ok(answer == "ok")
    }

    pub async fn profile(&self, token: &str, ctx: &RequestContext) -> Result<Profile> {
        let resp = self
            .executor
            .execute(HttpRequest::get(self.profile_url()).with_token(token), ctx)
            .await?;
        resp.json::<Profile>()
            .context("Failed to decode profile")
    }
}
