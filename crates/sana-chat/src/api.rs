//! Remote chat endpoint client.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

use crate::config::ChatConfig;
use crate::error::ApiError;

/// Response body keys the endpoint may use for the reply text.
const ANSWER_KEYS: [&str; 4] = ["answer", "response", "message", "text"];

/// A reply from the remote endpoint.
#[derive(Debug, Clone)]
pub struct BotReply {
    /// Server-supplied message id, when present.
    pub id: Option<i64>,
    /// Reply body.
    pub text: String,
    /// Server-side timestamp, when present.
    pub timestamp: Option<DateTime<Utc>>,
    /// True when the server flagged its own reply as a fallback answer.
    pub degraded: bool,
}

/// The remote chat endpoint seam.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send a question, bounded by the ask timeout.
    async fn ask(&self, question: &str) -> Result<BotReply, ApiError>;

    /// Liveness probe, bounded by the probe timeout. Any 2xx counts as
    /// reachable.
    async fn probe(&self) -> Result<(), ApiError>;
}

/// HTTP implementation of [`ChatApi`].
pub struct HttpChatApi {
    client: reqwest::Client,
    config: ChatConfig,
}

impl HttpChatApi {
    /// Create a client for the endpoint named in `config`.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn ask(&self, question: &str) -> Result<BotReply, ApiError> {
        let url = self.url("/ask");
        debug!(url = %url, "Sending question");

        let response = self
            .client
            .post(&url)
            .timeout(self.config.ask_timeout)
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        parse_reply(&body)
    }

    async fn probe(&self) -> Result<(), ApiError> {
        let url = self.url("/");
        debug!(url = %url, "Liveness probe");

        let response = self
            .client
            .get(&url)
            .timeout(self.config.probe_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Http(status.as_u16()))
        }
    }
}

/// Extract a reply from a response body. The endpoint is loose about
/// the answer key, so any of `answer`, `response`, `message`, and
/// `text` is accepted; `id`, `timestamp`, and `is_error` are optional.
fn parse_reply(body: &Value) -> Result<BotReply, ApiError> {
    let text = ANSWER_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .ok_or_else(|| ApiError::Malformed("response has no answer field".to_string()))?
        .to_string();

    let id = body.get("id").and_then(Value::as_i64);

    let timestamp = match body.get("timestamp") {
        Some(Value::String(s)) => s.parse::<DateTime<Utc>>().ok(),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    };

    let degraded = body
        .get("is_error")
        .or_else(|| body.get("isError"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(BotReply {
        id,
        text,
        timestamp,
        degraded,
    })
}
