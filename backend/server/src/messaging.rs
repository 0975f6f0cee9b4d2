//! # Push Notifications
//!
//! Fan-out over FCM HTTP v1. The v1 API has no multicast endpoint, so a
//! batch is one `messages:send` call per device token, sent concurrently.
//!
//! ## Outcome
//! - Batch could not start (no tokens, too many tokens, no access token):
//!   `{"success": false, "error": "..."}`
//! - Batch sent: `{"success": true, "response": {...}}`, with per-token
//!   results in `response.responses` in the same order as the tokens
//!
//! Nothing is retried.

use std::{collections::BTreeMap, future::Future};

use futures::future::join_all;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    error::FirebaseError,
    firebase::{FirebaseAdmin, MESSAGING_ENDPOINT, cannot_be_base, endpoint},
};

/// FCM's multicast limit, kept so batches behave like the admin SDKs.
pub const MAX_TOKENS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();

        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BatchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PushOutcome {
    pub fn sent(response: BatchResponse) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.to_string()),
        }
    }
}

pub fn build_message(token: &str, notification: &Notification, data: &BTreeMap<String, String>) -> Value {
    let mut message = json!({
        "token": token,
        "notification": notification,
    });

    if !data.is_empty() {
        message["data"] = json!(data);
    }

    json!({ "message": message })
}

pub fn check_tokens(tokens: &[String]) -> Result<(), String> {
    if tokens.is_empty() {
        return Err("No device tokens provided".to_string());
    }

    if tokens.len() > MAX_TOKENS {
        return Err(format!(
            "Too many device tokens: {} (max {MAX_TOKENS})",
            tokens.len()
        ));
    }

    Ok(())
}

/// Delivery seam for [`send_push`], implemented by [`FirebaseAdmin`].
pub trait PushTransport {
    /// Access token shared by every message of a batch.
    fn authorize(&self) -> impl Future<Output = Result<String, FirebaseError>> + Send;

    /// Sends one `{"message": ...}` body, returns the provider response.
    fn send(
        &self,
        bearer: &str,
        message: &Value,
    ) -> impl Future<Output = Result<Value, FirebaseError>> + Send;
}

pub fn messages_url(project_id: &str) -> Result<Url, FirebaseError> {
    let mut url = endpoint(MESSAGING_ENDPOINT)?;
    url.path_segments_mut()
        .map_err(|_| cannot_be_base(MESSAGING_ENDPOINT))?
        .extend(["projects", project_id, "messages:send"]);

    Ok(url)
}

impl PushTransport for FirebaseAdmin {
    async fn authorize(&self) -> Result<String, FirebaseError> {
        self.bearer().await
    }

    async fn send(&self, bearer: &str, message: &Value) -> Result<Value, FirebaseError> {
        self.post_json(messages_url(self.project_id())?, message, bearer)
            .await
    }
}

pub async fn send_push<T: PushTransport>(
    transport: &T,
    tokens: &[String],
    notification: &Notification,
    data: &BTreeMap<String, String>,
) -> PushOutcome {
    if let Err(e) = check_tokens(tokens) {
        warn!("Push not sent: {e}");
        return PushOutcome::failed(e);
    }

    match send_each(transport, tokens, notification, data).await {
        Ok(response) => {
            info!(
                "Push sent: {} succeeded, {} failed",
                response.success_count, response.failure_count
            );
            PushOutcome::sent(response)
        }
        Err(e) => {
            error!("Error sending push notification: {e}");
            PushOutcome::failed(e)
        }
    }
}

async fn send_each<T: PushTransport>(
    transport: &T,
    tokens: &[String],
    notification: &Notification,
    data: &BTreeMap<String, String>,
) -> Result<BatchResponse, FirebaseError> {
    let bearer = transport.authorize().await?;

    let sends = tokens.iter().map(|token| {
        let message = build_message(token, notification, data);
        let bearer = bearer.as_str();

        async move {
            match transport.send(bearer, &message).await {
                Ok(sent) => SendResponse {
                    success: true,
                    message_id: sent.get("name").and_then(Value::as_str).map(str::to_string),
                    error: None,
                },
                Err(e) => SendResponse {
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                },
            }
        }
    });

    Ok(BatchResponse::from_responses(join_all(sends).await))
}
