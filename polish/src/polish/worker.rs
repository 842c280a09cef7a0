//! Background thread that owns the blocking HTTP client for its lifetime.
//!
//! One request in, one reply out: no retries, no streaming, no cancellation.
//! All communication is via channels: PolishRequest in, AppEvent::PolishResult out.

use std::time::Duration;

use crossbeam_channel::Receiver;
use log::{info, warn};
use polish_core::{FieldType, PolishError};
use reqwest::blocking::Client;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AiConfig;
use crate::event::AppEvent;
use crate::polish::types::{PolishBody, PolishReply, PolishRequest, PolishResponse};

const GENERIC_FAILURE: &str = "AI 润色失败，请稍后重试";

/// Entry point for the polish worker thread.
///
/// Builds the HTTP client, then serves requests until the channel is closed
/// (sender dropped). If the client cannot be built, every request is answered
/// with a transport error so the UI never waits forever.
pub fn polish_worker_loop(
    config: AiConfig,
    rx: Receiver<PolishRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    let client = build_client(&config);
    let url = config.polish_url();

    for request in rx {
        info!("polishing {} ({} chars)", request.field, request.text.chars().count());
        let result = match &client {
            Ok(client) => polish_text(client, &url, request.field, &request.text),
            Err(e) => Err(PolishError::Transport(e.clone())),
        };
        if let Err(e) = &result {
            warn!("polish of {} failed: {}", request.field, e);
        }
        let response = PolishResponse { field: request.field, original: request.text, result };
        let _ = event_tx.send(AppEvent::PolishResult(Box::new(response)));
    }
}

fn build_client(config: &AiConfig) -> Result<Client, String> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| e.to_string())
}

/// Sends one polish request and interprets the reply.
fn polish_text(
    client: &Client,
    url: &str,
    field: FieldType,
    text: &str,
) -> Result<String, PolishError> {
    let body = PolishBody { text, field_type: field.as_str() };
    let resp = client
        .post(url)
        .json(&body)
        .send()
        .map_err(|e| PolishError::Transport(e.to_string()))?;
    let status = resp.status();
    let raw = resp.text().map_err(|e| PolishError::Transport(e.to_string()))?;
    parse_reply(status.is_success(), status.as_str(), &raw)
}

/// Turns an HTTP status and body into the revised text or an error.
///
/// A JSON body with a `message` wins over the bare status, so server-side
/// explanations reach the user even on non-2xx replies.
pub(crate) fn parse_reply(ok_status: bool, status: &str, raw: &str) -> Result<String, PolishError> {
    let reply: PolishReply = match serde_json::from_str(raw) {
        Ok(reply) => reply,
        Err(_) if !ok_status => return Err(PolishError::Transport(format!("HTTP {status}"))),
        Err(e) => return Err(PolishError::InvalidResponse(e.to_string())),
    };

    if !ok_status || !reply.success {
        let message = reply
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
        return Err(PolishError::Rejected(message));
    }

    reply
        .data
        .ok_or_else(|| PolishError::InvalidResponse("missing data".to_owned()))
}
