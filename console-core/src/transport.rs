//! Typed contract against the automation engine's HTTP surface.
//!
//! Request planning and response decoding are plain functions so any HTTP
//! client can sit underneath; the browser build plugs in `gloo-net`.

use crate::error::ConsoleError;
use crate::model::{ApprovalItem, AuditLogItem, BackendStatus, Decision, Run, StatusSummary};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const RAW_PREVIEW_CHARS: usize = 200;

#[async_trait(?Send)]
pub trait EngineApi {
    async fn submit_command(&self, text: &str) -> Result<Run, ConsoleError>;
    async fn list_approvals(&self) -> Result<Vec<ApprovalItem>, ConsoleError>;
    async fn decide_approval(
        &self,
        id: i64,
        decision: Decision,
        note: &str,
    ) -> Result<Run, ConsoleError>;
    async fn list_audit_logs(
        &self,
        limit: u32,
        run_id: Option<i64>,
    ) -> Result<Vec<AuditLogItem>, ConsoleError>;
    async fn fetch_status(&self) -> Result<BackendStatus, ConsoleError>;
    async fn fetch_summary(&self) -> Result<StatusSummary, ConsoleError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl EngineRequest {
    fn get(base_url: &str, path: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            url: format!("{base_url}{path}"),
            body: None,
        }
    }

    fn post(base_url: &str, path: &str, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: format!("{base_url}{path}"),
            body: Some(body),
        }
    }
}

pub fn submit_command_request(base_url: &str, text: &str) -> EngineRequest {
    EngineRequest::post(base_url, "/api/command", serde_json::json!({ "text": text }))
}

pub fn list_approvals_request(base_url: &str) -> EngineRequest {
    EngineRequest::get(base_url, "/api/approvals")
}

pub fn decide_approval_request(
    base_url: &str,
    id: i64,
    decision: Decision,
    note: &str,
) -> EngineRequest {
    EngineRequest::post(
        base_url,
        &format!("/api/approvals/{id}/decision"),
        serde_json::json!({ "decision": decision, "note": note }),
    )
}

pub fn list_audit_logs_request(base_url: &str, limit: u32, run_id: Option<i64>) -> EngineRequest {
    let mut path = format!("/api/logs?limit={limit}");
    if let Some(run_id) = run_id {
        path.push_str(&format!("&run_id={run_id}"));
    }
    EngineRequest::get(base_url, &path)
}

pub fn status_request(base_url: &str) -> EngineRequest {
    EngineRequest::get(base_url, "/api/status")
}

pub fn summary_request(base_url: &str) -> EngineRequest {
    EngineRequest::get(base_url, "/api/status/summary")
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Turns a raw HTTP response into a typed value.
///
/// Non-2xx statuses become [`ConsoleError::Http`] carrying the engine's
/// `detail`; bodies that are not JSON, or not the expected shape, become
/// [`ConsoleError::MalformedResponse`].
pub fn decode_response<T: DeserializeOwned>(status: u16, raw: &str) -> Result<T, ConsoleError> {
    if !(200..=299).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|b| b.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| preview(raw));
        return Err(ConsoleError::Http { status, message });
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ConsoleError::MalformedResponse {
            reason: format!("not json: {e}"),
            raw: preview(raw),
        })?;
    serde_json::from_value(value).map_err(|e| ConsoleError::MalformedResponse {
        reason: e.to_string(),
        raw: preview(raw),
    })
}

/// Health probes never fail hard: anything unreadable is reported as `ok: false`.
pub fn decode_status(status: u16, raw: &str) -> BackendStatus {
    match decode_response::<BackendStatus>(status, raw) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "status probe unreadable");
            BackendStatus::default()
        }
    }
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= RAW_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(RAW_PREVIEW_CHARS).collect();
    out.push('…');
    out
}
