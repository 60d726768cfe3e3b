use console_core::error::ConsoleError;
use console_core::model::{ApprovalItem, AuditLogItem, BackendStatus, Decision, Run, StatusSummary};
use console_core::transport::{self, EngineApi, EngineRequest, HttpMethod};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// Engine client over the browser's fetch.
#[derive(Clone, Debug)]
pub struct HttpEngine {
    base_url: String,
}

impl HttpEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

async fn send(req: &EngineRequest) -> Result<(u16, String), ConsoleError> {
    let transport_err = |e: gloo_net::Error| ConsoleError::Transport(e.to_string());

    let response = match (req.method, req.body.as_ref()) {
        (HttpMethod::Post, Some(body)) => Request::post(&req.url)
            .header("content-type", "application/json")
            .json(body)
            .map_err(transport_err)?
            .send()
            .await
            .map_err(transport_err)?,
        (HttpMethod::Post, None) => Request::post(&req.url)
            .send()
            .await
            .map_err(transport_err)?,
        (HttpMethod::Get, _) => Request::get(&req.url)
            .header("cache-control", "no-store")
            .send()
            .await
            .map_err(transport_err)?,
    };

    let status = response.status();
    let raw = response.text().await.map_err(transport_err)?;
    Ok((status, raw))
}

pub async fn call<R>(req: EngineRequest) -> Result<R, ConsoleError>
where
    R: DeserializeOwned,
{
    tracing::debug!(url = %req.url, method = ?req.method, "engine request");
    let (status, raw) = send(&req).await?;
    transport::decode_response(status, &raw)
}

#[async_trait::async_trait(?Send)]
impl EngineApi for HttpEngine {
    async fn submit_command(&self, text: &str) -> Result<Run, ConsoleError> {
        call(transport::submit_command_request(&self.base_url, text)).await
    }

    async fn list_approvals(&self) -> Result<Vec<ApprovalItem>, ConsoleError> {
        call(transport::list_approvals_request(&self.base_url)).await
    }

    async fn decide_approval(
        &self,
        id: i64,
        decision: Decision,
        note: &str,
    ) -> Result<Run, ConsoleError> {
        call(transport::decide_approval_request(
            &self.base_url,
            id,
            decision,
            note,
        ))
        .await
    }

    async fn list_audit_logs(
        &self,
        limit: u32,
        run_id: Option<i64>,
    ) -> Result<Vec<AuditLogItem>, ConsoleError> {
        call(transport::list_audit_logs_request(
            &self.base_url,
            limit,
            run_id,
        ))
        .await
    }

    async fn fetch_status(&self) -> Result<BackendStatus, ConsoleError> {
        let (status, raw) = send(&transport::status_request(&self.base_url)).await?;
        Ok(transport::decode_status(status, &raw))
    }

    async fn fetch_summary(&self) -> Result<StatusSummary, ConsoleError> {
        call(transport::summary_request(&self.base_url)).await
    }
}
