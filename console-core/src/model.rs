use serde::{Deserialize, Serialize};
use std::fmt;

/// One execution of a submitted command, as returned by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: i64,
    pub status: String,
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub approvals_queued: i64,
}

impl Run {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn step_for_tool(&self, tool: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.tool == tool)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: u32,
    pub tool: String,
    pub risk: RiskLevel,
    pub status: StepStatus,
    #[serde(default = "empty_object")]
    pub output: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Executed,
    QueuedApproval,
    Blocked,
    Error,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executed => "executed",
            Self::QueuedApproval => "queued_approval",
            Self::Blocked => "blocked",
            Self::Error => "error",
        }
    }
}

/// Risk classification attached by the engine. Ordered `Low < Medium < High`;
/// anything the engine sends that we don't recognise is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Other(String),
    Low,
    Medium,
    High,
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Other(raw),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(risk: RiskLevel) -> Self {
        risk.to_string()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalItem {
    pub id: i64,
    pub created_at: String,
    #[serde(default)]
    pub decided_at: Option<String>,
    #[serde(default)]
    pub run_id: Option<i64>,
    pub status: ApprovalStatus,
    pub risk_level: RiskLevel,
    pub tool_name: String,
    #[serde(default)]
    pub tool_args: serde_json::Value,
    #[serde(default)]
    pub decision_note: String,
}

impl ApprovalItem {
    pub fn is_actionable(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditLogItem {
    pub id: i64,
    pub created_at: String,
    #[serde(default)]
    pub run_id: Option<i64>,
    #[serde(default)]
    pub step_index: i64,
    pub event_type: String,
    pub message: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendStatus {
    pub ok: bool,
    pub dry_run: bool,
    pub brand: String,
    pub db_path: String,
    pub redis_url: String,
    pub local_actions_enabled: bool,
    pub ollama_enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSummary {
    pub ok: bool,
    pub dry_run: bool,
    pub pending_approvals: i64,
    pub recent_runs: Vec<serde_json::Value>,
    pub recent_logs: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_response() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "run_id": 42,
            "status": "completed",
            "summary": "Drafted 1 product",
            "steps": [{
                "index": 1,
                "tool": "shopify.research",
                "risk": "low",
                "status": "executed",
                "output": {"ok": true}
            }]
        }))
        .expect("run");

        assert_eq!(run.run_id, 42);
        assert!(run.is_completed());
        assert_eq!(run.approvals_queued, 0);
        assert_eq!(run.steps[0].status, StepStatus::Executed);
        assert_eq!(run.steps[0].risk, RiskLevel::Low);
        assert!(run.steps[0].error.is_none());
    }

    #[test]
    fn unknown_risk_is_kept_and_ranks_lowest() {
        let risk = RiskLevel::from("critical-ish".to_string());
        assert_eq!(risk.to_string(), "critical-ish");
        assert!(risk < RiskLevel::Low);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn rejects_unknown_step_status() {
        let res: Result<Step, _> = serde_json::from_value(serde_json::json!({
            "index": 1, "tool": "x", "risk": "low", "status": "exploded"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn parses_approval_item_with_nulls() {
        let item: ApprovalItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "created_at": "2024-05-01T10:00:00+00:00",
            "decided_at": null,
            "run_id": null,
            "status": "pending",
            "risk_level": "high",
            "tool_name": "facebook.post",
            "tool_args": {"message": "hi"},
            "decision_note": ""
        }))
        .expect("approval");

        assert!(item.is_actionable());
        assert_eq!(item.risk_level, RiskLevel::High);
        assert_eq!(item.run_id, None);
    }

    #[test]
    fn decision_serializes_lowercase() {
        let v = serde_json::to_value(Decision::Reject).expect("json");
        assert_eq!(v, serde_json::json!("reject"));
    }
}
