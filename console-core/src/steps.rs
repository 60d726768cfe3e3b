//! Projection of run steps and records into display panels and badges.

use crate::model::{ApprovalStatus, RiskLevel, Step, StepStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeVariant {
    Ok,
    Warn,
    Danger,
    Neutral,
}

impl BadgeVariant {
    pub fn class(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Danger => "danger",
            Self::Neutral => "neutral",
        }
    }
}

pub fn risk_badge(risk: &RiskLevel) -> BadgeVariant {
    match risk {
        RiskLevel::High => BadgeVariant::Danger,
        RiskLevel::Medium => BadgeVariant::Warn,
        RiskLevel::Low | RiskLevel::Other(_) => BadgeVariant::Ok,
    }
}

pub fn step_status_badge(status: StepStatus) -> BadgeVariant {
    match status {
        StepStatus::Executed => BadgeVariant::Ok,
        StepStatus::QueuedApproval => BadgeVariant::Warn,
        StepStatus::Blocked | StepStatus::Error => BadgeVariant::Danger,
    }
}

pub fn run_status_badge(status: &str) -> BadgeVariant {
    if status == "completed" {
        BadgeVariant::Ok
    } else {
        BadgeVariant::Warn
    }
}

pub fn approval_status_badge(status: ApprovalStatus) -> BadgeVariant {
    match status {
        ApprovalStatus::Pending => BadgeVariant::Warn,
        ApprovalStatus::Approved => BadgeVariant::Ok,
        ApprovalStatus::Rejected => BadgeVariant::Danger,
    }
}

pub fn log_event_badge(event_type: &str) -> BadgeVariant {
    match event_type {
        "approval" => BadgeVariant::Warn,
        "step" => BadgeVariant::Neutral,
        _ => BadgeVariant::Ok,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepPanel {
    pub key: String,
    pub title: String,
    pub risk: String,
    pub risk_badge: BadgeVariant,
    pub status: &'static str,
    pub status_badge: BadgeVariant,
    pub output: String,
    pub error: Option<String>,
}

/// One panel per step, in index order. `None` when there is nothing to show.
pub fn render_steps(steps: Option<&[Step]>) -> Option<Vec<StepPanel>> {
    let steps = steps.filter(|s| !s.is_empty())?;
    let mut ordered: Vec<&Step> = steps.iter().collect();
    ordered.sort_by_key(|s| s.index);

    Some(
        ordered
            .into_iter()
            .map(|s| StepPanel {
                key: format!("{}-{}", s.index, s.tool),
                title: format!("Step {}: {}", s.index, s.tool),
                risk: s.risk.to_string(),
                risk_badge: risk_badge(&s.risk),
                status: s.status.as_str(),
                status_badge: step_status_badge(s.status),
                output: pretty_json(&s.output),
                error: s.error.clone().filter(|e| !e.is_empty()),
            })
            .collect(),
    )
}

pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Renders an engine timestamp in local-ish form, falling back to the raw text.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return dt.format("%Y-%m-%d %H:%M:%S %:z").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    ts.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: u32, tool: &str, risk: &str, status: StepStatus) -> Step {
        Step {
            index,
            tool: tool.into(),
            risk: RiskLevel::from(risk.to_string()),
            status,
            output: serde_json::json!({"ok": true}),
            error: None,
        }
    }

    #[test]
    fn nothing_to_render() {
        assert_eq!(render_steps(None), None);
        assert_eq!(render_steps(Some(&[][..])), None);
    }

    #[test]
    fn one_panel_per_step_in_index_order() {
        let steps = vec![
            step(2, "facebook.post", "high", StepStatus::QueuedApproval),
            step(1, "shopify.research", "low", StepStatus::Executed),
            step(3, "whatsapp.send", "medium", StepStatus::Blocked),
        ];
        let panels = render_steps(Some(steps.as_slice())).expect("panels");

        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].title, "Step 1: shopify.research");
        assert_eq!(panels[0].status_badge, BadgeVariant::Ok);
        assert_eq!(panels[1].key, "2-facebook.post");
        assert_eq!(panels[1].risk_badge, BadgeVariant::Danger);
        assert_eq!(panels[1].status_badge, BadgeVariant::Warn);
        assert_eq!(panels[2].risk_badge, BadgeVariant::Warn);
        assert_eq!(panels[2].status_badge, BadgeVariant::Danger);

        let mut keys: Vec<_> = panels.iter().map(|p| p.key.clone()).collect();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn carries_step_error() {
        let mut s = step(1, "facebook.reply_comment", "high", StepStatus::Error);
        s.error = Some("token expired".into());
        let panels = render_steps(Some(std::slice::from_ref(&s))).expect("panels");
        assert_eq!(panels[0].error.as_deref(), Some("token expired"));
        assert!(panels[0].output.contains("\"ok\": true"));
    }

    #[test]
    fn badges_follow_status_vocabulary() {
        assert_eq!(run_status_badge("completed"), BadgeVariant::Ok);
        assert_eq!(run_status_badge("failed"), BadgeVariant::Warn);
        assert_eq!(run_status_badge("needs_approval"), BadgeVariant::Warn);
        assert_eq!(
            approval_status_badge(ApprovalStatus::Rejected),
            BadgeVariant::Danger
        );
        assert_eq!(log_event_badge("step"), BadgeVariant::Neutral);
    }

    #[test]
    fn formats_engine_timestamps() {
        assert_eq!(
            format_timestamp("2024-05-01T10:00:00+00:00"),
            "2024-05-01 10:00:00 +00:00"
        );
        assert_eq!(
            format_timestamp("2024-05-01T10:00:00.123456"),
            "2024-05-01 10:00:00"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
