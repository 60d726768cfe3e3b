use crate::error::ConsoleError;
use crate::model::{ApprovalItem, Decision, Run};
use crate::transport::EngineApi;
use std::collections::HashMap;

/// Ticket for the one decision allowed in flight on a queue.
#[derive(Debug, PartialEq, Eq)]
pub struct DecisionTicket {
    pub id: i64,
    pub decision: Decision,
    pub note: String,
}

/// Ticket for one list request. Only the newest ticket may apply its result.
#[derive(Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
}

/// Operator-side view of the engine's approval queue.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApprovalQueue {
    items: Vec<ApprovalItem>,
    notes: HashMap<i64, String>,
    deciding: Option<i64>,
    last_execution: Option<Run>,
    error: Option<String>,
    refresh_seq: u64,
}

impl ApprovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ApprovalItem] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&ApprovalItem> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|a| a.is_actionable()).count()
    }

    pub fn last_execution(&self) -> Option<&Run> {
        self.last_execution.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn deciding(&self) -> Option<i64> {
        self.deciding
    }

    pub fn is_deciding(&self, id: i64) -> bool {
        self.deciding == Some(id)
    }

    /// Whether a decision on `id` would be accepted right now.
    pub fn can_decide(&self, id: i64) -> bool {
        self.deciding.is_none() && self.item(id).is_some_and(ApprovalItem::is_actionable)
    }

    pub fn note(&self, id: i64) -> &str {
        self.notes.get(&id).map(String::as_str).unwrap_or_default()
    }

    pub fn set_note(&mut self, id: i64, note: impl Into<String>) {
        self.notes.insert(id, note.into());
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_seq += 1;
        RefreshTicket {
            seq: self.refresh_seq,
        }
    }

    /// Replaces the whole item set with what the engine returned. A result
    /// for an older ticket than the newest one is dropped; returns whether
    /// the outcome was applied.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        outcome: Result<Vec<ApprovalItem>, ConsoleError>,
    ) -> bool {
        if ticket.seq != self.refresh_seq {
            tracing::debug!(seq = ticket.seq, "dropping stale approval list");
            return false;
        }
        match outcome {
            Ok(items) => {
                tracing::debug!(count = items.len(), "approval queue refreshed");
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "approval refresh failed");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn begin_decide(
        &mut self,
        id: i64,
        decision: Decision,
    ) -> Result<DecisionTicket, ConsoleError> {
        if let Some(busy) = self.deciding {
            return Err(ConsoleError::DecisionInFlight(busy));
        }
        let item = self.item(id).ok_or(ConsoleError::UnknownApproval(id))?;
        if !item.is_actionable() {
            return Err(ConsoleError::NotActionable(id));
        }

        self.deciding = Some(id);
        self.error = None;
        tracing::debug!(id, decision = decision.as_str(), "submitting decision");
        Ok(DecisionTicket {
            id,
            decision,
            note: self.note(id).to_string(),
        })
    }

    /// Releases the guard whatever the outcome. Returns `true` when the queue
    /// should be refreshed.
    pub fn settle_decide(
        &mut self,
        ticket: DecisionTicket,
        outcome: Result<Run, ConsoleError>,
    ) -> bool {
        if self.deciding == Some(ticket.id) {
            self.deciding = None;
        }
        match outcome {
            Ok(run) => {
                tracing::info!(
                    id = ticket.id,
                    decision = ticket.decision.as_str(),
                    run_id = run.run_id,
                    status = %run.status,
                    "decision applied"
                );
                self.notes.remove(&ticket.id);
                self.last_execution = Some(run);
                true
            }
            Err(e) => {
                tracing::warn!(id = ticket.id, error = %e, "decision failed");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub async fn refresh(&mut self, api: &dyn EngineApi) -> &[ApprovalItem] {
        let ticket = self.begin_refresh();
        let outcome = api.list_approvals().await;
        self.apply_refresh(ticket, outcome);
        &self.items
    }

    pub async fn decide(
        &mut self,
        api: &dyn EngineApi,
        id: i64,
        decision: Decision,
    ) -> Result<Run, ConsoleError> {
        let ticket = self.begin_decide(id, decision)?;
        let outcome = api
            .decide_approval(ticket.id, ticket.decision, &ticket.note)
            .await;
        let result = outcome.clone();
        if self.settle_decide(ticket, outcome) {
            self.refresh(api).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApprovalStatus, RiskLevel};
    use crate::transport::fake::{run, ScriptedEngine};
    use futures::executor::block_on;

    fn pending(id: i64, tool: &str) -> ApprovalItem {
        ApprovalItem {
            id,
            created_at: "2024-05-01T10:00:00+00:00".into(),
            decided_at: None,
            run_id: Some(3),
            status: ApprovalStatus::Pending,
            risk_level: RiskLevel::High,
            tool_name: tool.into(),
            tool_args: serde_json::json!({"message": "hello"}),
            decision_note: String::new(),
        }
    }

    fn engine_with(items: Vec<ApprovalItem>) -> ScriptedEngine {
        let api = ScriptedEngine::default();
        *api.approvals.borrow_mut() = items;
        api
    }

    #[test]
    fn refresh_replaces_everything_and_is_stable() {
        let api = engine_with(vec![pending(7, "facebook.post"), pending(8, "whatsapp.send")]);
        let mut queue = ApprovalQueue::new();
        let ticket = queue.begin_refresh();
        queue.apply_refresh(ticket, Ok(vec![pending(99, "stale")]));

        let first = block_on(queue.refresh(&api)).to_vec();
        let second = block_on(queue.refresh(&api)).to_vec();

        assert_eq!(first, second);
        assert_eq!(first.iter().map(|a| a.id).collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(queue.pending_count(), 2);
    }

    #[test]
    fn approve_with_note_then_reconcile() {
        let api = engine_with(vec![pending(7, "facebook.post")]);
        api.push_decision(Ok(run(3, "completed", "Posted.")));
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));

        queue.set_note(7, "looks fine");
        let got = block_on(queue.decide(&api, 7, Decision::Approve)).expect("run");

        assert_eq!(got.status, "completed");
        assert_eq!(
            api.sent_decisions.borrow()[0],
            (7, Decision::Approve, "looks fine".to_string())
        );
        assert_eq!(queue.last_execution().map(|r| r.run_id), Some(3));
        assert_eq!(queue.item(7).map(|a| a.status), Some(ApprovalStatus::Approved));
        assert_eq!(queue.item(7).map(|a| a.decision_note.as_str()), Some("looks fine"));
        assert_eq!(queue.note(7), "");
        assert_eq!(queue.deciding(), None);
        assert_eq!(api.list_calls.get(), 2);
    }

    #[test]
    fn same_item_cannot_be_decided_twice_concurrently() {
        let api = engine_with(vec![pending(7, "facebook.post"), pending(8, "whatsapp.send")]);
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));

        let ticket = queue.begin_decide(7, Decision::Approve).expect("ticket");
        assert!(queue.is_deciding(7));

        let err = block_on(queue.decide(&api, 7, Decision::Reject)).unwrap_err();
        assert_eq!(err, ConsoleError::DecisionInFlight(7));
        let err = queue.begin_decide(8, Decision::Approve).unwrap_err();
        assert_eq!(err, ConsoleError::DecisionInFlight(7));
        assert!(api.sent_decisions.borrow().is_empty());

        queue.settle_decide(ticket, Err(ConsoleError::Transport("timeout".into())));
        assert_eq!(queue.deciding(), None);
        assert!(queue.begin_decide(7, Decision::Approve).is_ok());
    }

    #[test]
    fn failed_decision_releases_guard_and_keeps_note() {
        let api = engine_with(vec![pending(7, "facebook.post")]);
        api.push_decision(Err(ConsoleError::Http {
            status: 500,
            message: "boom".into(),
        }));
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));
        queue.set_note(7, "retry me");

        let err = block_on(queue.decide(&api, 7, Decision::Reject)).unwrap_err();
        assert!(matches!(err, ConsoleError::Http { status: 500, .. }));
        assert_eq!(queue.deciding(), None);
        assert_eq!(queue.note(7), "retry me");
        assert!(queue.last_execution().is_none());
        assert_eq!(
            queue.error(),
            Some("request failed with status 500: boom")
        );
        assert_eq!(api.list_calls.get(), 1);

        api.push_decision(Ok(run(3, "completed", "Rejected.")));
        assert!(block_on(queue.decide(&api, 7, Decision::Reject)).is_ok());
        assert_eq!(queue.item(7).map(|a| a.status), Some(ApprovalStatus::Rejected));
    }

    #[test]
    fn decided_and_unknown_items_are_not_actionable() {
        let mut decided = pending(5, "facebook.post");
        decided.status = ApprovalStatus::Approved;
        let mut queue = ApprovalQueue::new();
        let ticket = queue.begin_refresh();
        queue.apply_refresh(ticket, Ok(vec![decided]));

        assert_eq!(
            queue.begin_decide(5, Decision::Approve).unwrap_err(),
            ConsoleError::NotActionable(5)
        );
        assert_eq!(
            queue.begin_decide(6, Decision::Approve).unwrap_err(),
            ConsoleError::UnknownApproval(6)
        );
        assert_eq!(queue.deciding(), None);
    }

    #[test]
    fn note_is_sent_as_typed() {
        let api = engine_with(vec![pending(7, "facebook.post")]);
        api.push_decision(Ok(run(3, "completed", "Posted.")));
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));

        queue.set_note(7, "  ok,\nship it ");
        block_on(queue.decide(&api, 7, Decision::Approve)).expect("run");

        assert_eq!(api.sent_decisions.borrow()[0].2, "  ok,\nship it ");
    }

    #[test]
    fn late_list_from_older_request_is_dropped() {
        let mut before = pending(7, "facebook.post");
        let mut after = before.clone();
        after.status = ApprovalStatus::Approved;
        before.tool_args = serde_json::json!({"message": "old"});

        let mut queue = ApprovalQueue::new();
        let older = queue.begin_refresh();
        let newer = queue.begin_refresh();

        assert!(queue.apply_refresh(newer, Ok(vec![after])));
        assert!(!queue.apply_refresh(older, Ok(vec![before])));

        assert_eq!(queue.item(7).map(|a| a.status), Some(ApprovalStatus::Approved));
        assert_eq!(
            queue.begin_decide(7, Decision::Approve).unwrap_err(),
            ConsoleError::NotActionable(7)
        );
    }

    #[test]
    fn every_row_is_locked_while_a_decision_is_in_flight() {
        let api = engine_with(vec![pending(7, "facebook.post"), pending(8, "whatsapp.send")]);
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));
        assert!(queue.can_decide(7));
        assert!(queue.can_decide(8));
        assert!(!queue.can_decide(9));

        let ticket = queue.begin_decide(7, Decision::Approve).expect("ticket");
        assert!(!queue.can_decide(7));
        assert!(!queue.can_decide(8));

        queue.settle_decide(ticket, Err(ConsoleError::Transport("timeout".into())));
        assert!(queue.can_decide(8));
    }

    #[test]
    fn failed_refresh_keeps_items() {
        let api = engine_with(vec![pending(7, "facebook.post")]);
        let mut queue = ApprovalQueue::new();
        block_on(queue.refresh(&api));

        *api.approvals_error.borrow_mut() = Some(ConsoleError::Transport("offline".into()));
        block_on(queue.refresh(&api));

        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.error(), Some("network error: offline"));
    }
}
