use crate::channel::{Channel, CommandTemplate, Highlight};
use crate::error::ConsoleError;
use crate::model::Run;
use crate::transport::EngineApi;

/// Ticket for one in-flight command. Only the newest ticket can settle.
#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    seq: u64,
    pub command: String,
}

/// Per-view state of one command console.
///
/// The previous run stays on screen until a new one replaces it; a failed
/// submission only sets the error.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsoleSession {
    channel: Channel,
    input: String,
    busy: bool,
    run: Option<Run>,
    error: Option<String>,
    seq: u64,
}

impl ConsoleSession {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            input: channel.default_input().to_string(),
            busy: false,
            run: None,
            error: None,
            seq: 0,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.run.as_ref().and_then(|r| self.channel.interpret(r))
    }

    /// Whether the free-text input could be submitted right now.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.input.trim().is_empty()
    }

    /// Marks the console busy and hands back the command to send.
    ///
    /// Refused while another submission is outstanding, and for blank
    /// input; neither case changes state.
    pub fn begin(&mut self, template: &CommandTemplate) -> Result<Submission, ConsoleError> {
        if self.busy {
            return Err(ConsoleError::Busy);
        }
        let command = template.render()?;

        self.busy = true;
        self.error = None;
        self.seq += 1;
        tracing::debug!(channel = ?self.channel, seq = self.seq, %command, "dispatching command");
        Ok(Submission {
            seq: self.seq,
            command,
        })
    }

    pub fn begin_input(&mut self) -> Result<Submission, ConsoleError> {
        let template = CommandTemplate::FreeText(self.input.clone());
        self.begin(&template)
    }

    /// Applies the engine's answer. Returns `false` when the ticket was
    /// superseded and the outcome was dropped.
    pub fn settle(&mut self, submission: Submission, outcome: Result<Run, ConsoleError>) -> bool {
        if !self.busy || submission.seq != self.seq {
            tracing::debug!(seq = submission.seq, "dropping stale command outcome");
            return false;
        }
        self.busy = false;

        match outcome {
            Ok(run) => {
                tracing::info!(
                    channel = ?self.channel,
                    run_id = run.run_id,
                    status = %run.status,
                    steps = run.steps.len(),
                    "command settled"
                );
                self.error = None;
                self.run = Some(run);
            }
            Err(e) => {
                tracing::warn!(channel = ?self.channel, error = %e, "command failed");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Forgets any in-flight submission so its outcome is ignored.
    pub fn abandon(&mut self) {
        if self.busy {
            self.busy = false;
            self.seq += 1;
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn EngineApi,
        template: &CommandTemplate,
    ) -> Result<Run, ConsoleError> {
        let submission = self.begin(template)?;
        let outcome = api.submit_command(&submission.command).await;
        let result = outcome.clone();
        self.settle(submission, outcome);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, Step, StepStatus};
    use crate::transport::fake::{run, ScriptedEngine};
    use futures::executor::block_on;

    fn free(text: &str) -> CommandTemplate {
        CommandTemplate::FreeText(text.into())
    }

    #[test]
    fn submits_once_and_stores_run() {
        let api = ScriptedEngine::default();
        let mut reply = run(42, "completed", "Drafted 1 product");
        reply.steps.push(Step {
            index: 1,
            tool: "shopify.research".into(),
            risk: RiskLevel::Low,
            status: StepStatus::Executed,
            output: serde_json::json!({"ok": true}),
            error: None,
        });
        api.push_command(Ok(reply.clone()));

        let mut console = ConsoleSession::new(Channel::Jarvis);
        let got = block_on(console.submit(&api, &free("Add a winning product and prepare it to sell")))
            .expect("run");

        assert_eq!(got, reply);
        assert_eq!(api.command_calls(), 1);
        assert_eq!(
            api.sent_commands.borrow()[0],
            "Add a winning product and prepare it to sell"
        );
        assert_eq!(console.run(), Some(&reply));
        assert!(console.error().is_none());
        assert!(!console.is_busy());
    }

    #[test]
    fn blank_input_makes_no_call() {
        let api = ScriptedEngine::default();
        let mut console = ConsoleSession::new(Channel::Jarvis);

        for text in ["", "   ", "\n\t"] {
            let err = block_on(console.submit(&api, &free(text))).unwrap_err();
            assert_eq!(err, ConsoleError::EmptyCommand);
        }
        assert_eq!(api.command_calls(), 0);
        assert!(!console.is_busy());
        assert!(console.error().is_none());
    }

    #[test]
    fn second_submission_while_busy_is_refused() {
        let api = ScriptedEngine::default();
        api.push_command(Ok(run(1, "completed", "ok")));
        let mut console = ConsoleSession::new(Channel::Facebook);

        let first = console.begin(&free("first")).expect("first");
        assert!(console.is_busy());
        assert!(!console.can_submit());

        let err = block_on(console.submit(&api, &free("second"))).unwrap_err();
        assert_eq!(err, ConsoleError::Busy);
        assert_eq!(api.command_calls(), 0);

        let outcome = block_on(api.submit_command(&first.command));
        assert!(console.settle(first, outcome));
        assert_eq!(api.command_calls(), 1);
        assert_eq!(console.run().map(|r| r.run_id), Some(1));
    }

    #[test]
    fn transport_failure_releases_busy_and_keeps_previous_run() {
        let api = ScriptedEngine::default();
        api.push_command(Ok(run(1, "completed", "first")));
        api.push_command(Err(ConsoleError::Transport("connection refused".into())));
        let mut console = ConsoleSession::new(Channel::WhatsApp);

        block_on(console.submit(&api, &free("one"))).expect("first run");
        let err = block_on(console.submit(&api, &free("two"))).unwrap_err();

        assert!(matches!(err, ConsoleError::Transport(_)));
        assert!(!console.is_busy());
        assert_eq!(console.error(), Some("network error: connection refused"));
        assert_eq!(console.run().map(|r| r.run_id), Some(1));

        api.push_command(Ok(run(2, "completed", "third")));
        block_on(console.submit(&api, &free("three"))).expect("recovered");
        assert!(console.error().is_none());
        assert_eq!(console.run().map(|r| r.run_id), Some(2));
    }

    #[test]
    fn abandoned_submission_is_ignored_on_settle() {
        let mut console = ConsoleSession::new(Channel::Shopify);
        let ticket = console.begin(&CommandTemplate::ShopifyAutopilot).expect("begin");
        console.abandon();

        assert!(!console.settle(ticket, Ok(run(9, "completed", "late"))));
        assert!(console.run().is_none());
        assert!(!console.is_busy());
    }

    #[test]
    fn teardown_mid_flight_drops_late_outcomes() {
        let mut console = ConsoleSession::new(Channel::Jarvis);
        console.set_input("publish the draft");
        let orphan = console.begin_input().expect("begin");

        console.abandon();
        assert!(!console.is_busy());
        assert!(!console.settle(orphan, Err(ConsoleError::Transport("aborted".into()))));
        assert!(console.error().is_none());

        let orphan = console.begin_input().expect("begin");
        console.abandon();
        let current = console.begin_input().expect("begin again");
        assert!(!console.settle(orphan, Ok(run(1, "completed", "stale"))));
        assert!(console.is_busy());
        assert!(console.settle(current, Ok(run(2, "completed", "fresh"))));
        assert_eq!(console.run().map(|r| r.run_id), Some(2));

        console.abandon();
        assert_eq!(console.run().map(|r| r.run_id), Some(2));
    }

    #[test]
    fn storefront_starts_with_autopilot_command() {
        let console = ConsoleSession::new(Channel::Shopify);
        assert_eq!(console.input(), "Add a product in my store");
        assert!(console.can_submit());
    }
}
