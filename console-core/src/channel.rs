//! Automation channels and the command templates each one composes.

use crate::error::ConsoleError;
use crate::model::Run;

pub const AUTOPILOT_TOOL: &str = "shopify.autopilot_add_product";
pub const SHOPIFY_AUTOPILOT_COMMAND: &str = "Add a product in my store";
pub const FACEBOOK_BATCH_COMMAND: &str = "Generate 7 posts and queue for approval";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Jarvis,
    Shopify,
    Facebook,
    WhatsApp,
}

impl Channel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Jarvis => "Jarvis Voice Mode",
            Self::Shopify => "Shopify Automation",
            Self::Facebook => "Facebook Automation",
            Self::WhatsApp => "WhatsApp Automation",
        }
    }

    pub fn default_input(self) -> &'static str {
        match self {
            Self::Shopify => SHOPIFY_AUTOPILOT_COMMAND,
            Self::Jarvis | Self::Facebook | Self::WhatsApp => "",
        }
    }

    /// Channel-specific reading of a finished run.
    pub fn interpret(self, run: &Run) -> Option<Highlight> {
        match self {
            Self::Shopify => AutopilotOutcome::from_run(run).map(Highlight::Autopilot),
            Self::Jarvis | Self::Facebook | Self::WhatsApp => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandTemplate {
    FreeText(String),
    FacebookPost { product: String },
    FacebookCommentReply { comment_id: String, text: String },
    FacebookDmReply { user_id: String, text: String },
    FacebookBatch,
    WhatsAppReply { to: String, text: String },
    ShopifyAutopilot,
}

impl CommandTemplate {
    /// Produces the natural-language command sent to the engine. Every field
    /// substituted into the template must be non-blank.
    pub fn render(&self) -> Result<String, ConsoleError> {
        let text = match self {
            Self::FreeText(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ConsoleError::EmptyCommand);
                }
                text.to_string()
            }
            Self::FacebookPost { product } => {
                format!(
                    "Create a Facebook post about product {}",
                    required("product", product)?
                )
            }
            Self::FacebookCommentReply { comment_id, text } => format!(
                "Reply to comment {} with {}",
                required("comment id", comment_id)?,
                required("reply text", text)?
            ),
            Self::FacebookDmReply { user_id, text } => format!(
                "Reply to message from user {} {}",
                required("user id", user_id)?,
                required("reply text", text)?
            ),
            Self::FacebookBatch => FACEBOOK_BATCH_COMMAND.to_string(),
            Self::WhatsAppReply { to, text } => format!(
                "Reply on WhatsApp to {} with {}",
                required("recipient", to)?,
                required("message text", text)?
            ),
            Self::ShopifyAutopilot => SHOPIFY_AUTOPILOT_COMMAND.to_string(),
        };
        Ok(text)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConsoleError> {
    let v = value.trim();
    if v.is_empty() {
        Err(ConsoleError::MissingField(field))
    } else {
        Ok(v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Highlight {
    Autopilot(AutopilotOutcome),
}

/// What the storefront autopilot step reported.
#[derive(Clone, Debug, PartialEq)]
pub enum AutopilotOutcome {
    Listed {
        simulated: bool,
        title: String,
        price: Option<f64>,
        compare_at: Option<f64>,
        admin_url: Option<String>,
        note: Option<String>,
    },
    Failed {
        reason: String,
    },
}

impl AutopilotOutcome {
    pub fn from_run(run: &Run) -> Option<Self> {
        let output = &run.step_for_tool(AUTOPILOT_TOOL)?.output;
        let text = |key: &str| {
            output
                .get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        if output.get("ok").and_then(serde_json::Value::as_bool) != Some(true) {
            let reason = output
                .get("error")
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "Check steps below for details.".to_string());
            return Some(Self::Failed { reason });
        }

        Some(Self::Listed {
            simulated: output
                .get("simulated")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            title: text("title").unwrap_or_default(),
            price: output.get("price").and_then(serde_json::Value::as_f64),
            compare_at: output.get("compare_at").and_then(serde_json::Value::as_f64),
            admin_url: text("admin_url"),
            note: text("note"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, Step, StepStatus};

    fn run_with_output(output: serde_json::Value) -> Run {
        Run {
            run_id: 1,
            status: "completed".into(),
            summary: "Completed.".into(),
            steps: vec![Step {
                index: 1,
                tool: AUTOPILOT_TOOL.into(),
                risk: RiskLevel::High,
                status: StepStatus::Executed,
                output,
                error: None,
            }],
            approvals_queued: 0,
        }
    }

    #[test]
    fn renders_channel_templates() {
        let post = CommandTemplate::FacebookPost {
            product: " AirBrush Pro ".into(),
        };
        assert_eq!(
            post.render().expect("post"),
            "Create a Facebook post about product AirBrush Pro"
        );

        let wa = CommandTemplate::WhatsAppReply {
            to: "8801555123456".into(),
            text: "Hello!".into(),
        };
        assert_eq!(
            wa.render().expect("wa"),
            "Reply on WhatsApp to 8801555123456 with Hello!"
        );

        let dm = CommandTemplate::FacebookDmReply {
            user_id: "999".into(),
            text: "Please share your order number".into(),
        };
        assert_eq!(
            dm.render().expect("dm"),
            "Reply to message from user 999 Please share your order number"
        );
    }

    #[test]
    fn blank_template_fields_are_refused() {
        let err = CommandTemplate::WhatsAppReply {
            to: "  ".into(),
            text: "hi".into(),
        }
        .render()
        .unwrap_err();
        assert_eq!(err, ConsoleError::MissingField("recipient"));

        let err = CommandTemplate::FreeText("\n\t".into()).render().unwrap_err();
        assert_eq!(err, ConsoleError::EmptyCommand);
    }

    #[test]
    fn reads_published_autopilot_step() {
        let run = run_with_output(serde_json::json!({
            "ok": true,
            "simulated": true,
            "title": "Mini Compressor",
            "price": 39.99,
            "compare_at": 59.99,
            "admin_url": ""
        }));

        assert_eq!(
            Channel::Shopify.interpret(&run),
            Some(Highlight::Autopilot(AutopilotOutcome::Listed {
                simulated: true,
                title: "Mini Compressor".into(),
                price: Some(39.99),
                compare_at: Some(59.99),
                admin_url: None,
                note: None,
            }))
        );
        assert_eq!(Channel::Facebook.interpret(&run), None);
    }

    #[test]
    fn reads_failed_autopilot_step() {
        let run = run_with_output(serde_json::json!({"ok": false, "error": "live_research_failed"}));
        assert_eq!(
            AutopilotOutcome::from_run(&run),
            Some(AutopilotOutcome::Failed {
                reason: "live_research_failed".into()
            })
        );

        let run = run_with_output(serde_json::json!({}));
        assert_eq!(
            AutopilotOutcome::from_run(&run),
            Some(AutopilotOutcome::Failed {
                reason: "Check steps below for details.".into()
            })
        );
    }
}
