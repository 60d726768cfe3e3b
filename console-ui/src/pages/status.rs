use crate::bridge::HttpEngine;
use crate::components::{Badge, Card, ErrorLine};
use console_core::steps::{pretty_json, BadgeVariant};
use console_core::{BackendStatus, EngineApi, StatusSummary};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn StatusPage() -> impl IntoView {
    let engine = expect_context::<HttpEngine>();
    let status = create_rw_signal(None::<BackendStatus>);
    let summary = create_rw_signal(None::<StatusSummary>);
    let error = create_rw_signal(None::<String>);

    spawn_local(async move {
        let st = engine.fetch_status().await;
        let sm = engine.fetch_summary().await;
        let mut errs = Vec::new();

        match st {
            Ok(v) => {
                status.try_set(Some(v));
            }
            Err(e) => errs.push(format!("status: {e}")),
        }
        match sm {
            Ok(v) => {
                summary.try_set(Some(v));
            }
            Err(e) => errs.push(format!("summary: {e}")),
        }
        error.try_set((!errs.is_empty()).then(|| errs.join("\n")));
    });

    view! {
      <div class="stack">
        <ErrorLine message=Signal::from(error)/>
        {move || status.get().map(|s| {
            let right = view! {
              <div class="row">
                {if s.dry_run {
                    view! { <Badge variant=BadgeVariant::Warn label="DRY_RUN=1"/> }.into_view()
                } else {
                    view! { <Badge variant=BadgeVariant::Ok label="DRY_RUN=0"/> }.into_view()
                }}
                {if s.ok {
                    view! { <Badge variant=BadgeVariant::Ok label="ok"/> }.into_view()
                } else {
                    view! { <Badge variant=BadgeVariant::Danger label="down"/> }.into_view()
                }}
              </div>
            }
            .into_view();
            let body = serde_json::to_value(&s).map(|v| pretty_json(&v)).unwrap_or_default();
            view! {
              <Card title="System Status" right=right>
                <pre class="output">{body}</pre>
              </Card>
            }
        })}
        {move || summary.get().map(|s| {
            let variant = if s.pending_approvals > 0 { BadgeVariant::Warn } else { BadgeVariant::Ok };
            let right = view! { <Badge variant=variant label=format!("{} pending", s.pending_approvals)/> }
                .into_view();
            let body = serde_json::to_value(&s).map(|v| pretty_json(&v)).unwrap_or_default();
            view! {
              <Card title="Summary" right=right>
                <pre class="output">{body}</pre>
              </Card>
            }
        })}
      </div>
    }
}
