use crate::bridge::HttpEngine;
use crate::components::{Badge, Card, ErrorLine, RunCard};
use console_core::approvals::ApprovalQueue;
use console_core::steps::{approval_status_badge, format_timestamp, pretty_json, risk_badge};
use console_core::{ApprovalItem, Decision, EngineApi};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn ApprovalsPage() -> impl IntoView {
    let engine = store_value(expect_context::<HttpEngine>());
    let queue = create_rw_signal(ApprovalQueue::new());

    let refresh = move || {
        let Some(ticket) = queue.try_update(|q| q.begin_refresh()) else {
            return;
        };
        let engine = engine.get_value();
        spawn_local(async move {
            let outcome = engine.list_approvals().await;
            queue.try_update(|q| q.apply_refresh(ticket, outcome));
        });
    };

    let act = move |id: i64, decision: Decision| {
        let ticket = match queue.try_update(|q| q.begin_decide(id, decision)) {
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                tracing::debug!(id, error = %e, "decision refused");
                return;
            }
            None => return,
        };
        let engine = engine.get_value();
        spawn_local(async move {
            let outcome = engine
                .decide_approval(ticket.id, ticket.decision, &ticket.note)
                .await;
            if queue.try_update(|q| q.settle_decide(ticket, outcome)) == Some(true) {
                refresh();
            }
        });
    };

    refresh();

    let error = Signal::derive(move || queue.with(|q| q.error().map(ToString::to_string)));
    let right = view! { <button on:click=move |_| refresh()>"Refresh"</button> }.into_view();

    view! {
      <div class="stack">
        <Card title="Approvals Queue" right=right>
          <p class="meta">
            "High-risk actions are queued here. Approving executes the queued tool call with policy enforcement."
          </p>
          <ErrorLine message=error/>
        </Card>

        {move || queue.with(|q| q.last_execution().cloned()).map(|run| view! {
          <RunCard run=run heading="Last execution"/>
        })}

        <div class="stack">
          <For
            each=move || queue.with(|q| q.items().to_vec())
            key=|a| (a.id, a.status.as_str())
            children=move |a: ApprovalItem| {
              let id = a.id;
              let right = view! {
                <div class="row">
                  <Badge variant=risk_badge(&a.risk_level) label=a.risk_level.to_string()/>
                  <Badge variant=approval_status_badge(a.status) label=a.status.as_str()/>
                </div>
              }
              .into_view();
              let footer = if a.is_actionable() {
                  view! {
                    <div class="stack">
                      <input
                        prop:value=move || queue.with(|q| q.note(id).to_string())
                        on:input=move |ev| queue.update(|q| q.set_note(id, event_target_value(&ev)))
                        placeholder="Decision note (optional)"
                      />
                      <div class="row">
                        <button
                          class="ok"
                          on:click=move |_| act(id, Decision::Approve)
                          disabled=move || !queue.with(|q| q.can_decide(id))
                        >
                          "Approve"
                        </button>
                        <button
                          class="danger"
                          on:click=move |_| act(id, Decision::Reject)
                          disabled=move || !queue.with(|q| q.can_decide(id))
                        >
                          "Reject"
                        </button>
                      </div>
                    </div>
                  }
                  .into_view()
              } else {
                  let note = if a.decision_note.is_empty() { "-".to_string() } else { a.decision_note.clone() };
                  view! { <p class="meta">{format!("Decision note: {note}")}</p> }.into_view()
              };

              view! {
                <Card title=format!("Approval #{}: {}", a.id, a.tool_name) right=right>
                  <div class="meta">
                    <div>{format!("Created: {}", format_timestamp(&a.created_at))}</div>
                    {a.decided_at.as_deref().map(|d| view! { <div>{format!("Decided: {}", format_timestamp(d))}</div> })}
                    <div>{format!("Run ID: {}", a.run_id.map_or_else(|| "-".to_string(), |r| r.to_string()))}</div>
                  </div>
                  <pre class="output">{pretty_json(&a.tool_args)}</pre>
                  {footer}
                </Card>
              }
            }
          />
        </div>
      </div>
    }
}
