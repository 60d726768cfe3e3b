use crate::bridge::HttpEngine;
use crate::components::{Badge, Card, ErrorLine};
use console_core::config::{ConsoleConfig, LOG_LIMIT_CHOICES};
use console_core::steps::{format_timestamp, log_event_badge, pretty_json};
use console_core::{AuditLogItem, EngineApi};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn LogsPage() -> impl IntoView {
    let engine = store_value(expect_context::<HttpEngine>());
    let config = expect_context::<ConsoleConfig>();
    let limit = create_rw_signal(config.log_limit);
    let items = create_rw_signal(Vec::<AuditLogItem>::new());
    let error = create_rw_signal(None::<String>);

    let refresh = move || {
        let engine = engine.get_value();
        let limit = limit.get_untracked();
        spawn_local(async move {
            match engine.list_audit_logs(limit, None).await {
                Ok(list) => {
                    items.try_set(list);
                    error.try_set(None);
                }
                Err(e) => {
                    error.try_set(Some(e.to_string()));
                }
            }
        });
    };

    create_effect(move |_| {
        limit.track();
        refresh();
    });

    let right = view! {
      <div class="row">
        <select
          prop:value=move || limit.get().to_string()
          on:change=move |ev| {
              if let Ok(v) = event_target_value(&ev).parse::<u32>() {
                  limit.set(v);
              }
          }
        >
          {LOG_LIMIT_CHOICES
              .iter()
              .map(|n| view! { <option value=n.to_string()>{n.to_string()}</option> })
              .collect_view()}
        </select>
        <button on:click=move |_| refresh()>"Refresh"</button>
      </div>
    }
    .into_view();

    view! {
      <div class="stack">
        <Card title="Audit Logs" right=right>
          <ErrorLine message=Signal::from(error)/>
        </Card>
        <div class="stack">
          <For
            each=move || items.get()
            key=|l| l.id
            children=move |l| {
              let right = view! { <Badge variant=log_event_badge(&l.event_type) label=l.event_type.clone()/> }
                  .into_view();
              view! {
                <Card title=format!("#{}: {}:{}", l.id, l.event_type, l.message) right=right>
                  <div class="meta">
                    <div>{format_timestamp(&l.created_at)}</div>
                    <div>{format!("Run: {}", l.run_id.map_or_else(|| "-".to_string(), |r| r.to_string()))}</div>
                    <div>{format!("Step: {}", l.step_index)}</div>
                  </div>
                  <pre class="output">{pretty_json(&l.payload)}</pre>
                </Card>
              }
            }
          />
        </div>
      </div>
    }
}
