use crate::components::{Badge, Card, ErrorLine, RunOutput};
use crate::session::use_console;
use console_core::channel::{AutopilotOutcome, Highlight, SHOPIFY_AUTOPILOT_COMMAND};
use console_core::steps::BadgeVariant;
use console_core::Channel;
use leptos::*;

fn money(v: Option<f64>) -> String {
    v.map(|p| format!("${p:.2}")).unwrap_or_else(|| "-".into())
}

#[component]
fn AutopilotPanel(outcome: AutopilotOutcome) -> impl IntoView {
    match outcome {
        AutopilotOutcome::Listed {
            simulated,
            title,
            price,
            compare_at,
            admin_url,
            note,
        } => view! {
          <div class="stack">
            <div class="row">
              {if simulated {
                  view! { <Badge variant=BadgeVariant::Warn label="simulated"/> }.into_view()
              } else {
                  view! { <Badge variant=BadgeVariant::Ok label="published"/> }.into_view()
              }}
              <b>{title}</b>
            </div>
            <div class="meta">{format!("Price: {} (compare at {})", money(price), money(compare_at))}</div>
            {admin_url.map(|url| view! {
              <div class="meta">"Admin: " <a href=url target="_blank" rel="noopener noreferrer">"open in Shopify"</a></div>
            })}
            {note.map(|n| view! { <div class="error">{n}</div> })}
          </div>
        }
        .into_view(),
        AutopilotOutcome::Failed { reason } => view! {
          <div class="stack">
            <b class="warn">"Autopilot failed"</b>
            <div class="meta">{reason}</div>
          </div>
        }
        .into_view(),
    }
}

#[component]
pub fn ShopifyPage() -> impl IntoView {
    let console = use_console(Channel::Shopify);
    let session = console.session;
    let progress = console.progress;

    let header = view! {
      <div class="row">
        {move || if console.busy() {
            view! { <Badge variant=BadgeVariant::Warn label="running"/> }.into_view()
        } else {
            view! { <Badge variant=BadgeVariant::Ok label="ready"/> }.into_view()
        }}
        <Badge variant=BadgeVariant::Neutral label="one-command autopilot"/>
      </div>
    }
    .into_view();

    let error = Signal::derive(move || session.with(|s| s.error().map(ToString::to_string)));

    view! {
      <div class="stack">
        <Card title=Channel::Shopify.title() right=header>
          <p class="meta">
            "Type one command. Recommended: \"" {SHOPIFY_AUTOPILOT_COMMAND}
            "\" (research → pricing → copy → image → publish)."
          </p>
          <div class="stack">
            <textarea
              prop:value=move || session.with(|s| s.input().to_string())
              on:input=move |ev| session.update(|s| s.set_input(event_target_value(&ev)))
              placeholder="Example: Add a product in my store niche=\"home\" qty=50"
            />
            <div class="row">
              <button
                on:click=move |_| console.run_input()
                disabled=move || !session.with(|s| s.can_submit())
              >
                {move || if console.busy() { "Running..." } else { "Run Command" }}
              </button>
              <button
                on:click=move |_| session.update(|s| s.set_input(SHOPIFY_AUTOPILOT_COMMAND))
                disabled=move || console.busy()
              >
                "Use autopilot template"
              </button>
              <button
                on:click=move |_| session.update(|s| s.set_input(""))
                disabled=move || console.busy()
              >
                "Clear"
              </button>
            </div>

            <Show when=move || console.busy() fallback=|| ()>
              <div class="progress">
                <div class="row meta">
                  <span>"Executing..."</span>
                  <span>{move || format!("{}%", progress.with(|p| p.percent()))}</span>
                </div>
                <div class="bar">
                  <div class="fill" style=move || format!("width: {}%", progress.with(|p| p.percent()))></div>
                </div>
              </div>
            </Show>

            <ErrorLine message=error/>
          </div>
        </Card>

        {move || session.with(|s| s.highlight()).map(|h| match h {
            Highlight::Autopilot(outcome) => view! {
              <Card title="Autopilot">
                <AutopilotPanel outcome=outcome/>
              </Card>
            },
        })}
        <RunOutput session=session/>
      </div>
    }
}
