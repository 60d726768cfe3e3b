use console_core::steps::{render_steps, run_status_badge, BadgeVariant};
use console_core::{ConsoleSession, Run, Step};
use leptos::*;

#[component]
pub fn Badge(variant: BadgeVariant, #[prop(into)] label: String) -> impl IntoView {
    view! { <span class=format!("badge {}", variant.class())>{label}</span> }
}

#[component]
pub fn Card(
    #[prop(into)] title: String,
    #[prop(optional)] right: Option<View>,
    children: Children,
) -> impl IntoView {
    view! {
      <section class="panel">
        <div class="row">
          <h2>{title}</h2>
          {right}
        </div>
        {children()}
      </section>
    }
}

#[component]
pub fn ErrorLine(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
      <Show
        when=move || message.with(Option::is_some)
        fallback=|| ()
      >
        <pre class="error">{move || message.get().unwrap_or_default()}</pre>
      </Show>
    }
}

/// Header card for a run: id, status and how many approvals it queued.
#[component]
pub fn RunCard(run: Run, #[prop(optional, into)] heading: Option<String>) -> impl IntoView {
    let title = match heading {
        Some(h) => format!("{h} (Run #{})", run.run_id),
        None => format!("Run #{}", run.run_id),
    };
    let queued = if run.approvals_queued > 0 {
        view! { <Badge variant=BadgeVariant::Warn label=format!("{} approvals", run.approvals_queued)/> }.into_view()
    } else {
        view! { <Badge variant=BadgeVariant::Ok label="no approvals"/> }.into_view()
    };
    let right = view! {
      <div class="row">
        <Badge variant=run_status_badge(&run.status) label=run.status.clone()/>
        {queued}
      </div>
    }
    .into_view();

    view! {
      <Card title=title right=right>
        <p>{run.summary}</p>
      </Card>
    }
}

#[component]
pub fn StepList(steps: Vec<Step>) -> impl IntoView {
    render_steps(Some(steps.as_slice())).map(|panels| {
        view! {
          <div class="stack">
            <For
              each=move || panels.clone()
              key=|p| p.key.clone()
              children=move |p| {
                let right = view! {
                  <div class="row">
                    <Badge variant=p.risk_badge label=p.risk.clone()/>
                    <Badge variant=p.status_badge label=p.status/>
                  </div>
                }
                .into_view();
                view! {
                  <Card title=p.title.clone() right=right>
                    <pre class="output">{p.output.clone()}</pre>
                    {p.error.clone().map(|e| view! { <p class="error">{e}</p> })}
                  </Card>
                }
              }
            />
          </div>
        }
    })
}

/// The console's current run followed by its steps.
#[component]
pub fn RunOutput(session: RwSignal<ConsoleSession>) -> impl IntoView {
    view! {
      {move || session.with(|s| s.run().cloned()).map(|run| view! { <RunCard run=run/> })}
      {move || session.with(|s| s.run().map(|r| r.steps.clone())).map(|steps| view! { <StepList steps=steps/> })}
    }
}
