use crate::components::{Badge, Card, ErrorLine, RunOutput};
use crate::session::use_console;
use console_core::steps::BadgeVariant;
use console_core::{Channel, CommandTemplate};
use leptos::*;

#[component]
pub fn WhatsAppPage() -> impl IntoView {
    let console = use_console(Channel::WhatsApp);
    let session = console.session;

    let to = create_rw_signal("8801555123456".to_string());
    let text = create_rw_signal("Hello! Please share your order number so we can help.".to_string());
    let error = Signal::derive(move || session.with(|s| s.error().map(ToString::to_string)));

    let send = move || {
        console.run(
            CommandTemplate::WhatsAppReply {
                to: to.get_untracked(),
                text: text.get_untracked(),
            },
            |_| {},
        );
    };

    let right =
        view! { <Badge variant=BadgeVariant::Warn label="send requires approval"/> }.into_view();

    view! {
      <div class="stack">
        <Card title=Channel::WhatsApp.title() right=right>
          <div class="stack">
            <div class="row">
              <input
                prop:value=move || to.get()
                on:input=move |ev| to.set(event_target_value(&ev))
                placeholder="Recipient (E.164)"
              />
              <input
                prop:value=move || text.get()
                on:input=move |ev| text.set(event_target_value(&ev))
                placeholder="Message"
              />
            </div>
            <button on:click=move |_| send() disabled=move || console.busy()>
              {move || if console.busy() { "Running..." } else { "Queue approval" }}
            </button>
            <ErrorLine message=error/>
          </div>
        </Card>

        <RunOutput session=session/>
      </div>
    }
}
