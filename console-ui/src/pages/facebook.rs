use crate::components::{Badge, Card, ErrorLine, RunOutput};
use crate::session::use_console;
use console_core::steps::BadgeVariant;
use console_core::{Channel, CommandTemplate};
use leptos::*;

#[component]
pub fn FacebookPage() -> impl IntoView {
    let console = use_console(Channel::Facebook);
    let session = console.session;

    let product = create_rw_signal("AirBrush Pro Mini Compressor".to_string());
    let comment_id = create_rw_signal("123".to_string());
    let comment_text =
        create_rw_signal("Sure, please share your order number so we can check.".to_string());
    let user_id = create_rw_signal("999".to_string());
    let dm_text = create_rw_signal(
        "Please share your order number and the email used at checkout.".to_string(),
    );

    let dispatch = move |template: CommandTemplate| console.run(template, |_| {});
    let label = move |idle: &'static str| move || if console.busy() { "Running..." } else { idle };
    let error = Signal::derive(move || session.with(|s| s.error().map(ToString::to_string)));

    let text_input = move |signal: RwSignal<String>, placeholder: &'static str| {
        view! {
          <input
            prop:value=move || signal.get()
            on:input=move |ev| signal.set(event_target_value(&ev))
            placeholder=placeholder
          />
        }
    };

    let right = view! { <Badge variant=BadgeVariant::Warn label="post/replies require approval"/> }
        .into_view();

    view! {
      <div class="stack">
        <Card title=Channel::Facebook.title() right=right>
          <div class="grid">
            <div class="stack">
              <h3>"Create post"</h3>
              {text_input(product, "Product name...")}
              <button
                disabled=move || console.busy()
                on:click=move |_| dispatch(CommandTemplate::FacebookPost { product: product.get_untracked() })
              >
                {label("Generate + Queue approval")}
              </button>
            </div>

            <div class="stack">
              <h3>"Reply to comment"</h3>
              {text_input(comment_id, "Comment ID")}
              {text_input(comment_text, "Reply text...")}
              <button
                disabled=move || console.busy()
                on:click=move |_| dispatch(CommandTemplate::FacebookCommentReply {
                    comment_id: comment_id.get_untracked(),
                    text: comment_text.get_untracked(),
                })
              >
                {label("Queue approval")}
              </button>
            </div>

            <div class="stack">
              <h3>"Reply to DM"</h3>
              {text_input(user_id, "User ID")}
              {text_input(dm_text, "DM reply text...")}
              <button
                disabled=move || console.busy()
                on:click=move |_| dispatch(CommandTemplate::FacebookDmReply {
                    user_id: user_id.get_untracked(),
                    text: dm_text.get_untracked(),
                })
              >
                {label("Queue approval")}
              </button>
            </div>

            <div class="stack">
              <h3>"Generate batch"</h3>
              <p class="meta">"Seven posts, each queued for approval."</p>
              <button
                disabled=move || console.busy()
                on:click=move |_| dispatch(CommandTemplate::FacebookBatch)
              >
                {label("Generate + Queue")}
              </button>
            </div>
          </div>
          <ErrorLine message=error/>
        </Card>

        <RunOutput session=session/>
      </div>
    }
}
