use crate::components::{Badge, Card, ErrorLine, RunOutput};
use crate::session::use_console;
use crate::speech::{EventSink, WebSpeech};
use console_core::config::ConsoleConfig;
use console_core::steps::BadgeVariant;
use console_core::voice::RecognitionOptions;
use console_core::{Channel, CommandTemplate, VoiceBridge};
use leptos::*;
use std::rc::Rc;

#[component]
pub fn JarvisPage() -> impl IntoView {
    let console = use_console(Channel::Jarvis);
    let session = console.session;
    let config = expect_context::<ConsoleConfig>();

    let listening = create_rw_signal(false);
    let voice_error = create_rw_signal(None::<String>);
    let bridge = store_value(None::<VoiceBridge<WebSpeech>>);

    let sync = move || {
        bridge.try_with_value(|b| {
            if let Some(b) = b {
                listening.try_set(b.is_listening());
                voice_error.try_set(b.error().map(ToString::to_string));
            }
        });
    };

    let sink: EventSink = Rc::new(move |event| {
        let text = bridge
            .try_update_value(|b| b.as_mut().and_then(|b| b.handle(event)))
            .flatten();
        if let Some(text) = text {
            session.try_update(|s| s.set_input(text));
        }
        sync();
    });
    bridge.set_value(Some(VoiceBridge::new(
        WebSpeech::new(sink),
        RecognitionOptions::new(config.speech_lang.clone()),
    )));

    on_cleanup(move || {
        bridge.try_update_value(|b| {
            if let Some(b) = b {
                b.dispose();
            }
        });
    });

    let toggle_mic = move || {
        session.update(|s| s.clear_error());
        bridge.update_value(|b| {
            if let Some(b) = b {
                b.toggle();
            }
        });
        sync();
    };

    let run = move || {
        voice_error.set(None);
        let template = session.with_untracked(|s| CommandTemplate::FreeText(s.input().to_string()));
        console.run(template, move |run| {
            bridge.try_update_value(|b| {
                if let Some(b) = b {
                    b.announce(run);
                }
            });
        });
    };

    let header = view! {
      <div class="row">
        {move || if listening.get() {
            view! { <Badge variant=BadgeVariant::Ok label="listening"/> }.into_view()
        } else {
            view! { <Badge variant=BadgeVariant::Neutral label="idle"/> }.into_view()
        }}
        <button on:click=move |_| toggle_mic()>
          {move || if listening.get() { "Stop mic" } else { "Mic" }}
        </button>
      </div>
    }
    .into_view();

    let error = Signal::derive(move || {
        voice_error
            .get()
            .or_else(|| session.with(|s| s.error().map(ToString::to_string)))
    });

    view! {
      <div class="stack">
        <Card title=Channel::Jarvis.title() right=header>
          <p class="meta">"Voice uses the Web Speech API. If unavailable, type a command and submit."</p>
          <div class="stack">
            <textarea
              prop:value=move || session.with(|s| s.input().to_string())
              on:input=move |ev| session.update(|s| s.set_input(event_target_value(&ev)))
              placeholder="Say or type a command..."
            />
            <div class="row">
              <button
                on:click=move |_| run()
                disabled=move || !session.with(|s| s.can_submit())
              >
                {move || if console.busy() { "Running..." } else { "Run" }}
              </button>
              <button on:click=move |_| session.update(|s| s.set_input(""))>"Clear"</button>
            </div>
            <ErrorLine message=error/>
          </div>
        </Card>

        <RunOutput session=session/>
      </div>
    }
}
