use crate::bridge::HttpEngine;
use crate::pages::approvals::ApprovalsPage;
use crate::pages::facebook::FacebookPage;
use crate::pages::jarvis::JarvisPage;
use crate::pages::logs::LogsPage;
use crate::pages::shopify::ShopifyPage;
use crate::pages::status::StatusPage;
use crate::pages::whatsapp::WhatsAppPage;
use console_core::config::{self, ConsoleConfig};
use console_core::Channel;
use leptos::*;

/// Resolves the console configuration baked in at build time.
pub fn config() -> ConsoleConfig {
    ConsoleConfig::from_lookup(|key| {
        let value = match key {
            config::ENV_BACKEND_URL => option_env!("CONSOLE_BACKEND_URL"),
            config::ENV_LOG_LIMIT => option_env!("CONSOLE_LOG_LIMIT"),
            config::ENV_SPEECH_LANG => option_env!("CONSOLE_SPEECH_LANG"),
            config::ENV_LOG_LEVEL => option_env!("CONSOLE_LOG_LEVEL"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Home,
    Channel(Channel),
    Approvals,
    Logs,
    Status,
}

impl Page {
    const MODULES: [Page; 7] = [
        Page::Channel(Channel::Jarvis),
        Page::Channel(Channel::Shopify),
        Page::Channel(Channel::Facebook),
        Page::Channel(Channel::WhatsApp),
        Page::Approvals,
        Page::Logs,
        Page::Status,
    ];

    fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Channel(Channel::Jarvis) => "Jarvis",
            Page::Channel(Channel::Shopify) => "Shopify",
            Page::Channel(Channel::Facebook) => "Facebook",
            Page::Channel(Channel::WhatsApp) => "WhatsApp",
            Page::Approvals => "Approvals",
            Page::Logs => "Logs",
            Page::Status => "Status",
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            Page::Home => "",
            Page::Channel(Channel::Jarvis) => "Free-text and voice commands",
            Page::Channel(Channel::Shopify) => "Storefront autopilot",
            Page::Channel(Channel::Facebook) => "Posts, comment and DM replies",
            Page::Channel(Channel::WhatsApp) => "Messaging replies",
            Page::Approvals => "Review queued high-risk actions",
            Page::Logs => "Audit trail",
            Page::Status => "Engine health and summary",
        }
    }

    fn render(self) -> View {
        match self {
            Page::Home => view! { <Home/> }.into_view(),
            Page::Channel(Channel::Jarvis) => view! { <JarvisPage/> }.into_view(),
            Page::Channel(Channel::Shopify) => view! { <ShopifyPage/> }.into_view(),
            Page::Channel(Channel::Facebook) => view! { <FacebookPage/> }.into_view(),
            Page::Channel(Channel::WhatsApp) => view! { <WhatsAppPage/> }.into_view(),
            Page::Approvals => view! { <ApprovalsPage/> }.into_view(),
            Page::Logs => view! { <LogsPage/> }.into_view(),
            Page::Status => view! { <StatusPage/> }.into_view(),
        }
    }
}

#[component]
fn Home() -> impl IntoView {
    let page = expect_context::<RwSignal<Page>>();
    view! {
      <div class="grid">
        {Page::MODULES
            .into_iter()
            .map(|p| view! {
              <button class="module" on:click=move |_| page.set(p)>
                <b>{p.label()}</b>
                <div class="meta">{p.blurb()}</div>
              </button>
            })
            .collect_view()}
      </div>
    }
}

#[component]
pub fn App(config: ConsoleConfig) -> impl IntoView {
    provide_context(HttpEngine::new(config.base_url.clone()));
    provide_context(config);

    let page = create_rw_signal(Page::Home);
    provide_context(page);
    let current = create_memo(move |_| page.get());

    view! {
      <div class="layout">
        <nav class="row">
          {std::iter::once(Page::Home)
              .chain(Page::MODULES)
              .map(|p| view! {
                <button
                  class=move || if current.get() == p { "nav active" } else { "nav" }
                  on:click=move |_| page.set(p)
                >
                  {p.label()}
                </button>
              })
              .collect_view()}
        </nav>
        <main class="stack">
          {move || current.get().render()}
        </main>
      </div>
    }
}
