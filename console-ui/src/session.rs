//! Reactive wrapper around [`ConsoleSession`]: one per channel view.

use crate::bridge::HttpEngine;
use console_core::config::ConsoleConfig;
use console_core::progress::ProgressSimulator;
use console_core::{Channel, CommandTemplate, ConsoleError, ConsoleSession, EngineApi, Run};
use gloo_timers::callback::Interval;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Copy)]
pub struct ConsoleHandle {
    pub session: RwSignal<ConsoleSession>,
    pub progress: RwSignal<ProgressSimulator>,
    engine: StoredValue<HttpEngine>,
    ticker: StoredValue<Option<Interval>>,
    tick_ms: u32,
    simulate_progress: bool,
}

pub fn use_console(channel: Channel) -> ConsoleHandle {
    let engine = expect_context::<HttpEngine>();
    let config = expect_context::<ConsoleConfig>();
    let ticker = store_value(None::<Interval>);
    let session = create_rw_signal(ConsoleSession::new(channel));

    on_cleanup(move || {
        ticker.try_update_value(|t| *t = None);
        session.try_update(ConsoleSession::abandon);
    });

    ConsoleHandle {
        session,
        progress: create_rw_signal(ProgressSimulator::new()),
        engine: store_value(engine),
        ticker,
        tick_ms: config.progress_tick_ms,
        simulate_progress: channel == Channel::Shopify,
    }
}

impl ConsoleHandle {
    pub fn busy(self) -> bool {
        self.session.with(ConsoleSession::is_busy)
    }

    pub fn run_input(self) {
        let template = self
            .session
            .with_untracked(|s| CommandTemplate::FreeText(s.input().to_string()));
        self.run(template, |_| {});
    }

    /// Dispatches a command; `on_run` sees the run only if this view is
    /// still alive when it lands.
    pub fn run(self, template: CommandTemplate, on_run: impl FnOnce(&Run) + 'static) {
        let submission = match self.session.try_update(|s| s.begin(&template)) {
            Some(Ok(submission)) => submission,
            Some(Err(e @ ConsoleError::MissingField(_))) => {
                self.session.update(|s| s.set_error(e.to_string()));
                return;
            }
            Some(Err(e)) => {
                tracing::debug!(error = %e, "submission refused");
                return;
            }
            None => return,
        };

        self.start_progress();
        let engine = self.engine.get_value();
        spawn_local(async move {
            let outcome = engine.submit_command(&submission.command).await;
            let succeeded = outcome.is_ok();
            let run = outcome.as_ref().ok().cloned();

            let applied = self
                .session
                .try_update(|s| s.settle(submission, outcome))
                .unwrap_or(false);
            self.stop_progress(succeeded);

            if let (true, Some(run)) = (applied, run) {
                on_run(&run);
            }
        });
    }

    fn start_progress(self) {
        if !self.simulate_progress {
            return;
        }
        self.progress.update(ProgressSimulator::start);
        let progress = self.progress;
        let interval = Interval::new(self.tick_ms, move || {
            progress.try_update(|p| {
                p.tick();
            });
        });
        self.ticker.set_value(Some(interval));
    }

    fn stop_progress(self, succeeded: bool) {
        if !self.simulate_progress {
            return;
        }
        self.ticker.try_update_value(|t| *t = None);
        self.progress.try_update(|p| p.finish(succeeded));
    }
}
