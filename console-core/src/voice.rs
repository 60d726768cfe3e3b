//! Voice command channel: speech-to-text into the console input, and
//! text-to-speech of a run's summary.
//!
//! Host speech support is optional. The bridge acquires the platform handles
//! lazily, keeps them for its lifetime and releases them on [`VoiceBridge::dispose`].
//! Nothing here panics or returns an error to the caller; failures land in
//! [`VoiceBridge::error`] and the bridge falls back to idle.

use crate::error::ConsoleError;
use crate::model::Run;

pub const SPOKEN_FALLBACK: &str = "Done.";
pub const SPEECH_RATE: f32 = 1.0;
const GENERIC_RECOGNITION_ERROR: &str = "Speech recognition error";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening,
}

/// Recognizer settings handed to the platform when acquiring a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub lang: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl RecognitionOptions {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            continuous: false,
            interim_results: true,
        }
    }
}

pub trait SpeechRecognizer {
    fn start(&mut self) -> Result<(), String>;
    fn stop(&mut self);
    fn abort(&mut self);
}

pub trait SpeechSynthesizer {
    fn cancel(&mut self);
    fn speak(&mut self, text: &str, rate: f32) -> Result<(), String>;
}

/// Host capability lookup. Either handle may be missing.
pub trait SpeechPlatform {
    type Recognizer: SpeechRecognizer;
    type Synthesizer: SpeechSynthesizer;

    fn recognizer(&self, options: &RecognitionOptions) -> Option<Self::Recognizer>;
    fn synthesizer(&self) -> Option<Self::Synthesizer>;
}

/// Events the platform recognizer reports back into the bridge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    /// Cumulative results for the current utterance, starting at `result_index`.
    Result {
        result_index: usize,
        transcripts: Vec<String>,
    },
    End,
    Error(Option<String>),
}

enum Slot<T> {
    Unprobed,
    Missing,
    Ready(T),
}

impl<T> Slot<T> {
    fn get_or_probe(&mut self, probe: impl FnOnce() -> Option<T>) -> Option<&mut T> {
        if matches!(self, Slot::Unprobed) {
            *self = match probe() {
                Some(v) => Slot::Ready(v),
                None => Slot::Missing,
            };
        }
        match self {
            Slot::Ready(v) => Some(v),
            Slot::Unprobed | Slot::Missing => None,
        }
    }
}

pub struct VoiceBridge<P: SpeechPlatform> {
    platform: P,
    options: RecognitionOptions,
    recognizer: Slot<P::Recognizer>,
    synthesizer: Slot<P::Synthesizer>,
    state: VoiceState,
    error: Option<String>,
    // stopped by us, waiting for the platform's end event
    draining: bool,
    restart_on_end: bool,
}

impl<P: SpeechPlatform> VoiceBridge<P> {
    pub fn new(platform: P, options: RecognitionOptions) -> Self {
        Self {
            platform,
            options,
            recognizer: Slot::Unprobed,
            synthesizer: Slot::Unprobed,
            state: VoiceState::Idle,
            error: None,
            draining: false,
            restart_on_end: false,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn toggle(&mut self) {
        match self.state {
            VoiceState::Idle => self.start(),
            VoiceState::Listening => self.stop(),
        }
    }

    pub fn start(&mut self) {
        self.error = None;
        if self.state == VoiceState::Listening {
            return;
        }
        if self.draining {
            // the recognizer refuses to start again until the old session ends
            self.restart_on_end = true;
            return;
        }

        let platform = &self.platform;
        let options = &self.options;
        let Some(recognizer) = self
            .recognizer
            .get_or_probe(|| platform.recognizer(options))
        else {
            tracing::warn!("speech recognition unavailable");
            self.error = Some(ConsoleError::VoiceUnsupported.to_string());
            return;
        };

        match recognizer.start() {
            Ok(()) => {
                tracing::debug!(lang = %self.options.lang, "listening");
                self.state = VoiceState::Listening;
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech recognition failed to start");
                self.error = Some(ConsoleError::Recognition(e).to_string());
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state != VoiceState::Listening {
            return;
        }
        if let Slot::Ready(recognizer) = &mut self.recognizer {
            recognizer.stop();
            self.draining = true;
        }
        self.state = VoiceState::Idle;
    }

    /// Feeds a recognizer event through the state machine. Returns the text
    /// that should overwrite the bound input, if any.
    pub fn handle(&mut self, event: VoiceEvent) -> Option<String> {
        match event {
            VoiceEvent::Result {
                result_index,
                transcripts,
            } => {
                if self.state != VoiceState::Listening {
                    return None;
                }
                let text: String = transcripts
                    .iter()
                    .skip(result_index)
                    .map(String::as_str)
                    .collect();
                Some(text.trim().to_string())
            }
            VoiceEvent::End => {
                self.state = VoiceState::Idle;
                self.draining = false;
                if std::mem::take(&mut self.restart_on_end) {
                    self.start();
                }
                None
            }
            VoiceEvent::Error(_) if self.draining => None,
            VoiceEvent::Error(code) => {
                let message = code
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_RECOGNITION_ERROR.to_string());
                tracing::warn!(error = %message, "speech recognition error");
                self.state = VoiceState::Idle;
                self.error = Some(ConsoleError::Recognition(message).to_string());
                None
            }
        }
    }

    /// Speaks the run summary, cutting off anything still playing.
    pub fn announce(&mut self, run: &Run) {
        let platform = &self.platform;
        let Some(synth) = self.synthesizer.get_or_probe(|| platform.synthesizer()) else {
            return;
        };
        let text = if run.summary.trim().is_empty() {
            SPOKEN_FALLBACK
        } else {
            run.summary.as_str()
        };
        synth.cancel();
        if let Err(e) = synth.speak(text, SPEECH_RATE) {
            tracing::warn!(error = %e, "speech synthesis failed");
        }
    }

    /// Releases platform handles; the bridge ends idle.
    pub fn dispose(&mut self) {
        if let Slot::Ready(mut recognizer) =
            std::mem::replace(&mut self.recognizer, Slot::Unprobed)
        {
            recognizer.abort();
        }
        if let Slot::Ready(mut synth) = std::mem::replace(&mut self.synthesizer, Slot::Unprobed) {
            synth.cancel();
        }
        self.state = VoiceState::Idle;
        self.draining = false;
        self.restart_on_end = false;
    }
}
