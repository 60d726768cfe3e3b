use thiserror::Error;

/// Everything that can go wrong between an operator action and the engine.
///
/// All variants are rendered inline by the component that produced them; the
/// `Display` text is what the operator sees.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("command text is empty")]
    EmptyCommand,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("a command is already running")]
    Busy,
    #[error("approval #{0} is already being decided")]
    DecisionInFlight(i64),
    #[error("approval #{0} is no longer pending")]
    NotActionable(i64),
    #[error("approval #{0} not found")]
    UnknownApproval(i64),
    #[error("network error: {0}")]
    Transport(String),
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String, raw: String },
    #[error("SpeechRecognition not supported in this browser.")]
    VoiceUnsupported,
    #[error("{0}")]
    Recognition(String),
}

impl ConsoleError {
    /// Input problems that are refused before anything goes over the wire.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyCommand | Self::MissingField(_))
    }
}
