//! Platform-independent core of the operator console: engine contract,
//! command consoles, approval queue, voice bridge and progress estimate.

pub mod approvals;
pub mod channel;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod progress;
pub mod steps;
pub mod transport;
pub mod voice;

pub use approvals::ApprovalQueue;
pub use channel::{Channel, CommandTemplate};
pub use config::ConsoleConfig;
pub use console::ConsoleSession;
pub use error::ConsoleError;
pub use model::{ApprovalItem, AuditLogItem, BackendStatus, Decision, Run, StatusSummary, Step};
pub use progress::ProgressSimulator;
pub use transport::EngineApi;
pub use voice::{VoiceBridge, VoiceEvent, VoiceState};
