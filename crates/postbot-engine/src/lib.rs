//! postbot-engine: headless conversation client for the postbot chat endpoint
//!
//! This crate holds everything that does not need a terminal:
//! - Wire format and the HTTP backend
//! - The conversation state machine and the driver that runs its effects
//! - Location sources, feedback modal state, and configuration

pub mod backend;
pub mod config;
pub mod conversation;
pub mod driver;
pub mod feedback;
pub mod location;
pub mod markup;
pub mod protocol;
pub mod transcript;

// Re-export commonly used types
pub use backend::{Backend, BackendError, HttpBackend};
pub use config::{Config, ConfigError, LocationConfig};
pub use conversation::{Conversation, Effect, Outcome, Placeholder, Timing, TurnId};
pub use driver::Driver;
pub use feedback::{Emoji, Feedback, FeedbackError, FeedbackPanel, Rating, MAX_STARS};
pub use location::{locator_from_config, Coordinates, LocationError, Locator};
pub use protocol::{ChatReply, ChatRequest, ControlToken, ReplyOption};
pub use transcript::{Message, Sender, Transcript};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
