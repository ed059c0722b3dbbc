//! parley-core: headless chat session logic
//!
//! This crate provides the core of parley, including:
//! - The transcript data model with keyed placeholder bubbles
//! - The session controller (submit/complete)
//! - The HTTP client for the message-exchange endpoint
//! - Configuration management

pub mod config;
pub mod exchange;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use exchange::{parse_reply, ExchangeClient, ExchangeError, DEFAULT_TIMEOUT};
pub use message::{Message, Role, SubmissionToken, Transcript, PENDING_TEXT};
pub use session::{Session, Submission};

/// Returns the core version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
