//! The chat session controller.
//!
//! One `Session` owns one transcript for the lifetime of the process. It
//! implements the submit/complete contract: `submit` appends the user's
//! message optimistically and hands back a token, `complete` resolves that
//! token against its outcome. All failures are rendered into the
//! transcript, never propagated.

use crate::exchange::ExchangeError;
use crate::message::{SubmissionToken, Transcript};

/// Handoff from [`Session::submit`] to whoever performs the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Token the completing outcome must be keyed by.
    pub token: SubmissionToken,
    /// Trimmed text to send.
    pub text: String,
}

/// Chat session controller.
#[derive(Debug)]
pub struct Session {
    transcript: Transcript,
    show_pending: bool,
}

impl Session {
    /// Create a session that shows a pending bubble per submission.
    pub fn new() -> Self {
        Self::with_pending(true)
    }

    /// Create a session, choosing whether submissions show a pending bubble.
    pub fn with_pending(show_pending: bool) -> Self {
        Self {
            transcript: Transcript::new(),
            show_pending,
        }
    }

    /// The transcript this session owns.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Submit raw input.
    ///
    /// Trims whitespace; empty input is a silent no-op returning `None`
    /// with no transcript change. Otherwise appends the user message (and
    /// the pending bubble, if enabled) and returns the submission to send.
    pub fn submit(&mut self, raw: &str) -> Option<Submission> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push_user(text);
        let token = if self.show_pending {
            self.transcript.push_placeholder()
        } else {
            // Token still minted so completions stay keyed uniformly.
            self.transcript.mint_token()
        };

        tracing::debug!(?token, "submission accepted");
        Some(Submission {
            token,
            text: text.to_string(),
        })
    }

    /// Resolve one submission.
    ///
    /// Removes the token's placeholder (only that one), then appends the
    /// assistant reply or an inline error entry. The session is always
    /// ready for the next submission afterwards.
    pub fn complete(&mut self, token: SubmissionToken, outcome: Result<String, ExchangeError>) {
        self.transcript.remove_placeholder(token);
        match outcome {
            Ok(reply) => {
                tracing::debug!(?token, "exchange completed");
                self.transcript.push_assistant(reply);
            }
            Err(e) => {
                tracing::warn!(?token, error = %e, "exchange failed");
                self.transcript.push_error(format!("Error: {e}"));
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
