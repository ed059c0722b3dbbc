//! Application state and update logic for the parley TUI.

use crate::event::Action;
use crate::input::TextInputState;
use crate::transcript::{TranscriptView, SCROLL_SPEED};
use parley_core::{ExchangeError, Role, Session, Submission, SubmissionToken};
use std::path::PathBuf;

/// Lines scrolled per page action.
const PAGE_SIZE: usize = 10;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// The chat session and its transcript.
    pub session: Session,

    /// Input bar state.
    pub input: TextInputState,

    /// Transcript scroll state.
    pub view: TranscriptView,

    /// Tick counter for animations.
    pub tick: usize,

    /// Number of exchanges currently in flight.
    pub in_flight: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Where transcript exports are written.
    export_path: PathBuf,
}

impl App {
    /// Create a new app instance.
    pub fn new(show_pending: bool) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            session: Session::with_pending(show_pending),
            input: TextInputState::new(),
            view: TranscriptView::new(),
            tick: 0,
            in_flight: 0,
            notification: None,
            notification_ttl: 0,
            export_path: PathBuf::from("parley-transcript.md"),
        }
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Help => {
                self.show_help = !self.show_help;
            }
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Up => {
                self.view.scroll_up(1);
            }
            Action::Down => {
                self.view.scroll_down(1);
            }
            Action::PageUp => {
                self.view.scroll_up(PAGE_SIZE);
            }
            Action::PageDown => {
                self.view.scroll_down(PAGE_SIZE);
            }
            Action::End => {
                self.view.jump_to_end();
            }
            Action::ToggleFollow => {
                self.view.toggle_follow();
            }
            Action::Export => {
                self.export_transcript();
            }
            // Submission is wired in the event loop, which owns the client.
            Action::Submit | Action::None => {}
        }
    }

    /// Handle a mouse wheel scroll.
    pub fn handle_scroll(&mut self, up: bool) {
        if up {
            self.view.scroll_up(SCROLL_SPEED);
        } else {
            self.view.scroll_down(SCROLL_SPEED);
        }
    }

    /// Take the input bar's content and submit it to the session.
    ///
    /// Returns the submission to send, or `None` for empty input.
    pub fn submit_input(&mut self) -> Option<Submission> {
        let raw = self.input.submit();
        let submission = self.session.submit(&raw);
        if submission.is_some() {
            self.in_flight += 1;
            self.view.jump_to_end();
        }
        submission
    }

    /// Feed an exchange outcome back into the session.
    pub fn complete_exchange(
        &mut self,
        token: SubmissionToken,
        outcome: Result<String, ExchangeError>,
    ) {
        self.session.complete(token, outcome);
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        // Display for ~3 seconds at 4 Hz tick rate (250ms) = 12 ticks
        self.notification_ttl = 12;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Export the transcript to a markdown file.
    fn export_transcript(&mut self) {
        let path = self.export_path.clone();
        match self.export_to(&path) {
            Ok(()) => {
                self.set_notification(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                self.set_notification(format!("Export failed: {e}"));
            }
        }
    }

    /// Write the transcript as markdown to the given path.
    pub fn export_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let mut content = String::new();
        content.push_str("# parley transcript\n\n");

        for message in self.session.transcript().messages() {
            if message.is_placeholder() {
                continue;
            }
            let heading = match message.role {
                Role::User => "**You**",
                Role::Assistant => "**Assistant**",
                Role::Error => "**Error**",
            };
            content.push_str(&format!("### {heading}\n\n"));
            content.push_str(&message.text);
            content.push_str("\n\n");
        }

        std::fs::write(path, content)
    }
}
