//! parley-tui: terminal interface for parley
//!
//! This crate provides the TUI layer: the transcript pane, the input bar,
//! and an event loop that spawns one task per in-flight exchange and routes
//! each completion back to its own submission.

mod app;
mod event;
mod input;
mod transcript;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use input::{InputBar, TextInputState};
pub use transcript::{TranscriptPane, TranscriptView};
pub use parley_core;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parley_core::{Config, ExchangeClient, ExchangeError, Submission, SubmissionToken};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io::{self, stdout};
use tokio::task::JoinHandle;

/// An exchange in flight, keyed by its submission token.
type Exchange = (SubmissionToken, JoinHandle<Result<String, ExchangeError>>);

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = config.exchange_client()?;

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.show_pending);

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &client, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ExchangeClient,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut exchanges: Vec<Exchange> = Vec::new();

    loop {
        terminal.draw(|frame| draw(frame, app, client))?;

        // Check for completed exchanges (non-blocking)
        let mut completed = Vec::new();
        for (i, (_, handle)) in exchanges.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        for i in completed.into_iter().rev() {
            let (token, handle) = exchanges.remove(i);
            match handle.await {
                Ok(outcome) => app.complete_exchange(token, outcome),
                Err(_) => app.complete_exchange(
                    token,
                    Err(ExchangeError::Transport("exchange task aborted".into())),
                ),
            }
        }

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !app.show_help && handle_input_key(app, key, client, &mut exchanges) {
                        continue; // Key was handled by the input bar
                    }
                    let action = key_to_action(key);
                    app.handle_action(action);
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_scroll(true),
                        MouseEventKind::ScrollDown => app.handle_scroll(false),
                        _ => {}
                    }
                }
                Event::Tick => {
                    app.tick();
                }
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            // Once issued a request cannot be cancelled server-side; we
            // just stop waiting for the outcomes.
            for (_, handle) in exchanges {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Handle key input for the input bar.
///
/// Returns true if the key was consumed (should not be processed as an
/// action).
fn handle_input_key(
    app: &mut App,
    key: KeyEvent,
    client: &ExchangeClient,
    exchanges: &mut Vec<Exchange>,
) -> bool {
    // Let the action handler deal with Ctrl+C, Ctrl+E, etc.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        // Enter submits the message
        KeyCode::Enter => {
            if let Some(Submission { token, text }) = app.submit_input() {
                let client = client.clone();
                let handle = tokio::spawn(async move { client.send(&text).await });
                exchanges.push((token, handle));
            }
            true
        }

        // Text input
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::Up => {
            // History navigation when input is empty
            if app.input.is_empty() {
                app.input.history_prev();
                true
            } else {
                false // Let the action handler scroll the transcript
            }
        }
        KeyCode::Down => {
            if app.input.is_empty() {
                app.input.history_next();
                true
            } else {
                false
            }
        }

        _ => false,
    }
}

/// Height of the input bar, borders included.
const INPUT_HEIGHT: u16 = 3;

fn draw(frame: &mut Frame<'_>, app: &mut App, client: &ExchangeClient) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let pane = TranscriptPane::new(app.session.transcript().messages()).tick(app.tick);
    frame.render_stateful_widget(pane, chunks[0], &mut app.view);

    frame.render_widget(InputBar::new(&app.input), chunks[1]);

    frame.render_widget(status_line(app, client), chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn status_line<'a>(app: &'a App, client: &'a ExchangeClient) -> Paragraph<'a> {
    let mut spans = vec![Span::styled(
        client.endpoint(),
        Style::default().fg(Color::DarkGray),
    )];

    if app.in_flight > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} in flight", app.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    if !app.view.is_following() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("scrolled", Style::default().fg(Color::Blue)));
    }

    if let Some(notification) = &app.notification {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            notification.as_str(),
            Style::default().fg(Color::Green),
        ));
    }

    Paragraph::new(Line::from(spans))
}

fn render_help_overlay(frame: &mut Frame<'_>) {
    let area = frame.area();
    let width = 44.min(area.width);
    let height = 10.min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::from("Enter      send message"),
        Line::from("Up/Down    history / scroll"),
        Line::from("PgUp/PgDn  scroll transcript"),
        Line::from("End        jump to newest"),
        Line::from("Ctrl+F     toggle follow"),
        Line::from("Ctrl+E     export transcript"),
        Line::from("Ctrl+C     quit"),
        Line::from("Esc / F1   close help"),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Help ").borders(Borders::ALL)),
        popup,
    );
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[tokio::test]
    async fn test_submission_spawns_keyed_exchange() {
        let client = ExchangeClient::new("http://127.0.0.1:9/unreachable").unwrap();
        let mut app = App::new(true);
        let mut exchanges: Vec<Exchange> = Vec::new();

        app.input.insert_str("hello");
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(handle_input_key(&mut app, key, &client, &mut exchanges));
        assert_eq!(exchanges.len(), 1);

        // Port 9 (discard) refuses connections, so the exchange fails and
        // the failure resolves against its own token.
        let (token, handle) = exchanges.pop().unwrap();
        let outcome = handle.await.unwrap();
        assert!(outcome.is_err());
        app.complete_exchange(token, outcome);

        assert_eq!(app.session.transcript().pending_count(), 0);
        let last = app.session.transcript().last().unwrap();
        assert_eq!(last.role, parley_core::Role::Error);
    }

    #[test]
    fn test_status_line_shows_in_flight_count() {
        use ratatui::backend::TestBackend;

        let client = ExchangeClient::new("http://127.0.0.1:9/unreachable").unwrap();
        let mut app = App::new(true);
        app.input.insert_str("hello");
        let submission = app.submit_input().unwrap();

        let render = |app: &App| -> String {
            let backend = TestBackend::new(60, 1);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| frame.render_widget(status_line(app, &client), frame.area()))
                .unwrap();
            let buffer = terminal.backend().buffer();
            buffer.content().iter().map(|cell| cell.symbol()).collect()
        };

        assert!(render(&app).contains("1 in flight"));

        app.complete_exchange(submission.token, Ok("hi there".into()));
        assert!(!render(&app).contains("in flight"));
    }

    #[test]
    fn test_typing_is_consumed_by_input_bar() {
        let client = ExchangeClient::new("http://127.0.0.1:9/unreachable").unwrap();
        let mut app = App::new(true);
        let mut exchanges: Vec<Exchange> = Vec::new();

        for c in "hi".chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert!(handle_input_key(&mut app, key, &client, &mut exchanges));
        }
        assert_eq!(app.input.content(), "hi");
        assert!(exchanges.is_empty());
    }
}
