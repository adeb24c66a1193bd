//! postbot-tui: terminal chat window for postbot
//!
//! This crate provides the interactive front end:
//! - Launcher screen standing in for the floating chat button
//! - Chat window with transcript, quick-reply options, and input line
//! - Feedback modal shown when the window is closed

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, FeedbackRow, Focus, Screen};
pub use event::{Action, Event, EventHandler};
pub use postbot_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use postbot_engine::{locator_from_config, Config, Driver, HttpBackend, Outcome};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Event poll interval; also drives the loading spinner.
const TICK_RATE_MS: u64 = 100;

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
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(config.endpoint.clone())?;
    let locator = locator_from_config(&config.location);
    let (driver, mut outcomes) = Driver::new(Arc::new(backend), locator);
    info!(endpoint = %config.endpoint, "starting chat window");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(config);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events, &driver, &mut outcomes).await;

    terminal.show_cursor()?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    driver: &Driver,
    outcomes: &mut mpsc::UnboundedReceiver<Outcome>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Apply finished effects (non-blocking)
        while let Ok(outcome) = outcomes.try_recv() {
            let effects = app.apply(outcome);
            driver.dispatch(effects);
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    let effects = app.handle_key(key);
                    driver.dispatch(effects);
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.scroll_up(),
                    MouseEventKind::ScrollDown => app.scroll_down(),
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        if app.should_quit {
            info!("chat window closed by user");
            break;
        }
    }
    Ok(())
}

/// Render the current screen and any overlay.
fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let buf = frame.buffer_mut();

    match app.screen() {
        Screen::Launcher => screens::launcher::LauncherScreen.render(app, area, buf),
        Screen::Chat => screens::chat::ChatScreen.render(app, area, buf),
        Screen::Feedback => screens::feedback::FeedbackScreen.render(app, area, buf),
    }

    if app.show_help {
        screens::render_help_overlay(area, buf);
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
