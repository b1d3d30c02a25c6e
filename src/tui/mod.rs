pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::watch;

/// Commands the TUI sends back to the driver task.
#[derive(Debug, Clone)]
pub enum TuiCommand {
    Quit,
    Refresh,
    Retry,
    NextTab,
    PrevTab,
    Down,
    Up,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: tokio::sync::mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state_rx: watch::Receiver<AppState>,
    cmd_tx: tokio::sync::mpsc::Sender<TuiCommand>,
) -> Result<()> {
    let mut spinner_frame: u8 = 0;
    loop {
        let state = state_rx.borrow().clone();
        terminal.draw(|f| render::draw(f, &state, spinner_frame))?;
        spinner_frame = spinner_frame.wrapping_add(1);

        // Poll for keyboard events with 100ms timeout; state changes are
        // picked up on the next redraw.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => Some(TuiCommand::Quit),
                        KeyCode::Char('r') => Some(TuiCommand::Refresh),
                        KeyCode::Char('R') => Some(TuiCommand::Retry),
                        KeyCode::Tab => Some(TuiCommand::NextTab),
                        KeyCode::BackTab => Some(TuiCommand::PrevTab),
                        KeyCode::Down | KeyCode::Char('j') => Some(TuiCommand::Down),
                        KeyCode::Up | KeyCode::Char('k') => Some(TuiCommand::Up),
                        _ => None,
                    };
                    if let Some(command) = command {
                        let quit = matches!(command, TuiCommand::Quit);
                        let _ = cmd_tx.send(command).await;
                        if quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
