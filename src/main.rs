//! cinefind - terminal movie search
//!
//! Search the TMDB catalog, page through results and open the details of a
//! title, all from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! cinefind
//!
//! # CLI mode (for automation)
//! cinefind search "blade runner"
//! cinefind search dune --page 2 --json
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use cinefind::api::TmdbClient;
use cinefind::app::App;
use cinefind::cli::{Cli, Command, ExitCode, Output};
use cinefind::commands;
use cinefind::config::Config;
use cinefind::effects::{Fetcher, OutcomeReceiver};
use cinefind::logging::{self, LogTarget};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Drives toast expiry
const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new(&cli);

    // Configuration problems are fatal and reported before any UI exists
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return commands::config_failure(&e, &output).into(),
    };

    let target = if cli.is_cli_mode() {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    logging::init_tracing(&config, target);

    let client = match TmdbClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "startup aborted");
            return commands::config_failure(&e, &output).into();
        }
    };
    info!(base_url = client.base_url(), "cinefind starting");

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &client, &output).await.into(),
        None => match run_tui(client).await {
            Ok(()) => ExitCode::Success.into(),
            Err(e) => {
                error!(error = %e, "tui failed");
                output.error(format!("{:#}", e), ExitCode::Error).into()
            }
        },
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(client: TmdbClient) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new();
    let (fetcher, outcomes) = Fetcher::new(client);

    let result = run_event_loop(&mut terminal, &mut app, &fetcher, outcomes).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop: input, fetch outcomes and ticks, one at a time
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    fetcher: &Fetcher,
    mut outcomes: OutcomeReceiver,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while app.running {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            event = events.next() => match event {
                // Only handle key press events (ignore releases on Windows)
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(request) = app.handle_key(key) {
                        fetcher.spawn(request);
                    }
                }
                Some(Ok(Event::Mouse(mouse))) => {
                    if let Some(request) = app.handle_mouse(mouse) {
                        fetcher.spawn(request);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(outcome) = outcomes.recv() => {
                app.on_outcome(outcome, Instant::now());
            }
            _ = tick.tick() => {
                app.tick(Instant::now());
            }
        }
    }

    Ok(())
}
