//! conscope - Behavioral Transcript Reviewer
//!
//! Terminal UI for browsing a static archive of conversation transcripts
//! and their behavioral-analysis results: filter, sort, and inspect.

mod app;
mod message_format;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use conscope_core::{ArchiveClient, Config};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

#[derive(Parser)]
#[command(name = "conscope")]
#[command(about = "Review behavioral-analysis transcripts from a static archive")]
#[command(version)]
struct Args {
    /// Archive base URL (overrides the configured base_url)
    #[arg(long)]
    url: Option<String>,

    /// View a single local transcript file instead of the archive
    #[arg(long)]
    file: Option<PathBuf>,

    /// Alternate config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if let Some(url) = args.url {
        config.archive.base_url = url;
    }

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        conscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("conscope TUI starting up");

    // The event loop is synchronous; fetches run on this runtime via
    // block_on from the control thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let client = ArchiveClient::new(&config.archive).context("failed to build archive client")?;

    let mut app = App::new(runtime, client);
    match args.file {
        Some(path) => {
            // Explicit manual mode: a bad path is a startup error.
            app.start_manual(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
        }
        None => {
            // Discovery failure falls back to the manual-path prompt.
            app.start_catalog();
        }
    }

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("conscope TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
