//! ghuser-search binary entry point.
//!
//! Parses configuration, starts logging and the background runtime that runs
//! GitHub requests, then drives the TUI in raw mode and restores the terminal
//! on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use ghuser_search::app::config::Cli;
use ghuser_search::app::keymap::Keymap;
use ghuser_search::app::{self, AppState, Theme};
use ghuser_search::error::{Context, Result};
use ghuser_search::github::HttpGitHub;
use ghuser_search::search::SearchController;

/// Send `tracing` output to `path`; the terminal itself is owned by the UI.
fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    tracing::info!(api_url = %cli.api_url, authenticated = cli.token.is_some(), "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .with_ctx(|| "start async runtime".to_string())?;
    let api = Arc::new(HttpGitHub::new(&cli.http_settings())?);
    let search = SearchController::new(api, runtime.handle().clone()).with_cancel_stale(cli.cancel_stale);
    let mut app = AppState::new(
        search,
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
    );
    if let Some(query) = cli.query {
        app.query = query;
        app.submit();
    }

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(250));

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
