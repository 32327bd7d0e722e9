//! nosql-tui - terminal explorer for on-premise NoSQL tables
//!
//! Five panes (Connection, Tables, Schema, SQL, Data) in the manner of
//! lazygit or k9s: browse tables, inspect their DDL and indexes, and page
//! through rows or the results of your own SELECT statements.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nosql_core::api::RestConnector;
use nosql_core::storage::config::Config;
use ratatui::backend::CrosstermBackend;

mod action;
mod app;
mod components;
mod error;
mod event;
mod layout;
mod logging;

use app::App;
use error::TuiResult;

#[tokio::main]
async fn main() {
    let log_file = std::env::var_os(logging::LOG_FILE_ENV).map(PathBuf::from);
    if let Err(err) = logging::init_logging(log_file.as_deref()) {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(config).await {
        log::error!("application error: {}", err);
        eprintln!("Application error: {}", err);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> TuiResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut app = App::new(config, Arc::new(RestConnector));
    let result = app.run_async(&mut terminal).await;

    restore_terminal()?;
    terminal.show_cursor()?;
    result
}

/// Restore terminal to normal state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
