use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use reclamation_service::HttpService;
use reclamation_tui::app::App;
use reclamation_tui::config::{Config, DEFAULT_LOG_FILTER};
use reclamation_tui::host::{HostContainer, TerminalHost};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    info!("reclamation starting");
    info!("server: {}", config.server_url);

    let service = HttpService::new(&config.server_url);
    let host = TerminalHost::new();
    let injected: Option<Box<dyn HostContainer>> = if config.standalone {
        None
    } else {
        Some(Box::new(host.clone()))
    };

    let app = App::new(service, injected)?;
    run_tui(app, host)
}

/// Logs go to a file; stdout is owned by the terminal UI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(app: App<HttpService>, host: TerminalHost) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, &host);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<HttpService>,
    host: &TerminalHost,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // The "sending" frame is on screen; now wait for the endpoint.
        if app.has_pending_submit() {
            app.run_pending_submit();
            continue;
        }

        if app.should_exit(host.close_requested()) {
            info!("closing after successful submission");
            break;
        }
        if app.should_quit() {
            break;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}
