use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, path::PathBuf, time::Duration};
use versemark::{ui, App, Cli, Command, CommandProcessor, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Warnings by default; the app's own I/O and edit notes at info
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Warn);
        logger.filter_module("versemark", LevelFilter::Info);
    }
    logger.init();

    let cli = Cli::parse();
    match cli.command {
        Command::View { path } => run_reader(path).await,
        command => {
            let config = Config::load().await?;
            let output = CommandProcessor::new(config).execute(command).await?;
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
    }
}

async fn run_reader(path: Option<PathBuf>) -> Result<()> {
    let mut app = App::load().await?;
    if let Some(path) = path {
        // Fail before touching the terminal so the error stays readable.
        app.open(path).await?;
    } else {
        log::info!("No file specified, starting with an empty document");
    }

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to set up terminal: {}", e));
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    restore_terminal()?;

    if let Err(err) = res {
        log::error!("Reader error: {}", err);
        return Err(err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, app)) {
            log::error!("Terminal draw error: {}", e);
        }

        app.update_status();

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Err(e) = app.handle_key_event(key).await {
                        app.status.set_error(format!("Key handling error: {}", e));
                    }
                }
                Event::Resize(_, _) => {
                    log::debug!("Terminal resized");
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
