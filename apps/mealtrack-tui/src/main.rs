//! mealtrack - meal and calorie list in the terminal.

mod app;
mod focus;
mod keybindings;
mod views;
mod widgets;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use mealtrack_core::{
    FileStorage, ItemRepository, MemoryStorage, Screen, Storage, Tracker, TrackerConfig,
};

use app::App;

#[derive(Parser)]
#[command(name = "mealtrack")]
#[command(about = "Track meals and their calories in the terminal", long_about = None)]
struct Cli {
    /// Directory holding the stored meal list (overrides config and MEALTRACK_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <config dir>/mealtrack/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep meals in memory only; nothing is written to disk except the log
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = TrackerConfig::load_standard(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_logging(&config)?;
    tracing::info!(data_dir = ?config.data_dir, slot = %config.slot, ephemeral = cli.ephemeral, "Starting mealtrack");

    if cli.ephemeral {
        let repository = ItemRepository::with_slot(MemoryStorage::new(), &config.slot);
        run(App::new(Tracker::new(repository, Screen::new())))
    } else {
        let storage = FileStorage::new(&config.data_dir);
        let repository = ItemRepository::with_slot(storage, &config.slot);
        run(App::new(Tracker::new(repository, Screen::new())))
    }
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(config: &TrackerConfig) -> io::Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run<S: Storage>(mut app: App<S>) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Terminal error: {}", err);
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                tracing::info!("Exiting");
                return Ok(());
            }
        }
    }
}
