use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};
use taskboard::{html, theme::Theme, ui, App, Config, FileStorage, KanbanBoard, Storage};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(version, about = "Kanban task board for the terminal")]
struct Args {
    /// Config file (defaults to the per-user config if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the saved board
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write the board as a static HTML page and exit
    #[arg(long, value_name = "PATH")]
    export_html: Option<PathBuf>,
}

fn init_tracing(log_path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .context("log file path has no file name")?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,taskboard=debug"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init();
    if let Err(err) = installed {
        warn!(error = %err, "a tracing subscriber is already installed; keeping it");
    }

    Ok(guard)
}

fn export_html(storage: Rc<dyn Storage>, config: &Config, path: &Path) -> anyhow::Result<()> {
    let theme = Theme::load(storage.as_ref());
    let board = KanbanBoard::load(storage);
    let view = taskboard::view::render(board.tasks(), &config.columns);
    fs::write(path, html::render_document(&view, theme))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), tasks = board.len(), "exported board");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let _guard = init_tracing(&config.log_path())?;
    info!(data_dir = %config.data_dir.display(), "starting taskboard");

    let storage: Rc<dyn Storage> = Rc::new(
        FileStorage::open(&config.data_dir)
            .with_context(|| format!("failed to open {}", config.data_dir.display()))?,
    );

    if let Some(path) = &args.export_html {
        return export_html(storage, &config, path);
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(storage, &config);
    let result = ui::run_app(&mut terminal, &mut app);
    app.finish();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "event loop failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}
