use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use repwatch::{
    api::HttpBackend,
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    dashboard::Dashboard,
    headless::{self, CommandError},
    logging,
    runtime::{crossterm_events, AppEvent, Runner, TerminalEvent},
    ui,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tokio::sync::mpsc;

const TICK_RATE_MS: u64 = 250;

/// terminal client for live camera workouts and video rep analysis
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Start and stop live camera workouts, upload recorded videos for rep analysis, and browse your workout history from the terminal."
)]
pub struct Cli {
    /// base url of the workout backend
    #[clap(long, env = "REPWATCH_SERVER")]
    server: Option<String>,

    /// analyze a video file and exit
    #[clap(short = 'u', long, value_name = "PATH", conflicts_with_all = ["history", "export_csv"])]
    upload: Option<PathBuf>,

    /// print workout history and exit
    #[clap(long)]
    history: bool,

    /// write workout history as CSV and exit
    #[clap(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,

    /// file to write logs to
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// remember --server as the default backend
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn is_headless(&self) -> bool {
        self.upload.is_some() || self.history || self.export_csv.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    logging::init(&log_path, &config.log_level);
    log::info!("repwatch {} using {}", env!("CARGO_PKG_VERSION"), config.server_url);

    if cli.save_config {
        store.save(&config)?;
        log::info!("saved config to {}", store.path().display());
    }

    let backend = match HttpBackend::new(&config.server_url) {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    if cli.is_headless() {
        if let Err(err) = run_headless(&cli, backend.as_ref()).await {
            eprintln!("{err}");
            std::process::exit(1);
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(Dashboard::new(backend, tx));
    let mut runner = Runner::new(crossterm_events(), rx, Duration::from_millis(TICK_RATE_MS));
    let result = start_tui(&mut terminal, &mut app, &mut runner).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_headless(cli: &Cli, backend: &HttpBackend) -> Result<(), CommandError> {
    if let Some(path) = &cli.upload {
        let report = headless::analyze_file(backend, path).await?;
        println!("{}", report.message.trim_end());
        return Ok(());
    }

    let entries = headless::fetch_history(backend).await?;
    if let Some(path) = &cli.export_csv {
        headless::export_csv(&entries, path)?;
        println!("wrote {} sessions to {}", entries.len(), path.display());
    }
    if cli.history {
        print!("{}", headless::history_text(&entries));
    }
    Ok(())
}

async fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner,
) -> Result<(), Box<dyn Error>> {
    app.start();

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step().await {
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
            AppEvent::Dashboard(event) => app.dashboard.handle(event),
            AppEvent::Terminal(TerminalEvent::Resize) | AppEvent::Tick => {}
        }
    }

    if app.dashboard.session().is_recording() {
        log::warn!("quitting while a workout is still recording on the backend");
    }
    Ok(())
}
