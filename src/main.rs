mod api;
mod app;
mod config;
mod domain;
mod input;
mod notifications;
mod ui;

use anyhow::{Context, Result};
use api::{ApiWorker, HttpGateway, TaskApi};
use app::AppState;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::{default_config_path, init_config, load_settings, log_file, save_settings, Settings};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskmap")]
#[command(about = "Terminal client for a task server: calendar, day lists and a node map", long_about = None)]
struct Cli {
    /// Config file. Defaults to <config dir>/taskmap/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server root URL, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token, overrides the config file
    #[arg(long, global = true)]
    token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Print tasks from the server
    List {
        /// Only tasks created on this day (YYYY-MM-DD format)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Log in and store the bearer token in the config file
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Where log output goes
enum LogTarget {
    Stderr,
    File,
}

fn init_tracing(verbose: u8, target: LogTarget) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid RUST_LOG filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    // The TUI owns the terminal, so its logs go to a file
    let result = match target {
        LogTarget::Stderr => builder
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .try_init(),
        LogTarget::File => {
            let path = log_file()?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if let Err(err) = result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let target = if cli.command.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    init_tracing(cli.verbose, target)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command {
        Some(Commands::Init) => {
            init_config(&config_path)?;
            println!("Wrote default config: {}", config_path.display());
            Ok(())
        }
        Some(Commands::List { date }) => {
            let settings = load_settings(&config_path)?.with_overrides(cli.base_url, cli.token);
            let date = date
                .map(|d| {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))
                })
                .transpose()?;
            print_tasks(&settings, date)
        }
        Some(Commands::Login { username, password }) => {
            let settings = load_settings(&config_path)?.with_overrides(cli.base_url, None);
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            login(settings, &config_path, &username, &password)
        }
        None => {
            let settings = load_settings(&config_path)?.with_overrides(cli.base_url, cli.token);
            run_tui(settings)
        }
    }
}

fn print_tasks(settings: &Settings, date: Option<NaiveDate>) -> Result<()> {
    let gateway = HttpGateway::new(&settings.api.base_url, settings.api.token.clone())?;
    let mut store = domain::TaskStore::new();
    store.replace_all(gateway.list()?);

    let tasks: Vec<&domain::Task> = match date {
        Some(date) => store.by_date(date),
        None => store.iter().collect(),
    };
    if tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for task in tasks {
        let check = if task.completed { "x" } else { " " };
        let created = task
            .created_on()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "[{}] #{:<5} {}  {}", check, task.id, created, task.display_title())?;
    }
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn login(mut settings: Settings, config_path: &Path, username: &str, password: &str) -> Result<()> {
    let gateway = HttpGateway::new(&settings.api.base_url, None)?;
    let token = gateway.login(username, password)?;
    info!(user = username, "logged in");

    settings.api.token = Some(token);
    save_settings(config_path, &settings)?;
    println!("Token saved to {}", config_path.display());
    Ok(())
}

fn run_tui(settings: Settings) -> Result<()> {
    let gateway = HttpGateway::new(&settings.api.base_url, settings.api.token.clone())?;
    info!(base_url = gateway.base_url(), "starting");
    let worker = ApiWorker::spawn(gateway);

    let mut app = AppState::new(
        settings.layout_config(),
        settings.notice_ttl(),
        Local::now().date_naive(),
    );
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &worker, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "app exited with error");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    worker: &ApiWorker,
    settings: &Settings,
) -> Result<()> {
    let poll_interval = settings.poll_interval();

    loop {
        // Fold finished requests into the store, then hand new ones to the worker
        while let Some(completion) = worker.try_recv() {
            app.apply_completion(completion);
        }
        for request in app.take_requests() {
            worker.submit(request)?;
        }

        app.tick(Instant::now(), Local::now().date_naive());

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_interval)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key)? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    let screen = terminal.size()?;
                    input::handle_mouse(app, mouse, screen);
                }
                _ => {}
            }
        }
    }
}
