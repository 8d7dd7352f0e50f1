//! brandscout - top-rated marketplace listings, stored and explained, from the terminal
//!
//! This is the main entry point. It owns the terminal and the event loop;
//! the actual logic is in the library modules for better testability.

use anyhow::{Context, Result};
use brandscout::app::{Action, App, AppEvent};
use brandscout::cli::Cli;
use brandscout::config::{Settings, load_settings};
use brandscout::db::PostgresStore;
use brandscout::llm::OllamaClient;
use brandscout::pipeline::Pipeline;
use brandscout::scrape::ProxyFetcher;
use brandscout::ui;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const TICK_RATE: Duration = Duration::from_millis(100);

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Stdout belongs to the TUI, so logs go to a file
    let _guard = init_logging()?;

    let mut settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    if let Some(ref model) = cli.model {
        settings.model.name = model.clone();
    }
    let startup_connection = cli.connection_config()?;

    let pipeline = Pipeline::new(
        Arc::new(ProxyFetcher::new(settings.scraper.clone())?),
        Arc::new(PostgresStore::new()),
        Arc::new(OllamaClient::new(&settings.model)),
        &settings,
    );
    let mut app = App::new().with_model_name(&settings.model.name);

    tracing::info!(model = %settings.model.name, "starting brandscout");

    let mut terminal = setup_terminal().context("setting up terminal")?;
    let result = run(&mut terminal, &mut app, &pipeline, startup_connection).await;
    restore_terminal(&mut terminal)?;
    result
}

fn init_logging() -> Result<WorkerGuard> {
    let dir = Settings::config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, "brandscout.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brandscout=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    pipeline: &Pipeline,
    startup_connection: Option<brandscout::config::ConnectionConfig>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    match startup_connection {
        Some(config) => {
            let action = app.connect(config);
            dispatch(action, app, pipeline, &tx);
        }
        None => app.show_connection_dialog(),
    }

    while app.running {
        terminal.draw(|f| ui::render::render(f, app))?;

        let event = tokio::select! {
            Some(event) = rx.recv() => event,
            _ = ticker.tick() => AppEvent::Tick,
            maybe = events.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Some(Ok(Event::Paste(data))) => AppEvent::Paste(data),
                Some(Ok(Event::Resize(..))) => AppEvent::Resize,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).context("reading terminal events"),
                None => break,
            },
        };

        let action = app.handle_event(event);
        dispatch(action, app, pipeline, &tx);
    }

    tracing::info!("shutting down");
    Ok(())
}

/// Execute an action, spawning long operations so the UI keeps drawing
fn dispatch(
    action: Action,
    app: &mut App,
    pipeline: &Pipeline,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match action {
        Action::Connect { config, generation } => {
            let pipeline = pipeline.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = pipeline.prime_schema(&config).await;
                let _ = tx.send(AppEvent::SchemaPrimed { generation, result });
            });
        }
        Action::RunCycle { config, query } => {
            let pipeline = pipeline.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = pipeline.run_cycle(&config, &query).await;
                let _ = tx.send(AppEvent::CycleFinished(result));
            });
        }
        Action::Ask { question, schema } => {
            let pipeline = pipeline.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = pipeline.answer(&question, &schema).await;
                let _ = tx.send(AppEvent::AnswerReady(result));
            });
        }
        Action::Quit => app.running = false,
        Action::None => {}
    }
}
