use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster::app::{App, FetchOutcome};
use roster::config::Config;
use roster::gateway::HttpGateway;
use roster::prefetch::PrefetchCoordinator;
use roster::selection::RandomSelector;
use roster::state::StateStore;
use roster::ui;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Terminal client for the roster user directory")]
struct Cli {
    /// Server base URL (overrides ROSTER_SERVER_URL)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// Write logs to a file (the TUI owns stdout)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    // Logs must not hit the terminal while the TUI is up; without a file
    // they are discarded.
    let _log_guard = match cli.log_file.as_deref() {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => None,
    };

    info!(server = %config.server_url, "starting roster client");

    let gateway = Arc::new(HttpGateway::new(&config.server_url));
    let mut store = StateStore::new();
    RandomSelector::from_entropy().install(&mut store);

    let coordinator = PrefetchCoordinator::start(gateway.clone(), config.prefetch());

    let (outcome_tx, outcome_rx) = mpsc::channel(32);
    let mut app = App::new(gateway, store, coordinator.tracker(), outcome_tx);
    app.start();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut app, outcome_rx).await;

    // Restore the terminal before reporting any error.
    coordinator.shutdown();
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    mut outcome_rx: mpsc::Receiver<FetchOutcome>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel(100);

    // Read crossterm events on a blocking-friendly task and feed them into
    // the select loop. Drain everything available before sleeping so rapid
    // keystrokes are not dropped.
    tokio::spawn(async move {
        loop {
            while event::poll(Duration::from_millis(0)).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if event_tx.send(evt).await.is_err() {
                        return;
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    let mut redraw = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            Some(evt) = event_rx.recv() => {
                if let Event::Key(key) = evt {
                    app.handle_key(key);
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
            _ = redraw.tick() => {}
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.should_quit() {
            info!("quit requested");
            return Ok(());
        }
    }
}
