use std::fs::{self, File};
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event as CEvent, EventStream};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use pcoin_client::Client;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::select;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod games;
mod notify;
mod pages;
mod route;
mod session;
mod sound;
mod timer;
mod widgets;

use app::{App, UiEvent};
use config::{Args, Settings};
use sound::SoundEffects;

const TICK_RATE: Duration = Duration::from_millis(200);

type Backend = CrosstermBackend<io::Stdout>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load_config().unwrap_or_default();
    let settings = Settings::resolve(&args, &cfg);
    config::save_config(&settings.persisted()).context("save config")?;

    init_tracing()?;
    info!(
        api_url = %settings.api_url,
        sound = settings.sound,
        route = %settings.start_route,
        "starting"
    );

    let client = Client::new(&settings.api_url).context("invalid API URL")?;
    let sound = if settings.sound {
        SoundEffects::terminal_bell()
    } else {
        SoundEffects::disabled()
    };
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut app = App::new(
        client,
        sound,
        ui_tx,
        settings.start_route.clone(),
        settings.verbose,
    );

    // TUI setup
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app, ui_rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;
    info!("exiting");
    result
}

async fn run(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    app.start();

    let mut events = EventStream::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.draw(f)).context("draw")?;

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        select! {
            maybe_ev = events.next() => {
                match maybe_ev {
                    Some(Ok(CEvent::Key(key))) => {
                        if app.handle_key(key) {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => warn!(error = %err, "terminal event error"),
                    None => break,
                }
            }
            Some(ui_msg) = ui_rx.recv() => app.handle_ui_event(ui_msg),
            _ = tokio::time::sleep(timeout) => {
                last_tick = Instant::now();
                app.on_tick(last_tick);
            }
        }
    }
    Ok(())
}

/// Log to a file; the alternate screen owns stdout.
fn init_tracing() -> Result<()> {
    let Some(path) = config::log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
