use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::JamendoClient;
use crate::connectivity::RouteProbe;
use crate::coordinator::{Coordinator, Inbound};
use crate::engine::{EngineNotifier, RodioEngine};

mod event_loop;
mod logging;
mod settings;
mod startup;

/// The coordinator wired to real audio, HTTP and route checks.
pub type LiveCoordinator = Coordinator<RodioEngine, JamendoClient, RouteProbe>;

pub fn run() -> anyhow::Result<()> {
    let (settings, settings_warning) = settings::load_settings();
    let log_path = logging::init(&settings);
    if let Some(msg) = settings_warning {
        warn!("config: {msg}");
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log = ?log_path,
        "jamplay starting"
    );

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbound>();
    let engine = RodioEngine::new(EngineNotifier::new(inbox_tx.clone()), &settings.playback)
        .context("failed to start the audio engine")?;
    let catalog =
        JamendoClient::new(&settings.catalog).context("failed to build the catalog client")?;
    let probe = RouteProbe::new(&settings.connectivity)
        .context("connectivity.host must be an IP address")?;

    let mut coordinator: LiveCoordinator = Coordinator::new(
        engine,
        catalog,
        probe,
        inbox_tx,
        Duration::from_millis(settings.playback.poll_interval_ms),
    );
    let updates = coordinator.subscribe();
    let mut app = App::new(coordinator.snapshot());

    startup::apply_startup_defaults(&mut coordinator, &settings);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: anyhow::Result<()> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut coordinator,
            &inbox_rx,
            &updates,
            &mut state,
        )
    })();

    coordinator.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("jamplay stopped");
    run_result
}
