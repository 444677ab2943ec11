//! Headless teleprompter runner.
//!
//! Loads the saved state (importing the old Electron store on first run),
//! optionally replaces the script with the contents of a file, measures it
//! with the monospace estimator and plays it to the end at the saved speed,
//! persisting the way the desktop apps do.
//!
//! ```text
//! notchy [SCRIPT_FILE]
//! ```
//!
//! Environment:
//! - `NOTCHY_CONFIG`: engine config JSON (defaults when unset)
//! - `NOTCHY_STATE_PATH`: state file (defaults to the per-user data dir)
//! - `RUST_LOG`: log filter (default `info`; targets `engine`, `state`, `ticker`, `dispatch`, `config`)

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use notchy::handlers::{dispatch_events, Flow};
use notchy::model::{MonospaceMeasurer, TickerConfig};
use notchy::storage::{paths, ElectronStoreImporter, FileStateStore};
use notchy::timing::{SystemClock, TickerThread};
use notchy::{format_elapsed, EngineConfig, EventBus, PlaybackController};

/// Longest the loop sleeps without an event or a timer deadline.
const IDLE_WAIT: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    init_tracing();

    let config = env::var_os("NOTCHY_CONFIG")
        .map(PathBuf::from)
        .map(|path| EngineConfig::load(&path))
        .unwrap_or_default();
    let state_path = env::var_os("NOTCHY_STATE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(paths::state_file_path);

    let script = match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                error!(path = %path.display(), "cannot read script: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let bus = EventBus::new();
    let ticker = TickerThread::new(bus.publisher(), TickerConfig::default());
    let importer = ElectronStoreImporter::new(paths::legacy_file_path());

    info!(path = %state_path.display(), "loading state");
    let mut controller = PlaybackController::bootstrap(
        Box::new(FileStateStore::new(&state_path)),
        &importer,
        config,
        Box::new(ticker),
        Box::new(SystemClock),
    )
    .with_measurer(Box::new(MonospaceMeasurer::default()));

    if let Some(text) = script {
        controller.set_script_text(text);
    }

    let max = controller.max_offset_px().unwrap_or(0.0);
    info!(
        speed = controller.state().playback.speed_px_per_sec,
        offset = controller.state().playback.offset_px,
        max,
        "starting playback"
    );

    let started = Instant::now();
    if !controller.is_playing() {
        controller.toggle_playback();
    }

    loop {
        let timeout = controller
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(IDLE_WAIT, |wait| wait.min(IDLE_WAIT));

        let mut events: Vec<_> = bus.recv_timeout(timeout).into_iter().collect();
        events.extend(bus.drain());

        let flow = dispatch_events(&mut controller, events);
        controller.poll_timers();

        if flow == Flow::Quit {
            break;
        }
        let busy = controller.is_playing()
            || controller.is_countdown_active()
            || controller.is_resume_pending();
        if !busy {
            break;
        }
    }

    controller.save_now();
    info!(
        offset = controller.state().playback.offset_px,
        elapsed = %format_elapsed(started.elapsed().as_secs_f64()),
        failed_writes = controller.persistence_failures(),
        "playback finished"
    );
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
