//! Tick delivery onto the event bus.
//!
//! The controller only needs a start/stop switch ([`TickDriver`]).
//! [`TickerThread`] implements it with a background thread that runs a
//! [`TickSource`] and publishes [`AppEvent::Tick`]; the owning thread applies
//! the ticks when it drains the bus, so state is never touched off-thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::ticker::{Backend, FrameClock, TickSource};
use crate::events::{AppEvent, EventPublisher};
use crate::model::TickerConfig;

/// Start/stop switch for whatever produces ticks.
pub trait TickDriver {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Driver for hosts that feed ticks themselves (a UI toolkit's own frame
/// callback, or tests). It only records whether ticks are wanted.
#[derive(Debug, Default)]
pub struct ExternalTicks {
    running: bool,
}

impl TickDriver for ExternalTicks {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Creates the preferred frame clock, if the platform has one.
pub type ClockFactory = fn() -> Option<Box<dyn FrameClock>>;

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Background thread publishing ticks while started.
pub struct TickerThread {
    publisher: EventPublisher,
    config: TickerConfig,
    clock_factory: ClockFactory,
    worker: Option<Worker>,
}

impl TickerThread {
    /// Ticker using the platform's frame clock (see [`crate::platform`]).
    pub fn new(publisher: EventPublisher, config: TickerConfig) -> Self {
        Self {
            publisher,
            config,
            clock_factory: crate::platform::primary_frame_clock,
            worker: None,
        }
    }

    /// Replace the frame clock factory.
    pub fn with_clock_factory(mut self, clock_factory: ClockFactory) -> Self {
        self.clock_factory = clock_factory;
        self
    }
}

impl TickDriver for TickerThread {
    fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let running = Arc::new(AtomicBool::new(true));
        let source = TickSource::new((self.clock_factory)(), self.config.clone());
        let publisher = self.publisher.clone();
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || run(source, flag, publisher));

        self.worker = Some(Worker { running, handle });
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.running.store(false, Ordering::Release);
            if worker.handle.join().is_err() {
                warn!(target: "ticker", "tick thread panicked");
            }
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for TickerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    mut source: TickSource<Box<dyn FrameClock>>,
    running: Arc<AtomicBool>,
    publisher: EventPublisher,
) {
    let origin = Instant::now();
    let now = || origin.elapsed().as_secs_f64();
    let interval = source.config().fallback_interval;

    source.start(now());
    debug!(target: "ticker", backend = ?source.backend(), "tick thread running");

    while running.load(Ordering::Acquire) {
        let delta = match source.backend() {
            Some(Backend::FrameClock) => {
                let delta = match source.wait_frame() {
                    Some(timestamp) => source.frame(timestamp),
                    None => {
                        source.missed_frame();
                        thread::sleep(Duration::from_millis(1));
                        None
                    }
                };
                source.check_watchdog(now());
                delta
            }
            _ => {
                thread::sleep(interval);
                source.fallback_frame(now())
            }
        };

        if let Some(delta_seconds) = delta {
            publisher.publish(AppEvent::Tick { delta_seconds });
        }
    }

    source.stop();
}
