//! App: the frame loop.
//!
//! ```text
//!            quit key            reader joined
//! Running ─────────────▶ Stopping ─────────────▶ Stopped
//! ```
//!
//! Each frame, while running:
//! 1. Drain the line queue into the store (never waits)
//! 2. Aggregate and render into the frame buffer
//! 3. Present the frame (diffed against the previous one)
//! 4. Poll for one input event without waiting
//! 5. Sleep out the rest of the frame interval
//!
//! Terminal I/O errors end the loop early; the reader is stopped either way.

use crate::actor::{Command, ReaderActor, ReaderExit};
use crate::buffer::Buffer;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::queue::LineQueue;
use crate::terminal::Backend;
use std::time::Instant;

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Rendering frames.
    Running,
    /// Quit requested; waiting for the reader.
    Stopping,
    /// Reader released, loop finished.
    Stopped,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Lines the reader pushed into the queue.
    pub lines_received: u64,
    /// Lines evicted by queue overflow before they were read.
    pub lines_evicted: u64,
    /// Lines the pipeline could not use.
    pub lines_discarded: u64,
    /// Devices in the store.
    pub devices: usize,
    /// Frames rendered.
    pub frames: u64,
    /// How the reader thread ended.
    pub reader: ReaderExit,
}

/// Wall clock in whole seconds since the epoch.
pub fn wall_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

/// The dashboard's frame loop over a terminal backend.
pub struct App<B: Backend> {
    backend: B,
    dashboard: Dashboard,
    queue: LineQueue,
    frame: Buffer,
    state: RunState,
    frames: u64,
    clock: fn() -> i64,
}

impl<B: Backend> App<B> {
    /// Create the loop and its line queue.
    pub fn new(config: DashboardConfig, backend: B) -> Self {
        let queue = LineQueue::new(config.queue_capacity);
        Self {
            backend,
            dashboard: Dashboard::new(config),
            queue,
            frame: Buffer::new(0, 0),
            state: RunState::Running,
            frames: 0,
            clock: wall_clock,
        }
    }

    /// Use `clock` instead of the wall clock for "now".
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// A handle on the line queue, for the reader.
    pub fn queue(&self) -> LineQueue {
        self.queue.clone()
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// The dashboard state.
    pub const fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Run until quit, then stop the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails. The reader has been
    /// stopped by the time this returns, whatever the outcome.
    pub fn run(&mut self, reader: ReaderActor) -> Result<ShutdownReport> {
        log::info!("frame loop running");
        let outcome = self.run_frames();
        if let Err(e) = &outcome {
            log::warn!("frame loop failed: {e}");
        }

        self.state = RunState::Stopping;
        log::info!("frame loop stopping");
        let exit = reader.join(self.dashboard.config().shutdown_grace);
        self.state = RunState::Stopped;

        let report = self.report(exit);
        log::info!(
            "stopped: {} lines received, {} evicted, {} discarded, {} devices, {} frames, reader {:?}",
            report.lines_received,
            report.lines_evicted,
            report.lines_discarded,
            report.devices,
            report.frames,
            report.reader
        );
        outcome.map(|()| report)
    }

    fn run_frames(&mut self) -> Result<()> {
        let interval = self.dashboard.config().frame_interval;
        while self.state == RunState::Running {
            let frame_start = Instant::now();
            self.tick()?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if self.state == RunState::Running && elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        Ok(())
    }

    /// Run one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails.
    pub fn tick(&mut self) -> Result<()> {
        let now = (self.clock)();
        self.dashboard.ingest(&self.queue, now);

        let (width, height) = self.backend.size()?;
        if width != self.frame.width() || height != self.frame.height() {
            self.frame.resize(width, height);
            self.backend.invalidate();
        }
        self.dashboard.render(&mut self.frame, now);
        self.backend.present(&self.frame)?;
        self.frames += 1;

        if let Some(event) = self.backend.poll_event()? {
            match Command::from_event(&event) {
                Some(Command::Quit) => self.state = RunState::Stopping,
                Some(Command::Redraw) => self.backend.invalidate(),
                Some(command) => self.dashboard.apply(command),
                None => {}
            }
        }
        Ok(())
    }

    fn report(&self, reader: ReaderExit) -> ShutdownReport {
        ShutdownReport {
            lines_received: self.queue.pushed(),
            lines_evicted: self.queue.evicted(),
            lines_discarded: self.dashboard.totals().discarded,
            devices: self.dashboard.store().len(),
            frames: self.frames,
            reader,
        }
    }
}
