//! Time facilities for the lab.
//!
//! Two pieces live here:
//!
//! - [`Time`] is the host-side frame timer. A real-time host calls
//!   [`Time::update`] once per frame and feeds the returned delta into
//!   [`SimulationController::advance`](crate::SimulationController::advance).
//!   Headless hosts and tests call [`Time::advance`] with a fixed step instead.
//! - [`Clock`] is the per-experiment cadence. Each experiment instance owns one
//!   and decides its interval (16ms frames, 50ms/100ms steps, 2500ms beats).
//!
//! All engine time is a [`Duration`] measured from controller mount, so a
//! simulation advanced by hand is exactly reproducible in its timing.
//!
//! # Example
//!
//! ```ignore
//! use canvas_lab::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! let delta = time.update();
//! controller.advance(delta);
//!
//! println!("Elapsed: {:.2}s", time.elapsed().as_secs_f32());
//! println!("FPS: {:.1}", time.fps());
//! ```

use std::time::{Duration, Instant};

/// Host frame timer.
///
/// Tracks elapsed time, delta time, frame count and FPS, with pause and time
/// scale support. Elapsed time only grows while unpaused.
#[derive(Debug)]
pub struct Time {
    /// When the last real-time update happened.
    last_frame: Instant,
    /// Total unpaused, scaled time.
    elapsed: Duration,
    /// Step produced by the most recent update.
    delta: Duration,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Fixed step used instead of wall-clock deltas (optional).
    fixed_delta: Option<Duration>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time {
    /// Create a new timer starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Sample the wall clock and return the step to advance the lab by.
    ///
    /// Returns [`Duration::ZERO`] while paused.
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.paused {
            self.delta = Duration::ZERO;
            return self.delta;
        }

        let step = self.scaled(self.fixed_delta.unwrap_or(raw));
        self.record(step);

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta
    }

    /// Advance by an explicit step without touching the wall clock.
    ///
    /// Used by headless runners that step the lab at a fixed rate.
    pub fn advance(&mut self, step: Duration) -> Duration {
        if self.paused {
            self.delta = Duration::ZERO;
        } else {
            self.record(self.scaled(step));
        }
        self.delta
    }

    fn scaled(&self, step: Duration) -> Duration {
        if self.time_scale == 1.0 {
            step
        } else {
            step.mul_f32(self.time_scale)
        }
    }

    fn record(&mut self, step: Duration) {
        self.delta = step;
        self.elapsed += step;
        self.frame_count += 1;
    }

    /// Total unpaused time since start.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Step produced by the last update.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pause time progression.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression. The paused interval is not replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Set a fixed step used in place of measured frame time.
    pub fn set_fixed_delta(&mut self, delta: Option<Duration>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier. Negative values clamp to zero.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Reset the timer to its initial state.
    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            time_scale: self.time_scale,
            ..Self::new()
        };
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-delay tick source owned by one experiment instance.
///
/// A stopped clock has no pending tick. Starting schedules the first tick one
/// interval after `now`; every fired tick schedules the next one interval
/// after itself. There is no drift correction.
#[derive(Debug, Clone)]
pub struct Clock {
    interval: Duration,
    next_tick: Option<Duration>,
    ticks: u64,
}

impl Clock {
    /// Create a stopped clock with the given interval.
    ///
    /// Intervals shorter than a millisecond are raised to one millisecond so a
    /// single advance can never spin forever.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_tick: None,
            ticks: 0,
        }
    }

    /// Convenience constructor for millisecond cadences.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Number of ticks fired since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start ticking. No-op if already running.
    pub fn start(&mut self, now: Duration) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now + self.interval);
        }
    }

    /// Stop ticking and drop the pending tick.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// When the next tick is due, if running.
    #[inline]
    pub fn next_due(&self) -> Option<Duration> {
        self.next_tick
    }

    /// Fire the pending tick if it is due at or before `now`.
    ///
    /// Returns the scheduled time of the fired tick.
    pub fn fire(&mut self, now: Duration) -> Option<Duration> {
        let due = self.next_tick.filter(|due| *due <= now)?;
        self.next_tick = Some(due + self.interval);
        self.ticks += 1;
        Some(due)
    }
}
