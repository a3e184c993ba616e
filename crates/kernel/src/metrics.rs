use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Diagnostics published by the loop thread.
///
/// Single writer (the loop thread), any number of readers. Values are
/// independent relaxed atomics, so a reader racing a rollover may see `tps`
/// from one second and `fps` from the next. Never use these for control flow.
#[derive(Debug, Default)]
pub struct LoopMetrics {
    running: AtomicBool,
    ticks: AtomicU64,
    frames: AtomicU64,
    tps: AtomicU32,
    fps: AtomicU32,
}

/// Tick and frame counts for one completed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rates {
    pub tps: u32,
    pub fps: u32,
}

/// Point-in-time copy of [`LoopMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub running: bool,
    pub ticks: u64,
    pub frames: u64,
    pub tps: u32,
    pub fps: u32,
}

impl LoopMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Ticks executed since the current run started.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Frames rendered since the current run started.
    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Ticks in the last completed second.
    pub fn tps(&self) -> u32 {
        self.tps.load(Ordering::Relaxed)
    }

    /// Frames in the last completed second.
    pub fn fps(&self) -> u32 {
        self.fps.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            running: self.is_running(),
            ticks: self.tick_count(),
            frames: self.frame_count(),
            tps: self.tps(),
            fps: self.fps(),
        }
    }

    pub(crate) fn reset(&self) {
        self.ticks.store(0, Ordering::Relaxed);
        self.frames.store(0, Ordering::Relaxed);
        self.tps.store(0, Ordering::Relaxed);
        self.fps.store(0, Ordering::Relaxed);
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn publish(&self, rates: Rates) {
        self.tps.store(rates.tps, Ordering::Relaxed);
        self.fps.store(rates.fps, Ordering::Relaxed);
    }
}

/// Per-second tick/frame counters owned by the scheduler.
#[derive(Debug, Clone)]
pub struct RateWindow {
    second: u64,
    ticks: u32,
    frames: u32,
}

impl RateWindow {
    pub fn new(second: u64) -> Self {
        Self {
            second,
            ticks: 0,
            frames: 0,
        }
    }

    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Close the window if `second` has moved past the recorded one.
    pub fn roll(&mut self, second: u64) -> Option<Rates> {
        if second <= self.second {
            return None;
        }
        let rates = Rates {
            tps: self.ticks,
            fps: self.frames,
        };
        self.ticks = 0;
        self.frames = 0;
        self.second = second;
        Some(rates)
    }

    pub fn second(&self) -> u64 {
        self.second
    }
}
