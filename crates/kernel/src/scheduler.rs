//! Fixed-update / variable-render scheduling.
//!
//! The scheduler is a pure state machine over caller-supplied timestamps. The
//! loop thread feeds it clock readings; tests feed it whatever timeline they
//! need.

use std::time::Duration;

use crate::config::LoopConfig;
use crate::error::{LoopError, Phase};
use crate::metrics::{LoopMetrics, RateWindow, Rates};
use crate::simulation::Simulation;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    /// Updates executed in the catch-up phase.
    pub updates: u32,
    /// Fraction passed to `render`.
    pub interpolation: f32,
    /// Whether the update deadline was snapped forward after catch-up.
    pub clamped: bool,
    /// Rates published if this cycle closed a second.
    pub rates: Option<Rates>,
}

/// Mutable loop state for one run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    ns_per_update: f64,
    ns_per_render: f64,
    max_updates: u32,
    last_update: f64,
    last_render: f64,
    next_tick: u64,
    window: RateWindow,
}

impl Scheduler {
    pub fn new(config: &LoopConfig, now_nanos: u64) -> Self {
        let now = now_nanos as f64;
        Self {
            ns_per_update: NANOS_PER_SECOND / f64::from(config.update_rate_hz),
            ns_per_render: NANOS_PER_SECOND / f64::from(config.render_rate_hz),
            max_updates: config.max_updates_per_render,
            last_update: now,
            last_render: now,
            next_tick: 0,
            window: RateWindow::new(whole_seconds(now)),
        }
    }

    /// Index the next `update` call will receive.
    pub fn next_tick(&self) -> u64 {
        self.next_tick
    }

    /// Timestamp (ns) of the last consumed update deadline.
    pub fn last_update_deadline(&self) -> f64 {
        self.last_update
    }

    pub fn nanos_per_update(&self) -> f64 {
        self.ns_per_update
    }

    /// Run one cycle at `now_nanos`: catch up, clamp, render, roll metrics.
    pub fn cycle<S: Simulation + ?Sized>(
        &mut self,
        now_nanos: u64,
        sim: &mut S,
        metrics: &LoopMetrics,
    ) -> Result<Cycle, LoopError> {
        let now = now_nanos as f64;

        let mut updates = 0;
        while now - self.last_update > self.ns_per_update && updates < self.max_updates {
            let tick = self.next_tick;
            sim.update(tick)
                .map_err(|source| LoopError::collaborator(Phase::Update, tick, source))?;
            self.next_tick += 1;
            updates += 1;
            self.window.record_tick();
            metrics.record_tick();
            self.last_update += self.ns_per_update;
        }

        // Spiral-of-death guard: drop the backlog the cap left behind.
        let clamped = now - self.last_update > self.ns_per_update;
        if clamped {
            let behind = (now - self.last_update) / self.ns_per_update;
            tracing::debug!(
                behind_updates = behind as u64,
                tick = self.next_tick,
                "update deadline clamped"
            );
            self.last_update = now - self.ns_per_update;
        }

        let interpolation = self.interpolation(now_nanos);
        sim.render(interpolation)
            .map_err(|source| LoopError::collaborator(Phase::Render, self.next_tick, source))?;
        self.window.record_frame();
        metrics.record_frame();
        self.last_render = now;

        let rates = self.window.roll(whole_seconds(self.last_update));
        if let Some(rates) = rates {
            metrics.publish(rates);
            tracing::info!(tps = rates.tps, fps = rates.fps, "loop rates");
        }

        Ok(Cycle {
            updates,
            interpolation,
            clamped,
            rates,
        })
    }

    /// Progress into the next not-yet-executed update, clamped to `[0, 1]`.
    pub fn interpolation(&self, now_nanos: u64) -> f32 {
        let progress = (now_nanos as f64 - self.last_update) / self.ns_per_update;
        progress.clamp(0.0, 1.0) as f32
    }

    /// How long the loop may idle at `now_nanos`.
    ///
    /// `None` once either the next render or the next update is due.
    pub fn idle_budget(&self, now_nanos: u64) -> Option<Duration> {
        let now = now_nanos as f64;
        let since_render = now - self.last_render;
        let since_update = now - self.last_update;
        if since_render < self.ns_per_render && since_update < self.ns_per_update {
            let remaining = (self.ns_per_render - since_render).min(self.ns_per_update - since_update);
            Some(Duration::from_nanos(remaining.ceil() as u64))
        } else {
            None
        }
    }
}

fn whole_seconds(nanos: f64) -> u64 {
    (nanos / NANOS_PER_SECOND).floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update(u64),
        Render(f32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_update_at: Option<u64>,
        fail_render: bool,
    }

    impl Recorder {
        fn ticks(&self) -> Vec<u64> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Update(t) => Some(*t),
                    Call::Render(_) => None,
                })
                .collect()
        }
    }

    impl Simulation for Recorder {
        fn update(&mut self, tick: u64) -> anyhow::Result<()> {
            if self.fail_update_at == Some(tick) {
                anyhow::bail!("update exploded");
            }
            self.calls.push(Call::Update(tick));
            Ok(())
        }

        fn render(&mut self, interpolation: f32) -> anyhow::Result<()> {
            if self.fail_render {
                anyhow::bail!("render exploded");
            }
            self.calls.push(Call::Render(interpolation));
            Ok(())
        }
    }

    fn scheduler(update: u32, render: u32, max: u32) -> Scheduler {
        Scheduler::new(&LoopConfig::new(update, render, max), 0)
    }

    #[test]
    fn periods_follow_rates() {
        let s = scheduler(30, 60, 5);
        assert!((s.nanos_per_update() - 33_333_333.333).abs() < 1.0);
        assert_eq!(s.next_tick(), 0);
    }

    #[test]
    fn first_cycle_renders_without_updating() {
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        let cycle = s.cycle(0, &mut sim, &metrics).unwrap();
        assert_eq!(cycle.updates, 0);
        assert!(!cycle.clamped);
        assert_eq!(sim.calls, vec![Call::Render(0.0)]);
        assert_eq!(metrics.frame_count(), 1);
    }

    #[test]
    fn update_requires_strictly_more_than_one_period() {
        let mut s = Scheduler::new(&LoopConfig::new(10, 60, 5), 0);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        s.cycle(100 * MS, &mut sim, &metrics).unwrap();
        assert!(sim.ticks().is_empty());

        s.cycle(101 * MS, &mut sim, &metrics).unwrap();
        assert_eq!(sim.ticks(), vec![0]);
    }

    #[test]
    fn burst_is_capped_and_deadline_clamped() {
        // 30 Hz updates, 500 ms bursts = 15 periods each.
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        s.cycle(0, &mut sim, &metrics).unwrap();

        let first = s.cycle(500 * MS, &mut sim, &metrics).unwrap();
        assert_eq!(first.updates, 5);
        assert!(first.clamped);
        let expected = 500.0 * MS as f64 - s.nanos_per_update();
        assert!((s.last_update_deadline() - expected).abs() < 1.0);
        assert_eq!(first.interpolation, 1.0);

        let second = s.cycle(1000 * MS, &mut sim, &metrics).unwrap();
        assert_eq!(second.updates, 5);
        assert!(second.clamped);

        assert_eq!(sim.ticks(), (0..10).collect::<Vec<_>>());
        assert_eq!(metrics.tick_count(), 10);
    }

    #[test]
    fn arbitrary_stall_never_exceeds_cap() {
        let mut s = scheduler(120, 60, 3);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        // An hour-long suspension.
        let cycle = s.cycle(3_600_000 * MS, &mut sim, &metrics).unwrap();
        assert_eq!(cycle.updates, 3);
        assert!(cycle.clamped);
    }

    #[test]
    fn small_lag_is_caught_up_without_clamp() {
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        // 3.5 periods behind: three updates, half a period left over.
        let now = (3.5 * s.nanos_per_update()) as u64;
        let cycle = s.cycle(now, &mut sim, &metrics).unwrap();
        assert_eq!(cycle.updates, 3);
        assert!(!cycle.clamped);
        assert!((cycle.interpolation - 0.5).abs() < 1e-3);
    }

    #[test]
    fn interpolation_stays_in_unit_range() {
        let mut s = scheduler(30, 60, 2);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        let mut now = 0;
        for step in [1, 7, 16, 33, 34, 90, 250, 3, 0, 1_000] {
            now += step * MS;
            s.cycle(now, &mut sim, &metrics).unwrap();
        }
        for call in &sim.calls {
            if let Call::Render(alpha) = call {
                assert!((0.0..=1.0).contains(alpha), "alpha out of range: {alpha}");
            }
        }
    }

    #[test]
    fn idle_budget_tracks_nearer_deadline() {
        let s = scheduler(30, 60, 5);
        let budget = s.idle_budget(0).unwrap();
        // Render is due first at ~16.67 ms.
        assert!(budget >= Duration::from_micros(16_600));
        assert!(budget <= Duration::from_micros(16_700));

        assert!(s.idle_budget(17 * MS).is_none());
    }

    #[test]
    fn idle_ends_when_update_is_due_even_if_render_is_not() {
        // Updates faster than renders.
        let s = scheduler(120, 30, 5);
        assert!(s.idle_budget(5 * MS).is_some());
        assert!(s.idle_budget(9 * MS).is_none());
    }

    #[test]
    fn rates_publish_when_deadline_crosses_a_second() {
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder::default();
        let metrics = LoopMetrics::new();

        let period = s.nanos_per_update();
        let mut published = None;
        for k in 1..=31u64 {
            let now = (k as f64 * period) as u64 + MS;
            let cycle = s.cycle(now, &mut sim, &metrics).unwrap();
            if cycle.rates.is_some() {
                published = cycle.rates;
                break;
            }
        }
        let rates = published.expect("a second should have rolled over");
        assert!((29..=31).contains(&rates.tps), "tps was {}", rates.tps);
        assert_eq!(metrics.tps(), rates.tps);
        assert_eq!(metrics.fps(), rates.fps);
    }

    #[test]
    fn failed_update_reports_tick_and_skips_render() {
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder {
            fail_update_at: Some(2),
            ..Recorder::default()
        };
        let metrics = LoopMetrics::new();

        let err = s.cycle(200 * MS, &mut sim, &metrics).unwrap_err();
        assert!(matches!(
            err,
            LoopError::Collaborator {
                phase: Phase::Update,
                tick: 2,
                ..
            }
        ));
        assert_eq!(sim.ticks(), vec![0, 1]);
        assert!(!sim.calls.iter().any(|c| matches!(c, Call::Render(_))));
    }

    #[test]
    fn failed_render_is_reported() {
        let mut s = scheduler(30, 60, 5);
        let mut sim = Recorder {
            fail_render: true,
            ..Recorder::default()
        };
        let metrics = LoopMetrics::new();

        let err = s.cycle(0, &mut sim, &metrics).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Render));
        assert_eq!(metrics.frame_count(), 0);
    }
}
