use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::clock::{Clock, MonotonicClock};
use crate::config::LoopConfig;
use crate::error::{LoopError, Phase};
use crate::metrics::LoopMetrics;
use crate::pacing::{Pacer, SleepPacer};
use crate::scheduler::Scheduler;
use crate::signal::ShutdownFlag;
use crate::simulation::Simulation;

type RunOutcome<S> = (S, Result<(), LoopError>);

/// Owns the loop thread and the simulation it drives.
///
/// Lifecycle is `Stopped -> Running -> Stopped`. `start` and `stop` are
/// serialised by an internal lock; the diagnostics accessors never take it.
pub struct GameLoop<S: Simulation> {
    config: LoopConfig,
    name: String,
    clock: Arc<dyn Clock>,
    pacer: Arc<dyn Pacer>,
    metrics: Arc<LoopMetrics>,
    control: Mutex<Control<S>>,
}

struct Control<S> {
    simulation: Option<S>,
    run: Option<Run<S>>,
}

struct Run<S> {
    shutdown: ShutdownFlag,
    handle: JoinHandle<RunOutcome<S>>,
}

impl<S: Simulation> GameLoop<S> {
    /// Build a stopped loop. Fails if `config` breaks its invariants.
    pub fn new(config: LoopConfig, simulation: S) -> Result<Self, LoopError> {
        config.validate()?;
        let pacer = Arc::new(SleepPacer::new(config.idle_granularity()));
        Ok(Self {
            config,
            name: "olimu".to_string(),
            clock: Arc::new(MonotonicClock::new()),
            pacer,
            metrics: Arc::new(LoopMetrics::new()),
            control: Mutex::new(Control {
                simulation: Some(simulation),
                run: None,
            }),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Prefix for the loop thread's name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Spawn the loop thread.
    ///
    /// Strict: a live loop yields [`LoopError::AlreadyRunning`]. A previous run
    /// that already ended on its own is reaped first, and its failure logged.
    pub fn start(&self) -> Result<(), LoopError> {
        let mut control = self.lock_control();

        if let Some(run) = control.run.take() {
            // A thread that has raised its flag or cleared `running` is on its
            // way out; join it.
            let live = !run.handle.is_finished()
                && !run.shutdown.is_set()
                && self.metrics.is_running();
            if live {
                control.run = Some(run);
                return Err(LoopError::AlreadyRunning);
            }
            if let Err(err) = reap(&mut control, run) {
                tracing::warn!(error = %err, "previous run had failed; restarting");
            }
        }

        let mut simulation = control.simulation.take().ok_or(LoopError::SimulationLost)?;

        let shutdown = ShutdownFlag::new();
        let config = self.config.clone();
        let clock = Arc::clone(&self.clock);
        let pacer = Arc::clone(&self.pacer);
        let metrics = Arc::clone(&self.metrics);
        let flag = shutdown.clone();

        metrics.reset();
        metrics.set_running(true);

        let spawned = std::thread::Builder::new()
            .name(format!("{}-main", self.name))
            .spawn(move || {
                let _running = RunningGuard(&metrics);
                let result = drive(
                    &mut simulation,
                    &config,
                    clock.as_ref(),
                    pacer.as_ref(),
                    &flag,
                    &metrics,
                );
                // Observers should see a failed loop as stopped.
                flag.set();
                (simulation, result)
            });

        match spawned {
            Ok(handle) => {
                control.run = Some(Run { shutdown, handle });
                tracing::info!(name = %self.name, "game loop started");
                Ok(())
            }
            Err(err) => {
                // The closure (and the simulation with it) was dropped.
                self.metrics.set_running(false);
                Err(LoopError::Spawn(err))
            }
        }
    }

    /// Request a stop and join the loop thread.
    ///
    /// Always joins. `Ok` for a clean exit or when nothing was running; an
    /// error reports why the run had already ended.
    pub fn stop(&self) -> Result<(), LoopError> {
        let mut control = self.lock_control();
        let Some(run) = control.run.take() else {
            return Ok(());
        };
        run.shutdown.set();
        let result = reap(&mut control, run);
        tracing::info!(
            ticks = self.metrics.tick_count(),
            frames = self.metrics.frame_count(),
            "game loop stopped"
        );
        result
    }

    pub fn is_running(&self) -> bool {
        self.metrics.is_running()
    }

    /// Ticks executed in the current (or last) run.
    pub fn tick_count(&self) -> u64 {
        self.metrics.tick_count()
    }

    /// Ticks in the last completed second.
    pub fn current_tps(&self) -> u32 {
        self.metrics.tps()
    }

    /// Frames in the last completed second.
    pub fn current_fps(&self) -> u32 {
        self.metrics.fps()
    }

    /// Shared handle for observers on other threads.
    pub fn metrics(&self) -> Arc<LoopMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Stop the loop and hand back the simulation, if it survived.
    pub fn into_simulation(self) -> Option<S> {
        if let Err(err) = self.stop() {
            tracing::warn!(error = %err, "loop had failed before it was stopped");
        }
        let simulation = self.lock_control().simulation.take();
        simulation
    }

    fn lock_control(&self) -> MutexGuard<'_, Control<S>> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Simulation> Drop for GameLoop<S> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(error = %err, "game loop ended with an error");
        }
    }
}

/// Join a finished or stopping run and put the simulation back.
fn reap<S>(control: &mut Control<S>, run: Run<S>) -> Result<(), LoopError> {
    match run.handle.join() {
        Ok((simulation, result)) => {
            control.simulation = Some(simulation);
            result
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(%message, "loop thread panicked");
            Err(LoopError::Panicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Clears the published running flag however the loop thread exits.
struct RunningGuard<'a>(&'a LoopMetrics);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set_running(false);
    }
}

/// Body of the loop thread.
fn drive<S: Simulation>(
    sim: &mut S,
    config: &LoopConfig,
    clock: &dyn Clock,
    pacer: &dyn Pacer,
    shutdown: &ShutdownFlag,
    metrics: &LoopMetrics,
) -> Result<(), LoopError> {
    let _span = tracing::info_span!("game_loop").entered();

    sim.init()
        .map_err(|source| LoopError::collaborator(Phase::Init, 0, source))
        .inspect_err(|err| tracing::warn!(error = %err, "simulation init failed"))?;

    let mut scheduler = Scheduler::new(config, clock.now_nanos());
    tracing::info!(
        update_hz = config.update_rate_hz,
        render_hz = config.render_rate_hz,
        max_updates = config.max_updates_per_render,
        "scheduling started"
    );

    while !shutdown.is_set() {
        scheduler
            .cycle(clock.now_nanos(), sim, metrics)
            .inspect_err(|err| tracing::warn!(error = %err, "collaborator failed; loop exiting"))?;

        while !shutdown.is_set() {
            match scheduler.idle_budget(clock.now_nanos()) {
                Some(budget) => pacer.pause(budget, shutdown),
                None => break,
            }
        }
    }

    Ok(())
}
