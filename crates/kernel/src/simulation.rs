/// The collaborator the loop drives.
///
/// All three calls run on the loop thread, sequentially. An error from any of
/// them ends the run; the loop never retries.
pub trait Simulation: Send + 'static {
    /// One-time setup on the loop thread before the first cycle.
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Advance one fixed step. `tick` starts at 0 and increases by one per call.
    fn update(&mut self, tick: u64) -> anyhow::Result<()>;

    /// Produce one frame. `interpolation` is in `[0.0, 1.0]`.
    fn render(&mut self, interpolation: f32) -> anyhow::Result<()>;
}
