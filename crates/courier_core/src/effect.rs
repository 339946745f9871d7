/// Side effects requested by `update`, executed by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Launch the forwarding runner with the configured spec.
    StartRun,
    /// Request cooperative cancellation of the run in flight.
    CancelRun,
}
