#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to start the configured run.
    StartClicked,
    /// User asked to stop the run in flight.
    StopClicked,
    /// Runner accepted the job and computed the range.
    RunStarted { total_messages: u64 },
    /// Runner finished one attempt (success, skip or tolerated error).
    RunProgress {
        processed_count: u64,
        consecutive_real_errors: u32,
    },
    /// Runner produced a user-facing log line.
    LogAppended(crate::LogEvent),
    /// Runner reached a terminal state, or refused to start (status Idle).
    RunFinished { status: crate::JobStatus },
    /// Fallback for placeholder wiring.
    NoOp,
}
