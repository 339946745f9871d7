use crate::{JobStatus, LogEvent};

/// Read-only snapshot handed to observers; never aliases live state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobViewModel {
    pub status: JobStatus,
    pub processed_count: u64,
    pub total_messages: u64,
    pub progress_percent: u8,
    pub consecutive_real_errors: u32,
    pub logs: Vec<LogEvent>,
}
