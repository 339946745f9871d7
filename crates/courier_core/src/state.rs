use std::collections::VecDeque;

use crate::view_model::JobViewModel;

/// Lifecycle of a forwarding run. `Paused` and `Completed` are terminal for
/// that run; a new run always begins from a fresh `Idle`-derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Severity tag carried by every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
}

/// One human-readable line produced by the run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// RFC 3339 timestamp supplied by the producer's clock.
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

/// Number of log events retained for observers.
pub const LOG_CAPACITY: usize = 100;

/// Append-only bounded log; the oldest entry is evicted past capacity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEvent>,
}

impl LogBuffer {
    pub fn push(&mut self, event: LogEvent) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEvent> {
        self.entries.iter().cloned().collect()
    }
}

/// Mutable progress of the run in flight. Owned by the state machine; the
/// run loop reports into it through messages only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobState {
    pub status: JobStatus,
    /// Ids attempted so far, success or skip; in-flight retries excluded.
    pub processed_count: u64,
    pub total_messages: u64,
    pub consecutive_real_errors: u32,
}

impl JobState {
    /// Floor of attempted ids over the planned total, in percent.
    pub fn progress_percent(&self) -> u8 {
        if self.total_messages == 0 {
            return 0;
        }
        ((self.processed_count * 100) / self.total_messages).min(100) as u8
    }
}

/// Single-writer application state; observers read cloned snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    job: JobState,
    log: LogBuffer,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self) -> &JobState {
        &self.job
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Read-only snapshot for observers.
    pub fn view(&self) -> JobViewModel {
        JobViewModel {
            status: self.job.status,
            processed_count: self.job.processed_count,
            total_messages: self.job.total_messages,
            progress_percent: self.job.progress_percent(),
            consecutive_real_errors: self.job.consecutive_real_errors,
            logs: self.log.to_vec(),
        }
    }

    /// Whether observers need a refresh; clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn job_mut(&mut self) -> &mut JobState {
        &mut self.job
    }

    pub(crate) fn push_log(&mut self, event: LogEvent) {
        self.log.push(event);
    }

    /// Discards per-run counters; the log history survives across runs.
    pub(crate) fn reset_for_new_run(&mut self) {
        self.job = JobState::default();
    }
}
