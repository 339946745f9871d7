//! Courier core: pure state machine, range planning and configuration records.
mod config;
mod effect;
mod msg;
mod plan;
mod state;
mod update;
mod view_model;

pub use config::{
    CaptionRules, ContentFilters, FilterConfig, JobSpec, MediaKind, ReplacementRule, SizeLimits,
};
pub use effect::Effect;
pub use msg::Msg;
pub use plan::{plan, InvalidRangeError, RangePlan};
pub use state::{AppState, JobState, JobStatus, LogBuffer, LogEvent, Severity, LOG_CAPACITY};
pub use update::update;
pub use view_model::JobViewModel;
