//! The forwarding run loop: walks the planned id range one message at a
//! time, classifying every outcome into advance, retry-same-id or abort.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use chrono::Utc;
use engine_logging::{engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use courier_core::{
    CaptionRules, FilterConfig, JobSpec, JobStatus, LogEvent, Msg, RangePlan, Severity,
};

use crate::caption::CaptionPipeline;
use crate::filter::{FilterVerdict, MessageFilter};
use crate::markup::parse_buttons;
use crate::transport::BotApi;
use crate::types::{CopyOutcome, StartError};

/// Where the run loop reports progress and log lines. The state owner folds
/// these into `courier_core::AppState`; the loop itself never reads back.
pub trait EventSink: Send + Sync {
    fn emit(&self, msg: Msg);
}

/// Forwards messages into a channel drained by the state owner.
pub struct ChannelEventSink {
    tx: mpsc::Sender<Msg>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<Msg>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, msg: Msg) {
        let _ = self.tx.send(msg);
    }
}

/// Tuning knobs for one run.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Pacing between consecutive ids, to stay under platform throughput.
    pub inter_message_delay: Duration,
    /// Added on top of the server's retry-after hint.
    pub rate_limit_buffer: Duration,
    /// Consecutive real errors tolerated before the run trips.
    pub error_storm_threshold: u32,
    /// Clock used to stamp log events.
    pub now_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            inter_message_delay: Duration::from_secs(1),
            rate_limit_buffer: Duration::from_millis(500),
            error_storm_threshold: 20,
            now_utc: Arc::new(|| Utc::now().to_rfc3339()),
        }
    }
}

/// Drives one forwarding run to a terminal state.
///
/// Per-message failures are handled inside the loop and never surface to the
/// caller; only precondition failures return a `StartError`, leaving the
/// observed state Idle. Cancellation is cooperative: the token is sampled at
/// the top of each iteration, so an in-flight copy always finishes first.
pub async fn run_forward_job(
    api: &dyn BotApi,
    spec: &JobSpec,
    rules: &CaptionRules,
    filters: &FilterConfig,
    config: &RunnerConfig,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> Result<JobStatus, StartError> {
    let range = match preflight(api, spec).await {
        Ok(range) => range,
        Err(err) => {
            emit_log(config, sink, Severity::Error, format!("cannot start: {err}"));
            engine_warn!("run refused to start: {err}");
            return Err(err);
        }
    };

    let pipeline = rules.is_active().then(|| CaptionPipeline::new(rules));
    let filter = MessageFilter::new(filters);
    let markup = parse_buttons(&rules.buttons);

    sink.emit(Msg::RunStarted {
        total_messages: range.total,
    });
    emit_log(
        config,
        sink,
        Severity::Info,
        format!(
            "forwarding {} messages (ids {}..={}) from {} to {}",
            range.total, range.start, range.end, spec.source_channel_id, spec.destination_channel_id
        ),
    );
    engine_info!(
        "run started: {} messages, source={} dest={}",
        range.total,
        spec.source_channel_id,
        spec.destination_channel_id
    );

    let mut processed: u64 = 0;
    let mut error_streak: u32 = 0;
    let mut aborted = false;

    let mut message_id = range.start;
    while message_id <= range.end {
        // The only cancellation sample point; in-flight work is never preempted.
        if cancel.is_cancelled() {
            emit_log(config, sink, Severity::Warn, "aborted by user".to_string());
            aborted = true;
            break;
        }

        let meta = api.message_meta(spec.source_channel_id, message_id).await;

        let filtered_reason = meta.as_ref().and_then(|meta| match filter.evaluate(meta) {
            FilterVerdict::Skip { reason } => Some(reason),
            FilterVerdict::Forward => None,
        });

        if let Some(reason) = filtered_reason {
            emit_log(
                config,
                sink,
                Severity::Info,
                format!("skipped message {message_id}: {reason}"),
            );
            error_streak = 0;
        } else {
            let caption = match (&pipeline, &meta) {
                (Some(pipeline), Some(meta)) => {
                    Some(pipeline.transform(&meta.caption, &meta.file_name, meta.file_size))
                }
                _ => None,
            };

            let outcome = api
                .copy_one(
                    spec.destination_channel_id,
                    spec.source_channel_id,
                    message_id,
                    caption.as_deref(),
                    markup.as_ref(),
                )
                .await;

            match outcome {
                CopyOutcome::Success { new_message_id } => {
                    emit_log(
                        config,
                        sink,
                        Severity::Success,
                        format!("copied message {message_id} -> {new_message_id}"),
                    );
                    error_streak = 0;
                }
                CopyOutcome::RateLimited { retry_after_secs } => {
                    emit_log(
                        config,
                        sink,
                        Severity::Warn,
                        format!("rate limited on message {message_id}; retrying in {retry_after_secs}s"),
                    );
                    engine_warn!("rate limited for {retry_after_secs}s at message {message_id}");
                    tokio::time::sleep(
                        Duration::from_secs(retry_after_secs) + config.rate_limit_buffer,
                    )
                    .await;
                    // Same id again; nothing was processed.
                    continue;
                }
                CopyOutcome::Skippable { reason } => {
                    emit_log(
                        config,
                        sink,
                        Severity::Info,
                        format!("skipped message {message_id}: {reason}"),
                    );
                    error_streak = 0;
                }
                CopyOutcome::RealError { description } => {
                    emit_log(
                        config,
                        sink,
                        Severity::Error,
                        format!("message {message_id} failed: {description}"),
                    );
                    error_streak += 1;
                }
                CopyOutcome::NetworkError { description } => {
                    emit_log(
                        config,
                        sink,
                        Severity::Error,
                        format!("network error on message {message_id}: {description}"),
                    );
                    error_streak += 1;
                }
            }
        }

        processed += 1;
        sink.emit(Msg::RunProgress {
            processed_count: processed,
            consecutive_real_errors: error_streak,
        });

        if error_streak > config.error_storm_threshold {
            emit_log(
                config,
                sink,
                Severity::Warn,
                format!("{error_streak} consecutive errors; stopping to protect the bot"),
            );
            engine_warn!("error storm tripped after {error_streak} consecutive failures");
            cancel.cancel();
            aborted = true;
            break;
        }

        tokio::time::sleep(config.inter_message_delay).await;
        message_id += 1;
    }

    let status = if aborted {
        JobStatus::Paused
    } else {
        JobStatus::Completed
    };
    match status {
        JobStatus::Completed => emit_log(
            config,
            sink,
            Severity::Success,
            format!("run completed: {processed} of {} messages processed", range.total),
        ),
        _ => emit_log(
            config,
            sink,
            Severity::Warn,
            format!("run paused after {processed} of {} messages", range.total),
        ),
    }
    engine_info!("run finished with status {status:?} ({processed} processed)");
    sink.emit(Msg::RunFinished { status });

    Ok(status)
}

async fn preflight(api: &dyn BotApi, spec: &JobSpec) -> Result<RangePlan, StartError> {
    if spec.source_channel_id == 0 || spec.destination_channel_id == 0 {
        return Err(StartError::MissingChannel);
    }
    api.get_me()
        .await
        .map_err(|err| StartError::NotConnected(err.to_string()))?;
    Ok(spec.plan()?)
}

fn emit_log(config: &RunnerConfig, sink: &dyn EventSink, severity: Severity, message: String) {
    sink.emit(Msg::LogAppended(LogEvent {
        timestamp: (config.now_utc)(),
        message,
        severity,
    }));
}
