use crate::{AppState, Effect, JobStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked => {
            // A run in flight owns the state; re-entrant starts are ignored.
            if state.job().status == JobStatus::Running {
                Vec::new()
            } else {
                state.reset_for_new_run();
                state.mark_dirty();
                vec![Effect::StartRun]
            }
        }
        Msg::StopClicked => {
            if state.job().status == JobStatus::Running {
                vec![Effect::CancelRun]
            } else {
                Vec::new()
            }
        }
        Msg::RunStarted { total_messages } => {
            let job = state.job_mut();
            job.status = JobStatus::Running;
            job.total_messages = total_messages;
            job.processed_count = 0;
            job.consecutive_real_errors = 0;
            state.mark_dirty();
            Vec::new()
        }
        Msg::RunProgress {
            processed_count,
            consecutive_real_errors,
        } => {
            let job = state.job_mut();
            job.processed_count = processed_count;
            job.consecutive_real_errors = consecutive_real_errors;
            state.mark_dirty();
            Vec::new()
        }
        Msg::LogAppended(event) => {
            state.push_log(event);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RunFinished { status } => {
            state.job_mut().status = status;
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
