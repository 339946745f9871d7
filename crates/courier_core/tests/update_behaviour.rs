use courier_core::{update, AppState, Effect, JobStatus, Msg};

#[test]
fn start_from_idle_emits_start_run() {
    let state = AppState::new();
    let (mut state, effects) = update(state, Msg::StartClicked);

    assert_eq!(effects, vec![Effect::StartRun]);
    assert_eq!(state.job().status, JobStatus::Idle);
    assert!(state.consume_dirty());
}

#[test]
fn start_while_running_is_ignored() {
    let state = AppState::new();
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::RunStarted {
            total_messages: 10,
        },
    );
    assert_eq!(state.job().status, JobStatus::Running);

    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(state.job().status, JobStatus::Running);
}

#[test]
fn stop_only_cancels_a_running_run() {
    let state = AppState::new();
    let (state, effects) = update(state, Msg::StopClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::RunStarted { total_messages: 5 });
    let (state, effects) = update(state, Msg::StopClicked);
    assert_eq!(effects, vec![Effect::CancelRun]);

    // Terminal states no longer accept a stop.
    let (state, _) = update(
        state,
        Msg::RunFinished {
            status: JobStatus::Paused,
        },
    );
    let (_, effects) = update(state, Msg::StopClicked);
    assert!(effects.is_empty());
}

#[test]
fn finished_status_is_recorded() {
    let state = AppState::new();
    let (state, _) = update(state, Msg::RunStarted { total_messages: 3 });
    let (state, _) = update(
        state,
        Msg::RunFinished {
            status: JobStatus::Completed,
        },
    );
    assert_eq!(state.job().status, JobStatus::Completed);
}

#[test]
fn restart_after_a_terminal_run_resets_counters() {
    let state = AppState::new();
    let (state, _) = update(state, Msg::RunStarted { total_messages: 4 });
    let (state, _) = update(
        state,
        Msg::RunProgress {
            processed_count: 4,
            consecutive_real_errors: 2,
        },
    );
    let (state, _) = update(
        state,
        Msg::RunFinished {
            status: JobStatus::Completed,
        },
    );

    let (state, effects) = update(state, Msg::StartClicked);
    assert_eq!(effects, vec![Effect::StartRun]);
    assert_eq!(state.job().status, JobStatus::Idle);
    assert_eq!(state.job().processed_count, 0);
    assert_eq!(state.job().total_messages, 0);
    assert_eq!(state.job().consecutive_real_errors, 0);
}
