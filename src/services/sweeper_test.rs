use std::time::Duration;

use super::*;
use crate::state::test_helpers;

#[tokio::test(start_paused = true)]
async fn sweep_once_keeps_active_sessions() {
    let state = test_helpers::test_app_state();
    state.sessions.create().await;

    assert_eq!(sweep_once(&state).await, 0);
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn sweep_once_evicts_idle_session_and_its_rate_history() {
    let state = test_helpers::test_app_state();
    let handle = state.sessions.create().await;
    state.rate_limiter.check_and_record(handle.id()).unwrap();

    tokio::time::advance(state.config.session.idle_timeout + Duration::from_secs(1)).await;

    assert_eq!(sweep_once(&state).await, 1);
    assert!(state.sessions.is_empty().await);
    assert_eq!(state.rate_limiter.tracked_sessions(), 0);
}

#[tokio::test(start_paused = true)]
async fn background_sweeper_evicts_on_interval() {
    let state = test_helpers::test_app_state();
    state.sessions.create().await;
    let sweeper = spawn_idle_sweeper(state.clone());

    let session = state.config.session;
    tokio::time::sleep(session.idle_timeout + session.sweep_interval * 2).await;

    assert!(state.sessions.is_empty().await);
    sweeper.abort();
}
