//! Idle sweeper: background eviction of abandoned sessions.
//!
//! DESIGN
//! ======
//! A single task wakes every `SESSION_SWEEP_INTERVAL_SECS`, removes sessions
//! idle longer than `SESSION_IDLE_TIMEOUT_SECS`, and drops their rate-limit
//! history. Eviction drops the store's handle, which stops the session's
//! runner; websockets following it see their update channel close.

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::state::AppState;

/// Run one sweep. Returns the number of evicted sessions.
pub async fn sweep_once(state: &AppState) -> usize {
    let evicted = state.sessions.evict_idle().await;
    for id in &evicted {
        state.rate_limiter.forget(*id);
    }
    if !evicted.is_empty() {
        let remaining = state.sessions.len().await;
        info!(count = evicted.len(), remaining, "sweeper: evicted idle sessions");
    }
    evicted.len()
}

/// Spawn the background sweeper. Returns a handle for shutdown.
pub fn spawn_idle_sweeper(state: AppState) -> JoinHandle<()> {
    let session = state.config.session;
    info!(
        interval_secs = session.sweep_interval.as_secs(),
        idle_timeout_secs = session.idle_timeout.as_secs(),
        "session sweeper configured"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(session.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sweep_once(&state).await;
        }
    })
}

#[cfg(test)]
#[path = "sweeper_test.rs"]
mod tests;
