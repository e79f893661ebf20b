//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live session store, the optional advisor, and the rate
//! limiter that guards paid advisor calls. Nothing is persisted: a restart
//! forgets every conversation.

use std::sync::Arc;

use crate::advisor::Advisor;
use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;
use crate::services::session::SessionStore;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; all fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Optional advisor. `None` if advisor env vars are not configured.
    pub advisor: Option<Arc<dyn Advisor>>,
    /// In-memory rate limiter for advisor requests.
    pub rate_limiter: RateLimiter,
    pub config: AppConfig,
}

impl AppState {
    #[must_use]
    pub fn new(advisor: Option<Arc<dyn Advisor>>, config: AppConfig) -> Self {
        Self {
            sessions: SessionStore::new(advisor.clone(), config.session),
            advisor,
            rate_limiter: RateLimiter::new(config.rate_limit),
            config,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::advisor::types::{AdvisorError, BreakupItem, ImageRef, Verdict};
    use crate::chat::options::{Budget, Mood};
    use crate::config::SessionConfig;
    use crate::rate_limit::RateLimitConfig;

    /// Scripted behavior for one mock advisor call.
    pub enum Script<T> {
        Ok(T),
        Fail,
        /// Never settles; only the settle timeout ends the call.
        Hang,
        After(Duration, T),
    }

    /// Advisor that replays scripted outcomes, then succeeds with samples.
    #[derive(Default)]
    pub struct MockAdvisor {
        analyze: Mutex<VecDeque<Script<Verdict>>>,
        visualize: Mutex<VecDeque<Script<ImageRef>>>,
        pub calls: Mutex<Vec<(&'static str, Option<Budget>, Mood)>>,
    }

    impl MockAdvisor {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_analyze(self, script: Script<Verdict>) -> Self {
            self.analyze.lock().unwrap().push_back(script);
            self
        }

        #[must_use]
        pub fn with_visualize(self, script: Script<ImageRef>) -> Self {
            self.visualize.lock().unwrap().push_back(script);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    async fn play<T>(script: Option<Script<T>>, fallback: T) -> Result<T, AdvisorError> {
        match script {
            None => Ok(fallback),
            Some(Script::Ok(value)) => Ok(value),
            Some(Script::Fail) => Err(AdvisorError::ApiResponse { status: 500, body: "mock failure".into() }),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::After(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
        }
    }

    #[async_trait::async_trait]
    impl Advisor for MockAdvisor {
        async fn analyze(&self, _image: &ImageRef, budget: Budget, mood: Mood) -> Result<Verdict, AdvisorError> {
            self.calls.lock().unwrap().push(("analyze", Some(budget), mood));
            let script = self.analyze.lock().unwrap().pop_front();
            play(script, sample_verdict()).await
        }

        async fn visualize(&self, _image: &ImageRef, _verdict: &Verdict, mood: Mood) -> Result<ImageRef, AdvisorError> {
            self.calls.lock().unwrap().push(("visualize", None, mood));
            let script = self.visualize.lock().unwrap().pop_front();
            play(script, sample_after_image()).await
        }
    }

    #[must_use]
    pub fn sample_photo() -> ImageRef {
        ImageRef::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }

    #[must_use]
    pub fn sample_after_image() -> ImageRef {
        ImageRef::new("image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[must_use]
    pub fn sample_verdict() -> Verdict {
        Verdict {
            verdict: "Good bones, bad lighting.".into(),
            estimated_cost: "18,000 - 22,000".into(),
            worth_fixing: vec!["Warm lamps".into(), "White walls".into()],
            avoid_spending_on: vec!["False ceiling".into()],
            reasoning: "Lighting and paint carry most of the change.".into(),
            ultra_budget_cost: Some("9,000 - 12,000".into()),
            transformation_logic: Some("White paint + warm lighting = 70% transformation".into()),
            breakup: vec![BreakupItem { item: "Paint".into(), cost: "8,000 - 10,000".into() }],
        }
    }

    /// Config with short, deterministic timings for paused-clock tests.
    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig {
            port: 0,
            session: SessionConfig {
                prompt_delay: Duration::from_millis(600),
                settle_timeout: Duration::from_secs(5),
                idle_timeout: Duration::from_secs(60),
                sweep_interval: Duration::from_secs(10),
            },
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Create a test `AppState` without an advisor.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None, test_config())
    }

    /// Create a test `AppState` with a mock advisor.
    #[must_use]
    pub fn test_app_state_with_advisor(advisor: Arc<dyn Advisor>) -> AppState {
        AppState::new(Some(advisor), test_config())
    }
}
