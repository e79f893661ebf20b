//! Service configuration loaded from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a default so the service starts with an empty environment.
//! Unparseable values fall back to the default instead of failing start-up.
//! Advisor credentials live in `advisor::config` because they are optional:
//! without them the service still runs the conversation up to the paid calls.

use std::time::Duration;

use crate::rate_limit::RateLimitConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROMPT_DELAY_MS: u64 = 600;
const DEFAULT_SETTLE_TIMEOUT_SECS: u64 = 150;
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// SESSION CONFIG
// =============================================================================

/// Timing knobs for session runners and the idle sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause before the assistant asks the next question.
    pub prompt_delay: Duration,
    /// Upper bound on one advisor call before it is treated as failed.
    pub settle_timeout: Duration,
    /// Sessions untouched for this long are evicted.
    pub idle_timeout: Duration,
    pub sweep_interval: Duration,
}

impl SessionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            prompt_delay: Duration::from_millis(env_parse("CHAT_PROMPT_DELAY_MS", DEFAULT_PROMPT_DELAY_MS)),
            settle_timeout: Duration::from_secs(env_parse("ADVISOR_SETTLE_TIMEOUT_SECS", DEFAULT_SETTLE_TIMEOUT_SECS)),
            idle_timeout: Duration::from_secs(env_parse(
                "SESSION_IDLE_TIMEOUT_SECS",
                DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
            )),
            sweep_interval: Duration::from_secs(env_parse(
                "SESSION_SWEEP_INTERVAL_SECS",
                DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
            )),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt_delay: Duration::from_millis(DEFAULT_PROMPT_DELAY_MS),
            settle_timeout: Duration::from_secs(DEFAULT_SETTLE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SESSION_SWEEP_INTERVAL_SECS),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Build typed service config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `CHAT_PROMPT_DELAY_MS`: default 600
    /// - `ADVISOR_SETTLE_TIMEOUT_SECS`: default 150
    /// - `SESSION_IDLE_TIMEOUT_SECS`: default 1800
    /// - `SESSION_SWEEP_INTERVAL_SECS`: default 60
    /// - `RATE_LIMIT_*`: see [`RateLimitConfig::from_env`]
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            session: SessionConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
