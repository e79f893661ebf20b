use super::*;
use crate::error::ErrorCode;

fn limiter(per_session_limit: usize, global_limit: usize) -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        per_session_limit,
        per_session_window: Duration::from_secs(60),
        global_limit,
        global_window: Duration::from_secs(60),
    })
}

#[test]
fn per_session_allows_up_to_limit() {
    let rl = limiter(3, 100);
    let session = Uuid::new_v4();
    let now = Instant::now();

    for i in 0..3 {
        assert!(rl.check_and_record_at(session, now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at(session, now),
        Err(RateLimitError::PerSessionExceeded { limit: 3, window_secs: 60 })
    ));
}

#[test]
fn global_allows_up_to_limit() {
    let rl = limiter(100, 4);
    let now = Instant::now();

    // Use distinct sessions to avoid hitting the per-session limit first.
    for i in 0..4 {
        assert!(rl.check_and_record_at(Uuid::new_v4(), now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at(Uuid::new_v4(), now),
        Err(RateLimitError::GlobalExceeded { limit: 4, .. })
    ));
}

#[test]
fn rejected_request_is_not_recorded() {
    let rl = limiter(1, 2);
    let session = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session, now).unwrap();
    assert!(rl.check_and_record_at(session, now).is_err());
    // The rejection above must not have consumed the last global slot.
    assert!(rl.check_and_record_at(Uuid::new_v4(), now).is_ok());
}

#[test]
fn released_slot_can_be_reused() {
    let rl = limiter(1, 1);
    let session = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session, now).unwrap();
    rl.release(session);
    assert!(rl.check_and_record_at(session, now).is_ok());
    assert!(rl.check_and_record_at(session, now).is_err());
}

#[test]
fn release_without_record_is_a_no_op() {
    let rl = limiter(5, 1);
    let other = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(other, now).unwrap();
    rl.release(Uuid::new_v4());
    // The other session's global entry is untouched.
    assert!(matches!(rl.check_and_record_at(Uuid::new_v4(), now), Err(RateLimitError::GlobalExceeded { .. })));
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = limiter(2, 100);
    let session = Uuid::new_v4();
    let start = Instant::now();

    for _ in 0..2 {
        rl.check_and_record_at(session, start).unwrap();
    }
    assert!(rl.check_and_record_at(session, start).is_err());

    let after_window = start + Duration::from_secs(60) + Duration::from_millis(1);
    assert!(rl.check_and_record_at(session, after_window).is_ok());
}

#[test]
fn distinct_sessions_do_not_interfere() {
    let rl = limiter(1, 100);
    let session_a = Uuid::new_v4();
    let session_b = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session_a, now).unwrap();
    assert!(rl.check_and_record_at(session_a, now).is_err());
    assert!(rl.check_and_record_at(session_b, now).is_ok());
}

#[test]
fn forget_drops_session_history() {
    let rl = limiter(1, 100);
    let session = Uuid::new_v4();
    let now = Instant::now();

    rl.check_and_record_at(session, now).unwrap();
    assert_eq!(rl.tracked_sessions(), 1);
    rl.forget(session);
    assert_eq!(rl.tracked_sessions(), 0);
    assert!(rl.check_and_record_at(session, now).is_ok());
}

#[test]
fn errors_are_retryable() {
    let err = RateLimitError::GlobalExceeded { limit: 1, window_secs: 60 };
    assert_eq!(err.error_code(), "E_RATE_LIMITED");
    assert!(err.retryable());
    assert!(err.to_string().contains("max 1 requests/60s"));
}
