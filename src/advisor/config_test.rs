use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_advisor_env() {
    unsafe {
        std::env::remove_var("ADVISOR_API_KEY_ENV");
        std::env::remove_var("ADVISOR_BASE_URL");
        std::env::remove_var("ADVISOR_ANALYZE_MODEL");
        std::env::remove_var("ADVISOR_IMAGE_MODEL");
        std::env::remove_var("ADVISOR_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("ADVISOR_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("ADVISOR_TEST_KEY");
    }
}

#[test]
fn from_env_defaults() {
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_API_KEY_ENV", "ADVISOR_TEST_KEY");
        std::env::set_var("ADVISOR_TEST_KEY", "secret");
    }

    let cfg = AdvisorConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.base_url, DEFAULT_ADVISOR_BASE_URL);
    assert_eq!(cfg.analyze_model, DEFAULT_ANALYZE_MODEL);
    assert_eq!(cfg.image_model, DEFAULT_IMAGE_MODEL);
    assert_eq!(
        cfg.timeouts,
        AdvisorTimeouts {
            request_secs: DEFAULT_ADVISOR_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_ADVISOR_CONNECT_TIMEOUT_SECS
        }
    );

    unsafe { clear_advisor_env() };
}

#[test]
fn from_env_parses_overrides() {
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_API_KEY_ENV", "ADVISOR_TEST_KEY");
        std::env::set_var("ADVISOR_TEST_KEY", "secret");
        std::env::set_var("ADVISOR_BASE_URL", "https://example.test/v1beta/");
        std::env::set_var("ADVISOR_ANALYZE_MODEL", "gemini-custom");
        std::env::set_var("ADVISOR_IMAGE_MODEL", " gemini-image ");
        std::env::set_var("ADVISOR_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("ADVISOR_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = AdvisorConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://example.test/v1beta");
    assert_eq!(cfg.analyze_model, "gemini-custom");
    assert_eq!(cfg.image_model, "gemini-image");
    assert_eq!(cfg.timeouts, AdvisorTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_advisor_env() };
}

#[test]
fn from_env_missing_key_var_errors() {
    unsafe { clear_advisor_env() };

    let err = AdvisorConfig::from_env().unwrap_err();
    assert!(matches!(err, AdvisorError::MissingApiKey { ref var } if var == "ADVISOR_API_KEY_ENV"));
}

#[test]
fn from_env_empty_key_errors() {
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_API_KEY_ENV", "ADVISOR_TEST_KEY");
        std::env::set_var("ADVISOR_TEST_KEY", "  ");
    }

    let err = AdvisorConfig::from_env().unwrap_err();
    assert!(matches!(err, AdvisorError::MissingApiKey { ref var } if var == "ADVISOR_TEST_KEY"));

    unsafe { clear_advisor_env() };
}

#[test]
fn from_env_rejects_non_http_base_url() {
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_API_KEY_ENV", "ADVISOR_TEST_KEY");
        std::env::set_var("ADVISOR_TEST_KEY", "secret");
        std::env::set_var("ADVISOR_BASE_URL", "ftp://nope");
    }

    let err = AdvisorConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("ADVISOR_BASE_URL"));

    unsafe { clear_advisor_env() };
}
