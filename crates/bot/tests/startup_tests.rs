//! Startup tests: configuration from the process environment into the bot service

#![allow(unsafe_code)]

use cityreport_core::Config;
use serial_test::serial;
use std::env;

fn clear_vars() {
    for name in ["BOT_TOKEN", "DATABASE_URL", "BACKEND_API_URL", "BACKEND_API_KEY"] {
        unsafe {
            env::remove_var(name);
        }
    }
}

/// Startup without a token must stop with a diagnostic naming the variable
#[test]
#[serial]
fn test_startup_fails_without_bot_token() {
    clear_vars();

    let err = anyhow::Error::from(Config::from_env().unwrap_err());
    let msg = err.to_string();

    assert!(msg.contains("BOT_TOKEN"));
    assert!(msg.contains(".env"));
}

/// A valid environment reaches the running bot service
#[tokio::test]
#[serial]
async fn test_startup_runs_bot_with_env_config() {
    clear_vars();
    unsafe {
        env::set_var("BOT_TOKEN", "123456:integration");
        env::set_var("BACKEND_API_KEY", "integration-key");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(bot::build_bot(&config).token(), "123456:integration");
    assert!(config.has_backend_api_key());

    bot::log_config_summary(&config);
    let result = bot::serve_until(config, async {}).await;
    assert!(result.is_ok());

    clear_vars();
}
