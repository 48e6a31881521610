//! CityReport Bot - Telegram bot for city issue reports
//!
//! This crate wires the validated startup configuration into the Telegram client.

use anyhow::Result;
use cityreport_core::Config;
use cityreport_core::config::redact_url_credentials;
use std::future::Future;
use teloxide::Bot;

/// Build the Telegram client from the configured token
pub fn build_bot(config: &Config) -> Bot {
    Bot::new(&config.bot_token)
}

/// Log what the process is about to run with, secrets excluded
pub fn log_config_summary(config: &Config) {
    tracing::info!(
        database_url = %redact_url_credentials(&config.database_url),
        backend_api_url = %redact_url_credentials(&config.backend_api_url),
        backend_auth = config.has_backend_api_key(),
        admins = config.admin_ids.len(),
        "Configuration loaded"
    );
}

/// Hold the Telegram client built from `config` until `shutdown` resolves
///
/// No update handlers are attached here. Ctrl+C handling belongs to the caller.
pub async fn serve_until<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let bot = build_bot(&config);
    tracing::info!(api_url = %bot.api_url(), admin_chat_id = config.admin_chat_id, "Telegram client ready");

    shutdown.await;
    tracing::info!("Bot service shutting down");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config::from_vars(|name| (name == "BOT_TOKEN").then(|| "123456:test-token".to_string()))
            .unwrap()
    }

    #[test]
    fn test_build_bot_uses_configured_token() {
        let bot = build_bot(&test_config());
        assert_eq!(bot.token(), "123456:test-token");
    }

    #[test]
    fn test_config_summary_hides_secrets() {
        let config = Config::from_vars(|name| match name {
            "BOT_TOKEN" => Some("123456:test-token".to_string()),
            "DATABASE_URL" => Some("postgres://user:hunter2@h/db".to_string()),
            "BACKEND_API_KEY" => Some("backend-secret".to_string()),
            _ => None,
        })
        .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || log_config_summary(&config));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Configuration loaded"));
        assert!(output.contains("h/db"));
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("test-token"));
        assert!(!output.contains("backend-secret"));
    }

    #[tokio::test]
    async fn test_serve_until_stops_on_shutdown() {
        let result = serve_until(test_config(), std::future::ready(())).await;
        assert!(result.is_ok());
    }
}
