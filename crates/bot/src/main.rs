//! CityReport Bot - Telegram bot for city issue reports
//!
//! Startup order is fixed: tracing, configuration, runtime. Nothing else is
//! built when the configuration is invalid.

use anyhow::Result;
use cityreport_core::Config;
use tokio::signal;

fn main() -> Result<()> {
    // The guard must be kept alive for the duration of the program to ensure logs are flushed
    let _guard = cityreport_shared::init_tracing("bot");

    tracing::info!("Starting CityReport bot");

    // Merges .env into the process environment, so it runs before the runtime threads exist
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    bot::log_config_summary(&config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(bot::serve_until(config, wait_for_shutdown()))?;

    tracing::info!("Bot stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
