use std::sync::Arc;

use anyhow::Context;

use debt_reminder::config::{ReminderConfig, ServerConfig};
use debt_reminder::job::{ReminderJob, http_client};
use debt_reminder::scheduler::spawn_cron_ticker;
use debt_reminder::server::{AppState, TriggerResponse, reminder_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    let client = http_client(server_config.http_timeout).context("failed to build HTTP client")?;

    // An incomplete reminder config is not fatal here: the trigger reports it.
    let state = match ReminderConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                sheet_id = %config.sheet.sheet_id,
                gid = %config.sheet.gid,
                "Reminder configured"
            );
            AppState::ready(Arc::new(ReminderJob::from_config(&config, client)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reminder configuration incomplete");
            AppState::unconfigured(e)
        }
    };

    // `debt-reminder once`: run a single time, print the JSON envelope, exit.
    if std::env::args().nth(1).as_deref() == Some("once") {
        let response = TriggerResponse::from(state.run_job().await);
        println!("{}", serde_json::to_string(&response.body)?);
        if !response.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    eprintln!("🔔 Debt Reminder v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Trigger: http://0.0.0.0:{}/api/cron", server_config.port);
    eprintln!("   Health:  http://0.0.0.0:{}/health", server_config.port);

    match server_config.schedule.clone() {
        Some(schedule) => {
            eprintln!("   Schedule: {} (UTC)", schedule);
            let _cron_handle = spawn_cron_ticker(state.clone(), schedule);
        }
        None => eprintln!("   Schedule: external (no REMINDER_CRON)"),
    }

    let app = reminder_routes(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server_config.port))
        .await
        .with_context(|| format!("failed to bind port {}", server_config.port))?;
    tracing::info!(port = server_config.port, "Reminder trigger server started");
    axum::serve(listener, app).await?;

    Ok(())
}
