//! HTTP trigger for the reminder job.
//!
//! `/api/cron` runs the job once per request (any method) and answers with
//! the JSON envelope external schedulers expect. `/health` is a liveness
//! probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{ConfigError, Error, Result};
use crate::job::{JobOutcome, ReminderJob};
use crate::ledger::DebtSummary;

/// Reported when required configuration is absent.
pub const CONFIG_ERROR_MESSAGE: &str = "Env Vars belum lengkap.";

/// Reported when nobody owes anything.
pub const SETTLED_STATUS: &str = "Lunas semua.";

/// The job, or the reason it could not be built at startup.
#[derive(Clone)]
pub enum JobSlot {
    Ready(Arc<ReminderJob>),
    Unconfigured(ConfigError),
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub job: JobSlot,
}

impl AppState {
    pub fn ready(job: Arc<ReminderJob>) -> Self {
        Self {
            job: JobSlot::Ready(job),
        }
    }

    pub fn unconfigured(err: ConfigError) -> Self {
        Self {
            job: JobSlot::Unconfigured(err),
        }
    }

    /// Run the job if it is configured.
    pub async fn run_job(&self) -> Result<JobOutcome> {
        match &self.job {
            JobSlot::Ready(job) => job.run(Utc::now()).await,
            JobSlot::Unconfigured(err) => Err(Error::Config(err.clone())),
        }
    }
}

/// Wire body of a trigger response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TriggerBody {
    Notified {
        success: bool,
        summary: DebtSummary,
        fonnte: serde_json::Value,
    },
    Settled {
        status: &'static str,
    },
    Failed {
        error: String,
    },
}

/// A run result translated to HTTP status plus JSON body.
#[derive(Debug)]
pub struct TriggerResponse {
    pub status: StatusCode,
    pub body: TriggerBody,
}

impl From<Result<JobOutcome>> for TriggerResponse {
    fn from(result: Result<JobOutcome>) -> Self {
        match result {
            Ok(JobOutcome::Notified {
                report,
                relay_response,
            }) => Self {
                status: StatusCode::OK,
                body: TriggerBody::Notified {
                    success: true,
                    summary: report.summary,
                    fonnte: relay_response,
                },
            },
            Ok(JobOutcome::Settled { .. }) => Self {
                status: StatusCode::OK,
                body: TriggerBody::Settled {
                    status: SETTLED_STATUS,
                },
            },
            Err(Error::Config(err)) => {
                error!(error = %err, "Reminder is not configured");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: TriggerBody::Failed {
                        error: CONFIG_ERROR_MESSAGE.to_string(),
                    },
                }
            }
            Err(err) => {
                error!(error = ?err, "Reminder run failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: TriggerBody::Failed {
                        error: err.to_string(),
                    },
                }
            }
        }
    }
}

impl TriggerResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for TriggerResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build the router with the trigger and health routes.
pub fn reminder_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cron", any(trigger))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "debt-reminder"
    }))
}

async fn trigger(State(state): State<AppState>) -> TriggerResponse {
    info!("Reminder triggered over HTTP");
    TriggerResponse::from(state.run_job().await)
}
