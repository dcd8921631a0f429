//! In-process cron ticker.
//!
//! Runs the reminder at each fire time of a cron schedule (UTC). A run is
//! awaited before the next fire time is computed, so runs never overlap;
//! fire times missed during a slow run are skipped.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::server::{AppState, TriggerResponse};

/// First fire time strictly after `after`.
pub fn next_fire(schedule: &cron::Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Spawn the ticker. The task ends when the schedule has no further fire times.
pub fn spawn_cron_ticker(
    state: AppState,
    schedule: cron::Schedule,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut after = Utc::now();
        loop {
            let Some(next) = next_fire(&schedule, after) else {
                warn!("Cron schedule has no upcoming fire times, ticker stopped");
                break;
            };

            info!(next = %next, "Next scheduled reminder");
            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let response = TriggerResponse::from(state.run_job().await);
            if response.is_success() {
                info!(status = response.status.as_u16(), "Scheduled reminder finished");
            } else {
                error!(status = response.status.as_u16(), "Scheduled reminder failed");
            }

            after = next.max(Utc::now());
        }
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn next_fire_is_strictly_after() {
        let schedule = cron::Schedule::from_str("0 0 13 * * *").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap();
        let next = next_fire(&schedule, at).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 20, 13, 0, 0).unwrap());
    }

    #[test]
    fn next_fire_same_day_when_before() {
        let schedule = cron::Schedule::from_str("0 30 12 * * *").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let next = next_fire(&schedule, at).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap());
    }

    #[test]
    fn exhausted_schedule_has_no_fire() {
        let schedule = cron::Schedule::from_str("0 0 0 1 1 * 2000").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(next_fire(&schedule, at).is_none());
    }

    #[tokio::test]
    async fn ticker_stops_on_exhausted_schedule() {
        let schedule = cron::Schedule::from_str("0 0 0 1 1 * 2000").unwrap();
        let state = AppState::unconfigured(crate::error::ConfigError::MissingEnvVar(
            "SHEET_ID".into(),
        ));
        let handle = spawn_cron_ticker(state, schedule);
        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("ticker did not stop")
            .unwrap();
    }
}
