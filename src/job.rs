//! One reminder run: fetch → parse → aggregate → render → send.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::config::ReminderConfig;
use crate::error::Result;
use crate::ledger::{AggregateReport, aggregate};
use crate::message::render_reminder;
use crate::notifier::{FonnteNotifier, Notifier};
use crate::sheet::{SheetFetcher, SheetLocation, SheetSource, parse_csv};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Nobody owes anything; no message was sent.
    Settled { report: AggregateReport },
    /// A reminder was sent. `relay_response` is the relay's reply, untouched.
    Notified {
        report: AggregateReport,
        relay_response: serde_json::Value,
    },
}

/// Shared HTTP client with a bounded per-request timeout.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("debt-reminder/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// The reminder pipeline wired to its two collaborators.
pub struct ReminderJob {
    sheet: Arc<dyn SheetSource>,
    notifier: Arc<dyn Notifier>,
    location: SheetLocation,
}

impl ReminderJob {
    pub fn new(
        sheet: Arc<dyn SheetSource>,
        notifier: Arc<dyn Notifier>,
        location: SheetLocation,
    ) -> Self {
        Self {
            sheet,
            notifier,
            location,
        }
    }

    /// Wire the Google Sheets export and the Fonnte relay from config.
    pub fn from_config(config: &ReminderConfig, client: reqwest::Client) -> Self {
        let sheet = SheetFetcher::new(config.sheet.clone(), client.clone());
        let notifier = FonnteNotifier::new(config.relay.clone(), client);
        Self::new(Arc::new(sheet), Arc::new(notifier), config.sheet.clone())
    }

    /// Run the pipeline once. `now` stamps the message header.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<JobOutcome> {
        let span = info_span!("reminder_run", run_id = %Uuid::new_v4());
        self.run_inner(now).instrument(span).await
    }

    async fn run_inner(&self, now: DateTime<Utc>) -> Result<JobOutcome> {
        let csv = self.sheet.fetch_csv().await?;
        let rows = parse_csv(&csv);
        let report = aggregate(&rows);

        info!(
            rows = report.rows_scanned,
            debtors = report.summary.len(),
            total = report.summary.grand_total(),
            "Ledger aggregated"
        );
        if report.rows_skipped > 0 || report.amounts_zeroed > 0 {
            warn!(
                skipped = report.rows_skipped,
                zeroed = report.amounts_zeroed,
                "Ledger contained malformed rows"
            );
        }

        if report.summary.is_empty() {
            info!("All debts settled, nothing to send");
            return Ok(JobOutcome::Settled { report });
        }

        let message = render_reminder(&report.summary, now, &self.location);
        let relay_response = self.notifier.send(&message).await?;

        Ok(JobOutcome::Notified {
            report,
            relay_response,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::error::{Error, NotifyError, SheetError};

    /// Sheet stub serving fixed text or a fixed failure status.
    pub(crate) struct StubSheet {
        pub body: std::result::Result<String, u16>,
        pub calls: AtomicUsize,
    }

    impl StubSheet {
        pub(crate) fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                body: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SheetSource for StubSheet {
        async fn fetch_csv(&self) -> std::result::Result<String, SheetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(SheetError::BadStatus { status: *status }),
            }
        }
    }

    /// Notifier stub that records every message.
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub sent: Mutex<Vec<String>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &str) -> std::result::Result<serde_json::Value, NotifyError> {
            if self.fail {
                return Err(NotifyError::Request("connection refused".into()));
            }
            self.sent.lock().unwrap().push(message.to_string());
            Ok(serde_json::json!({"status": true, "detail": "success! message in queue"}))
        }
    }

    pub(crate) const LEDGER: &str = "tgl,item,nama,x,nominal,y,status\n\
        _,_,\"Budi\",_,\"Rp 150.000\",_,\"BELUM LUNAS\"\n\
        _,_,\"Budi\",_,\"50000\",_,\"Belum Bayar\"\n\
        _,_,\"Ani\",_,\"75000\",_,\"LUNAS\"\n";

    fn location() -> SheetLocation {
        SheetLocation::new("https://docs.google.com", "sheet-123", "42")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn unpaid_debts_are_sent() {
        let notifier = Arc::new(RecordingNotifier::default());
        let job = ReminderJob::new(Arc::new(StubSheet::ok(LEDGER)), notifier.clone(), location());

        let outcome = job.run(now()).await.unwrap();
        match outcome {
            JobOutcome::Notified {
                report,
                relay_response,
            } => {
                assert_eq!(report.summary.get("Budi"), Some(200_000));
                assert_eq!(report.summary.len(), 1);
                assert_eq!(relay_response["status"], true);
            }
            other => panic!("expected Notified, got {:?}", other),
        }

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("1. *Budi*"));
        assert!(sent[0].contains("Rp 200.000"));
        assert!(!sent[0].contains("Ani"));
    }

    #[tokio::test]
    async fn settled_ledger_sends_nothing() {
        let notifier = Arc::new(RecordingNotifier::default());
        let csv = "h\n_,_,Ani,_,1000,_,LUNAS\n";
        let job = ReminderJob::new(Arc::new(StubSheet::ok(csv)), notifier.clone(), location());

        let outcome = job.run(now()).await.unwrap();
        assert!(matches!(outcome, JobOutcome::Settled { .. }));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_stops_before_send() {
        let notifier = Arc::new(RecordingNotifier::default());
        let job = ReminderJob::new(Arc::new(StubSheet::failing(403)), notifier.clone(), location());

        let err = job.run(now()).await.unwrap_err();
        assert!(matches!(err, Error::Sheet(SheetError::BadStatus { status: 403 })));
        assert_eq!(err.to_string(), "Gagal ambil data Sheet");
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn relay_failure_is_propagated() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let job = ReminderJob::new(Arc::new(StubSheet::ok(LEDGER)), notifier, location());

        let err = job.run(now()).await.unwrap_err();
        assert!(matches!(err, Error::Notify(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn malformed_rows_are_reported_not_fatal() {
        let notifier = Arc::new(RecordingNotifier::default());
        let csv = "h\nshort,row\n_,_,Budi,_,abc,_,BELUM\n_,_,Budi,_,500,_,BELUM";
        let job = ReminderJob::new(Arc::new(StubSheet::ok(csv)), notifier, location());

        match job.run(now()).await.unwrap() {
            JobOutcome::Notified { report, .. } => {
                assert_eq!(report.rows_skipped, 1);
                assert_eq!(report.amounts_zeroed, 1);
                assert_eq!(report.summary.get("Budi"), Some(500));
            }
            other => panic!("expected Notified, got {:?}", other),
        }
    }
}
