//! Spreadsheet access: where the ledger lives and how to download it.

pub mod csv;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SheetError;

pub use csv::parse_csv;

/// Identifies one tab of one spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    /// Spreadsheet host, without a trailing slash.
    pub base_url: String,
    pub sheet_id: String,
    /// Tab id (`gid`).
    pub gid: String,
}

impl SheetLocation {
    pub fn new(
        base_url: impl Into<String>,
        sheet_id: impl Into<String>,
        gid: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sheet_id: sheet_id.into(),
            gid: gid.into(),
        }
    }

    /// CSV export URL for this tab.
    pub fn export_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            self.base_url, self.sheet_id, self.gid
        )
    }

    /// Browser link to this tab, used in the reminder footer.
    pub fn edit_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/edit#gid={}",
            self.base_url, self.sheet_id, self.gid
        )
    }
}

/// Source of the raw ledger CSV.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Download the ledger as CSV text.
    async fn fetch_csv(&self) -> Result<String, SheetError>;
}

/// Downloads a tab through the public CSV export endpoint.
pub struct SheetFetcher {
    location: SheetLocation,
    client: reqwest::Client,
}

impl SheetFetcher {
    pub fn new(location: SheetLocation, client: reqwest::Client) -> Self {
        Self { location, client }
    }
}

#[async_trait]
impl SheetSource for SheetFetcher {
    async fn fetch_csv(&self) -> Result<String, SheetError> {
        let url = self.location.export_url();
        debug!(
            sheet_id = %self.location.sheet_id,
            gid = %self.location.gid,
            "Fetching sheet export"
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Sheet export returned non-success status");
            return Err(SheetError::BadStatus {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))
    }
}
