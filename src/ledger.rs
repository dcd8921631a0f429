//! Debt aggregation over parsed ledger rows.
//!
//! Column layout of the ledger tab (zero-based):
//! - 2: debtor name
//! - 4: amount, digits mixed with formatting (`Rp 150.000`)
//! - 6: payment status; anything containing `BELUM` is unpaid
//!
//! Malformed input is tolerated as policy: short rows are skipped and amounts
//! without usable digits count as zero. Both are counted in the report.

use std::collections::HashMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Column holding the debtor name.
pub const NAME_COLUMN: usize = 2;
/// Column holding the amount.
pub const AMOUNT_COLUMN: usize = 4;
/// Column holding the payment status.
pub const STATUS_COLUMN: usize = 6;
/// Rows shorter than this are skipped.
pub const MIN_ROW_LEN: usize = STATUS_COLUMN + 1;
/// Case-insensitive marker for an unpaid row.
pub const UNPAID_MARKER: &str = "BELUM";

/// Outstanding total per debtor, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtSummary {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl DebtSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `name`, creating the entry on first sight.
    pub fn add(&mut self, name: &str, amount: u64) {
        match self.index.get(name) {
            Some(&pos) => {
                let total = &mut self.entries[pos].1;
                *total = total.saturating_add(amount);
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), amount));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&pos| self.entries[pos].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Debtors and totals in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Sum over all debtors.
    pub fn grand_total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, total)| acc.saturating_add(*total))
    }
}

/// Serializes as a JSON object whose keys keep first-seen order.
impl Serialize for DebtSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, total) in &self.entries {
            map.serialize_entry(name, total)?;
        }
        map.end()
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub summary: DebtSummary,
    /// Data rows looked at (header excluded).
    pub rows_scanned: usize,
    /// Rows skipped for having too few cells.
    pub rows_skipped: usize,
    /// Unpaid rows whose amount had no parseable digits.
    pub amounts_zeroed: usize,
}

/// Sum unpaid amounts per debtor. Row 0 is the header and is ignored.
pub fn aggregate(rows: &[Vec<String>]) -> AggregateReport {
    let mut report = AggregateReport::default();

    for row in rows.iter().skip(1) {
        report.rows_scanned += 1;
        if row.len() < MIN_ROW_LEN {
            report.rows_skipped += 1;
            continue;
        }

        if !is_unpaid(&row[STATUS_COLUMN]) {
            continue;
        }

        let amount = match parse_amount(&row[AMOUNT_COLUMN]) {
            Some(amount) => amount,
            None => {
                report.amounts_zeroed += 1;
                0
            }
        };
        report.summary.add(&row[NAME_COLUMN], amount);
    }

    report
}

/// True when the status contains the unpaid marker, ignoring case.
pub fn is_unpaid(status: &str) -> bool {
    status.to_uppercase().contains(UNPAID_MARKER)
}

/// Keep only ASCII digits and parse them as a whole number.
///
/// Returns `None` when no digits remain or the value does not fit in `u64`.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
