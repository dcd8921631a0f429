//! Debt Reminder — nightly "who still owes money" WhatsApp notifications
//! from a shared spreadsheet ledger.

pub mod config;
pub mod error;
pub mod job;
pub mod ledger;
pub mod message;
pub mod notifier;
pub mod scheduler;
pub mod server;
pub mod sheet;
