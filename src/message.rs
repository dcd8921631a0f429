//! Reminder text rendering.
//!
//! Output is WhatsApp-flavoured markdown (`*bold*`, `_italic_`) in
//! Indonesian. Dates and times are always shown in Jakarta civil time.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Asia::Jakarta;

use crate::ledger::DebtSummary;
use crate::sheet::SheetLocation;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Zone abbreviation for `Asia/Jakarta`.
const ZONE_LABEL: &str = "WIB";

const WEEKDAYS: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Render the reminder for a non-empty summary.
pub fn render_reminder(
    summary: &DebtSummary,
    now: DateTime<Utc>,
    location: &SheetLocation,
) -> String {
    let mut message = String::new();
    message.push_str("🔔 *REMINDER TAGIHAN* 🔔\n");
    message.push_str(&format!("📅 {}\n", format_date(now)));
    message.push_str(&format!("⏰ Pukul {}\n", format_time(now)));
    message.push_str(DIVIDER);
    message.push_str("\n\n");
    message.push_str("Halo bestie! 👋 Berikut list yang statusnya masih *BELUM LUNAS*:\n\n");

    for (no, (name, total)) in summary.iter().enumerate() {
        message.push_str(&format!("{}. *{}*\n", no + 1, name));
        message.push_str(&format!("   💸 {}\n", format_rupiah(total)));
    }

    message.push_str(&format!(
        "\n💰 *Total Pending: {}*\n",
        format_rupiah(summary.grand_total())
    ));
    message.push_str(DIVIDER);
    message.push('\n');
    message.push_str("Mohon segera transfer ya! Cek detailnya di sini:\n");
    message.push_str(&format!("🔗 {}\n", location.edit_url()));
    message.push_str("\n_Automated Message by Moocuan Bot_ 🤖 created by Delvin");
    message
}

/// Long Indonesian date in Jakarta time, e.g. `Senin, 19 Oktober 2026`.
pub fn format_date(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&Jakarta);
    let weekday = WEEKDAYS[local.weekday().num_days_from_monday() as usize];
    let month = MONTHS[local.month0() as usize];
    format!("{}, {} {} {}", weekday, local.day(), month, local.year())
}

/// 24-hour Jakarta time with a colon separator, e.g. `07:05 WIB`.
pub fn format_time(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&Jakarta);
    format!("{:02}:{:02} {}", local.hour(), local.minute(), ZONE_LABEL)
}

/// Currency amount with `.` thousands grouping, e.g. `Rp 1.250.000`.
pub fn format_rupiah(amount: u64) -> String {
    format!("Rp {}", group_thousands(amount))
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
