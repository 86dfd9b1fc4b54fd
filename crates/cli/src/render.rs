//! Text rendering for command output.

use std::fmt::Write;

use willwatch_ledger::Address;
use willwatch_sync::{
    format_amount, format_amount_rounded, RegistrySnapshot, StatusView, TimeRemaining, WillView,
};

const BALANCE_DP: u32 = 4;

/// Render a snapshot as a summary followed by one line per will.
///
/// The listing is a read-only view, so wills past their timeout show as
/// "Expired"; the caller's own will shows its actionable status.
pub(crate) fn snapshot_text(snapshot: &RegistrySnapshot, caller: Option<&Address>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Observed at {}", snapshot.observed_at);
    let _ = writeln!(
        out,
        "Wills: {} ({} live), {} skipped",
        snapshot.all_records.len(),
        snapshot.live_count(),
        snapshot.skipped.len()
    );
    let _ = writeln!(
        out,
        "Aggregate balance: {} ETH",
        format_amount(snapshot.aggregate_balance)
    );
    let _ = writeln!(
        out,
        "Created: {} wills, {} ETH at creation",
        snapshot.total_created_count,
        format_amount(snapshot.created_value)
    );

    if !snapshot.all_records.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<15}  {:<16}  {:>12}  {}",
            "OWNER", "STATUS", "BALANCE", "REMAINING"
        );
        for view in snapshot.records() {
            let _ = writeln!(
                out,
                "{:<15}  {:<16}  {:>12}  {}",
                view.record.owner.short(),
                view.status.presented(StatusView::ReadOnly).label(),
                format_amount_rounded(view.record.balance, BALANCE_DP),
                remaining(view, snapshot.observed_at)
            );
        }
    }

    if !snapshot.skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped:");
        for skipped in &snapshot.skipped {
            let _ = writeln!(out, "  {}  {}", skipped.owner.short(), skipped.reason);
        }
    }

    if let Some(caller) = caller {
        let _ = writeln!(out);
        match &snapshot.own_record {
            Some(view) => {
                let _ = writeln!(
                    out,
                    "Your will ({}): {}, {} ETH, {}",
                    caller.short(),
                    view.status,
                    format_amount(view.record.balance),
                    remaining(view, snapshot.observed_at)
                );
            }
            None => {
                let _ = writeln!(out, "Your will ({}): none", caller.short());
            }
        }
    }
    out
}

/// Render one will in detail.
pub(crate) fn will_text(view: &WillView, now: u64) -> String {
    let record = &view.record;
    let mut out = String::new();
    let _ = writeln!(out, "Owner:      {}", record.owner);
    let _ = writeln!(out, "Status:     {}", view.status);
    let _ = writeln!(out, "Balance:    {} ETH", format_amount(record.balance));
    let _ = writeln!(out, "Last ping:  {}", record.last_liveness);
    let _ = writeln!(out, "Timeout:    {}s", record.inactivity_timeout);
    let _ = writeln!(out, "Expires at: {}", record.expiry());
    let _ = writeln!(out, "Remaining:  {}", remaining(view, now));
    if record.created_at > 0 {
        let _ = writeln!(out, "Created at: {}", record.created_at);
    }
    if !record.beneficiaries.is_empty() {
        let _ = writeln!(out, "Beneficiaries:");
        for (beneficiary, share) in record.shares() {
            let _ = writeln!(out, "  {}  {} ETH", beneficiary, format_amount(share));
        }
    }
    out
}

/// Countdown for live wills, "-" for terminal or empty ones.
fn remaining(view: &WillView, now: u64) -> String {
    if view.status.is_live() {
        TimeRemaining::until_expiry(&view.record, now).to_string()
    } else {
        "-".to_string()
    }
}
