//! Class-name helpers so pages pick colours from state, not string literals.

use crate::domain::{AuditStatus, ProfitOutlookStatus};

// ============================================
// BUTTON STYLES
// ============================================

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn nav-btn-active"
    } else {
        "nav-btn"
    }
}

pub fn status_button(status: AuditStatus, current: AuditStatus) -> &'static str {
    match (status, status == current) {
        (AuditStatus::Passed, true) => "status-btn status-passed",
        (AuditStatus::Failed, true) => "status-btn status-failed",
        (AuditStatus::Pending, true) => "status-btn status-pending",
        (_, false) => "status-btn",
    }
}

// ============================================
// BADGES & INDICATORS
// ============================================

pub fn status_badge(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Passed => "badge badge-passed",
        AuditStatus::Failed => "badge badge-failed",
        AuditStatus::Pending => "badge badge-pending",
    }
}

pub fn status_icon(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Passed => "✅",
        AuditStatus::Failed => "⛔",
        AuditStatus::Pending => "🕒",
    }
}

pub fn outlook(status: ProfitOutlookStatus) -> (&'static str, &'static str) {
    match status {
        ProfitOutlookStatus::Profitable => ("Profitable", "indicator indicator-good"),
        ProfitOutlookStatus::Marginal => ("Marginal", "indicator indicator-watch"),
        ProfitOutlookStatus::Unprofitable => ("Unprofitable", "indicator indicator-bad"),
    }
}

pub fn signed_amount(value: f64) -> &'static str {
    if value < 0.0 {
        "amount-negative"
    } else {
        "amount-positive"
    }
}
