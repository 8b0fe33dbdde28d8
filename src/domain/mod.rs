//! Profitability maths and the audit checklist live here.

pub mod app_state;
pub mod audit;
pub mod checklist_template;
pub mod entities;
pub mod profitability;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState};
#[allow(unused_imports)]
pub use audit::{
    failed_items_missing_notes, AuditCategory, AuditError, AuditItem, AuditReport, AuditTracker,
    CategorySummary, Progress, ReportCategory, ReportItem, StatusCounts,
};
#[allow(unused_imports)]
pub use entities::{AuditStatus, BtcQuote, CalculatorDraft, NetworkParams};
#[allow(unused_imports)]
pub use profitability::{
    break_even_electricity_cost, compute_profitability, profit_outlook, CalculatorError,
    CalculatorInputs, InputField, ProfitOutlook, ProfitOutlookStatus, ProfitabilitySnapshot,
};
