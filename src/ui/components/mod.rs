pub mod audit_progress;
pub mod checklist;
pub mod kpi_card;
pub mod number_field;
pub mod profit_indicator;
pub mod toast;
