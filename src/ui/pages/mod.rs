pub mod audit;
pub mod calculator;
pub mod settings;

pub use audit::AuditPage;
pub use calculator::CalculatorPage;
pub use settings::SettingsPage;
