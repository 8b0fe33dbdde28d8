use std::{fmt, time::SystemTime};

use serde::{Deserialize, Serialize};

/// Block reward for the current halving epoch.
pub const DEFAULT_BLOCK_REWARD_BTC: f64 = 6.25;

/// Network constants that drift as the chain evolves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub block_reward_btc: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            block_reward_btc: DEFAULT_BLOCK_REWARD_BTC,
        }
    }
}

/// Calculator fields exactly as the user typed them.
///
/// Kept as text so a half-typed value survives a restart; parsing happens
/// at the validation boundary in [`super::profitability::CalculatorInputs`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDraft {
    pub hashrate: String,
    pub power: String,
    pub electricity_cost: String,
    pub bitcoin_price: String,
    pub difficulty: String,
}

impl Default for CalculatorDraft {
    fn default() -> Self {
        Self {
            hashrate: "100".to_string(),
            power: "3000".to_string(),
            electricity_cost: "0.10".to_string(),
            bitcoin_price: "45000".to_string(),
            difficulty: "72057594037927940".to_string(),
        }
    }
}

/// Spot quote for BTC in USD.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BtcQuote {
    pub usd: f64,
    pub usd_24h_change: Option<f64>,
    pub fetched_at: SystemTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl AuditStatus {
    pub const ALL: [AuditStatus; 3] = [
        AuditStatus::Passed,
        AuditStatus::Failed,
        AuditStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Passed => "passed",
            AuditStatus::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditStatus::Pending => "Pending",
            AuditStatus::Passed => "Passed",
            AuditStatus::Failed => "Failed",
        }
    }

    /// Passed and failed both count as reviewed.
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, AuditStatus::Pending)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
