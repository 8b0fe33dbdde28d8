use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use super::audit::AuditTracker;
use super::entities::{BtcQuote, CalculatorDraft, NetworkParams};
use super::profitability::{
    compute_profitability, CalculatorError, CalculatorInputs, ProfitabilitySnapshot,
};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub calculator: CalculatorDraft,
    pub network: NetworkParams,
    /// Session-scoped; never written to disk.
    pub audit: AuditTracker,
    pub market: Option<BtcQuote>,
}

impl AppState {
    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.calculator = persisted.calculator;
        self.network = persisted.network;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            calculator: self.calculator.clone(),
            network: self.network.clone(),
        }
    }

    /// Validates the current draft and network constants, then runs the calculator.
    pub fn profitability(&self) -> Result<ProfitabilitySnapshot, CalculatorError> {
        self.network.validate()?;
        let inputs = CalculatorInputs::parse(&self.calculator)?;
        compute_profitability(&inputs, &self.network)
    }

    pub fn record_quote(&mut self, quote: BtcQuote) {
        self.market = Some(quote);
    }

    /// Copies the latest market price into the calculator. Returns false when no quote is known.
    pub fn apply_market_price(&mut self) -> bool {
        match &self.market {
            Some(quote) => {
                self.calculator.bitcoin_price = format!("{:.2}", quote.usd);
                true
            }
            None => false,
        }
    }

    pub fn is_quote_stale(&self, ttl: Duration) -> bool {
        self.market
            .as_ref()
            .map(|quote| {
                quote
                    .fetched_at
                    .elapsed()
                    .map(|elapsed| elapsed > ttl)
                    .unwrap_or(true)
            })
            .unwrap_or(true)
    }

    pub fn quote_fetched_at(&self) -> Option<SystemTime> {
        self.market.as_ref().map(|quote| quote.fetched_at)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub calculator: CalculatorDraft,
    #[serde(default)]
    pub network: NetworkParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AuditStatus;
    use crate::domain::profitability::InputField;

    #[test]
    fn persisted_round_trip_leaves_audit_alone() {
        let mut state = AppState::default();
        state.calculator.hashrate = "140".to_string();
        state.network.block_reward_btc = 3.125;
        state
            .audit
            .set_item_status("backup", AuditStatus::Passed)
            .unwrap();

        let persisted = state.to_persisted();
        let mut restored = AppState::default();
        restored.apply_persisted(persisted.clone());

        assert_eq!(restored.calculator.hashrate, "140");
        assert_eq!(restored.network.block_reward_btc, 3.125);
        assert_eq!(restored.audit.compute_progress().completed, 0);
        assert_eq!(restored.to_persisted(), persisted);
    }

    #[test]
    fn persisted_state_tolerates_missing_sections() {
        let persisted: PersistedState = serde_json::from_str("{}").unwrap();
        assert_eq!(persisted, PersistedState::default());

        let persisted: PersistedState =
            serde_json::from_str(r#"{"network":{"block_reward_btc":3.125}}"#).unwrap();
        assert_eq!(persisted.network.block_reward_btc, 3.125);
        assert_eq!(persisted.calculator, CalculatorDraft::default());
    }

    #[test]
    fn profitability_surfaces_validation_errors() {
        let mut state = AppState::default();
        assert!(state.profitability().unwrap().daily_profit_usd < 0.0);

        state.calculator.electricity_cost = "-1".to_string();
        let err = state.profitability().unwrap_err();
        assert_eq!(err.field(), InputField::ElectricityCost);

        state.calculator = CalculatorDraft::default();
        state.network.block_reward_btc = f64::NAN;
        assert_eq!(
            state.profitability().unwrap_err().field(),
            InputField::BlockReward
        );
    }

    #[test]
    fn oversized_draft_reports_an_error_not_nan() {
        let mut state = AppState::default();
        state.calculator.hashrate = "1e300".to_string();
        state.calculator.difficulty = "1e300".to_string();

        let err = state.profitability().unwrap_err();
        assert_eq!(err.field(), InputField::Hashrate);
    }

    #[test]
    fn market_price_feeds_the_calculator() {
        let mut state = AppState::default();
        assert!(!state.apply_market_price());
        assert!(state.is_quote_stale(Duration::from_secs(60)));

        state.record_quote(BtcQuote {
            usd: 67_012.456,
            usd_24h_change: Some(-1.2),
            fetched_at: SystemTime::now(),
        });
        assert!(state.apply_market_price());
        assert_eq!(state.calculator.bitcoin_price, "67012.46");
        assert!(!state.is_quote_stale(Duration::from_secs(60)));
    }
}
