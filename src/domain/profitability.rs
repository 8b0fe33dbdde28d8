//! Mining profitability: validated inputs in, daily/monthly/yearly figures out.

use std::fmt;

use thiserror::Error;

use super::entities::{CalculatorDraft, NetworkParams};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Expected hashes per unit of difficulty (2^32).
pub const DIFFICULTY_SCALE: f64 = 4_294_967_296.0;
const HASHES_PER_TERAHASH: f64 = 1e12;
const HOURS_PER_DAY: f64 = 24.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Below this share of revenue a positive profit is only marginal.
const MARGINAL_PROFIT_SHARE: f64 = 0.10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    Hashrate,
    PowerConsumption,
    ElectricityCost,
    BitcoinPrice,
    NetworkDifficulty,
    BlockReward,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Hashrate => "Hashrate",
            InputField::PowerConsumption => "Power consumption",
            InputField::ElectricityCost => "Electricity cost",
            InputField::BitcoinPrice => "Bitcoin price",
            InputField::NetworkDifficulty => "Network difficulty",
            InputField::BlockReward => "Block reward",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("{field} {reason}")]
    InvalidInput { field: InputField, reason: String },
}

impl CalculatorError {
    fn invalid(field: InputField, reason: impl Into<String>) -> Self {
        CalculatorError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> InputField {
        match self {
            CalculatorError::InvalidInput { field, .. } => *field,
        }
    }
}

/// Hardware and market parameters that passed validation.
///
/// Only constructible through [`Self::new`] or [`Self::parse`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalculatorInputs {
    hashrate_ths: f64,
    power_watts: f64,
    electricity_cost_kwh: f64,
    btc_price_usd: f64,
    network_difficulty: f64,
}

impl CalculatorInputs {
    pub fn new(
        hashrate_ths: f64,
        power_watts: f64,
        electricity_cost_kwh: f64,
        btc_price_usd: f64,
        network_difficulty: f64,
    ) -> Result<Self, CalculatorError> {
        Ok(Self {
            hashrate_ths: require_positive(InputField::Hashrate, hashrate_ths)?,
            power_watts: require_positive(InputField::PowerConsumption, power_watts)?,
            electricity_cost_kwh: require_non_negative(
                InputField::ElectricityCost,
                electricity_cost_kwh,
            )?,
            btc_price_usd: require_positive(InputField::BitcoinPrice, btc_price_usd)?,
            network_difficulty: require_positive(
                InputField::NetworkDifficulty,
                network_difficulty,
            )?,
        })
    }

    /// Parses the raw text fields and applies the same range checks as [`Self::new`].
    pub fn parse(draft: &CalculatorDraft) -> Result<Self, CalculatorError> {
        Self::new(
            parse_number(InputField::Hashrate, &draft.hashrate)?,
            parse_number(InputField::PowerConsumption, &draft.power)?,
            parse_number(InputField::ElectricityCost, &draft.electricity_cost)?,
            parse_number(InputField::BitcoinPrice, &draft.bitcoin_price)?,
            parse_number(InputField::NetworkDifficulty, &draft.difficulty)?,
        )
    }
}

impl CalculatorInputs {
    pub fn hashrate_ths(&self) -> f64 {
        self.hashrate_ths
    }

    pub fn power_watts(&self) -> f64 {
        self.power_watts
    }

    pub fn electricity_cost_kwh(&self) -> f64 {
        self.electricity_cost_kwh
    }

    pub fn btc_price_usd(&self) -> f64 {
        self.btc_price_usd
    }

    pub fn network_difficulty(&self) -> f64 {
        self.network_difficulty
    }

    /// Same rig and market at a different electricity price.
    pub fn with_electricity_cost(
        self,
        electricity_cost_kwh: f64,
    ) -> Result<Self, CalculatorError> {
        Ok(Self {
            electricity_cost_kwh: require_non_negative(
                InputField::ElectricityCost,
                electricity_cost_kwh,
            )?,
            ..self
        })
    }
}

impl NetworkParams {
    pub fn validate(&self) -> Result<(), CalculatorError> {
        require_positive(InputField::BlockReward, self.block_reward_btc).map(|_| ())
    }
}

fn parse_number(field: InputField, raw: &str) -> Result<f64, CalculatorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CalculatorError::invalid(field, "is required"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CalculatorError::invalid(field, format!("must be a number (got \"{trimmed}\")")))
}

fn require_finite(field: InputField, value: f64) -> Result<f64, CalculatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, "must be a finite number"))
    }
}

fn require_positive(field: InputField, value: f64) -> Result<f64, CalculatorError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, "must be greater than zero"))
    }
}

fn require_non_negative(field: InputField, value: f64) -> Result<f64, CalculatorError> {
    let value = require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, "must not be negative"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitabilitySnapshot {
    pub daily_coins_mined: f64,
    pub daily_revenue_usd: f64,
    pub daily_power_cost_usd: f64,
    pub daily_profit_usd: f64,
    pub monthly_profit_usd: f64,
    pub yearly_profit_usd: f64,
}

/// Expected yield under the proportional-share model.
///
/// Operation order is fixed; reordering changes the last bits of the result.
/// Inputs that are individually finite can still overflow the formula; those
/// are reported against the field that drove the overflow.
pub fn compute_profitability(
    inputs: &CalculatorInputs,
    network: &NetworkParams,
) -> Result<ProfitabilitySnapshot, CalculatorError> {
    let hashes_per_second = inputs.hashrate_ths * HASHES_PER_TERAHASH;
    let expected_hashes = hashes_per_second * SECONDS_PER_DAY * network.block_reward_btc;
    let difficulty_hashes = inputs.network_difficulty * DIFFICULTY_SCALE;
    let daily_coins_mined = expected_hashes / difficulty_hashes;
    if !daily_coins_mined.is_finite() {
        let field = if expected_hashes.is_finite() {
            InputField::NetworkDifficulty
        } else {
            InputField::Hashrate
        };
        return Err(overflow(field));
    }

    let daily_revenue_usd = require_computable(
        InputField::BitcoinPrice,
        daily_coins_mined * inputs.btc_price_usd,
    )?;
    let daily_power_cost_usd = require_computable(
        InputField::PowerConsumption,
        daily_power_cost(inputs.power_watts, inputs.electricity_cost_kwh),
    )?;
    let daily_profit_usd = daily_revenue_usd - daily_power_cost_usd;

    let dominant = if daily_revenue_usd >= daily_power_cost_usd {
        InputField::BitcoinPrice
    } else {
        InputField::PowerConsumption
    };
    let monthly_profit_usd = require_computable(dominant, daily_profit_usd * DAYS_PER_MONTH)?;
    let yearly_profit_usd = require_computable(dominant, daily_profit_usd * DAYS_PER_YEAR)?;

    Ok(ProfitabilitySnapshot {
        daily_coins_mined,
        daily_revenue_usd,
        daily_power_cost_usd,
        daily_profit_usd,
        monthly_profit_usd,
        yearly_profit_usd,
    })
}

fn overflow(field: InputField) -> CalculatorError {
    CalculatorError::invalid(field, "is too large to compute a result")
}

fn require_computable(field: InputField, value: f64) -> Result<f64, CalculatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(overflow(field))
    }
}

fn daily_power_cost(power_watts: f64, electricity_cost_kwh: f64) -> f64 {
    (power_watts * HOURS_PER_DAY * electricity_cost_kwh) / WATTS_PER_KILOWATT
}

/// Electricity price (USD/kWh) at which daily profit reaches zero.
pub fn break_even_electricity_cost(
    inputs: &CalculatorInputs,
    network: &NetworkParams,
) -> Result<f64, CalculatorError> {
    let revenue = compute_profitability(inputs, network)?.daily_revenue_usd;
    let daily_kwh = require_computable(
        InputField::PowerConsumption,
        inputs.power_watts * HOURS_PER_DAY / WATTS_PER_KILOWATT,
    )?;
    Ok(revenue / daily_kwh)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfitOutlookStatus {
    Profitable,
    Marginal,
    Unprofitable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitOutlook {
    pub status: ProfitOutlookStatus,
    pub rationale: String,
}

pub fn profit_outlook(snapshot: &ProfitabilitySnapshot) -> ProfitOutlook {
    let status = if snapshot.daily_profit_usd < 0.0 {
        ProfitOutlookStatus::Unprofitable
    } else if snapshot.daily_profit_usd < snapshot.daily_revenue_usd * MARGINAL_PROFIT_SHARE {
        ProfitOutlookStatus::Marginal
    } else {
        ProfitOutlookStatus::Profitable
    };

    let rationale = format!(
        "Revenue {:.2} - power {:.2} = {:.2} USD/day",
        snapshot.daily_revenue_usd, snapshot.daily_power_cost_usd, snapshot.daily_profit_usd
    );

    ProfitOutlook { status, rationale }
}
