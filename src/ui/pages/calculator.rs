use std::time::{Duration, SystemTime};

use dioxus::prelude::*;

use crate::{
    app::{feed_notice, persist_user_state, refresh_quote, PRICE_POLL_INTERVAL},
    domain::{
        break_even_electricity_cost, profit_outlook, AppState, BtcQuote, CalculatorDraft,
        CalculatorError, CalculatorInputs, InputField,
    },
    infra::price_feed::PriceFeedClient,
    ui::{
        components::{
            kpi_card::KpiCard,
            number_field::NumberField,
            profit_indicator::ProfitIndicator,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn CalculatorPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<Option<PriceFeedClient>>();
    let saves = use_signal(DraftSaves::default);
    use_drop(move || persist_user_state(&state));

    let draft = state.with(|st| st.calculator.clone());
    let network = state.with(|st| st.network.clone());
    let result = state.with(|st| st.profitability());
    let market_line = state.with(|st| {
        describe_quote(
            st.market.as_ref(),
            st.quote_fetched_at().map(humanize_age),
            st.is_quote_stale(PRICE_POLL_INTERVAL * 2),
        )
    });

    let error_for = |field: InputField| field_error(&result, field);
    let hashrate_error = error_for(InputField::Hashrate);
    let power_error = error_for(InputField::PowerConsumption);
    let cost_error = error_for(InputField::ElectricityCost);
    let price_error = error_for(InputField::BitcoinPrice);
    let difficulty_error = error_for(InputField::NetworkDifficulty);
    let reward_error = error_for(InputField::BlockReward);

    let break_even = CalculatorInputs::parse(&draft)
        .ok()
        .filter(|_| network.validate().is_ok())
        .and_then(|inputs| break_even_electricity_cost(&inputs, &network).ok());

    let on_use_live_price = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            if state.with_mut(|st| st.apply_market_price()) {
                persist_user_state(&state);
                push_toast(toasts.clone(), ToastKind::Info, "Using the live BTC price.");
            } else {
                push_toast(toasts.clone(), ToastKind::Warning, "No BTC price loaded yet.");
            }
        }
    };

    let on_refresh = {
        let state = state.clone();
        let toasts = toasts.clone();
        let client = client.clone();
        move |_| {
            let client = client.clone();
            spawn(async move {
                let health = refresh_quote(state, client).await;
                match feed_notice(None, &health) {
                    Some((kind, message)) => push_toast(toasts, kind, message),
                    None => push_toast(toasts, ToastKind::Success, "BTC price refreshed."),
                }
            });
        }
    };

    rsx! {
        div { class: "stack",
            section {
                class: "panel",
                h2 { class: "panel-title", "Mining Hardware" }
                div { class: "grid",
                    NumberField {
                        label: "Hashrate (TH/s)".to_string(),
                        value: draft.hashrate.clone(),
                        oninput: move |value: String| update_draft(state, saves, |d| d.hashrate = value),
                        error: hashrate_error,
                    }
                    NumberField {
                        label: "Power consumption (W)".to_string(),
                        value: draft.power.clone(),
                        oninput: move |value: String| update_draft(state, saves, |d| d.power = value),
                        error: power_error,
                    }
                    NumberField {
                        label: "Electricity cost (USD/kWh)".to_string(),
                        value: draft.electricity_cost.clone(),
                        oninput: move |value: String| update_draft(state, saves, |d| d.electricity_cost = value),
                        error: cost_error,
                    }
                }
            }

            section {
                class: "panel",
                div { class: "row",
                    h2 { class: "panel-title", "Market" }
                    div { class: "row",
                        button { class: "btn", onclick: on_refresh, "Refresh" }
                        button { class: "btn btn-primary", onclick: on_use_live_price, "Use live price" }
                    }
                }
                div { class: "grid",
                    NumberField {
                        label: "Bitcoin price (USD)".to_string(),
                        value: draft.bitcoin_price.clone(),
                        oninput: move |value: String| update_draft(state, saves, |d| d.bitcoin_price = value),
                        error: price_error,
                    }
                    NumberField {
                        label: "Network difficulty".to_string(),
                        value: draft.difficulty.clone(),
                        oninput: move |value: String| update_draft(state, saves, |d| d.difficulty = value),
                        error: difficulty_error,
                    }
                }
                p { class: "muted", "{market_line}" }
                if let Some(message) = reward_error {
                    p { class: "field-error", "{message}. Adjust it under Settings." }
                }
            }

            match result {
                Ok(snapshot) => {
                    let outlook = profit_outlook(&snapshot);
                    rsx! {
                        section { class: "grid",
                            KpiCard {
                                title: "Daily BTC".to_string(),
                                value: format!("{:.8}", snapshot.daily_coins_mined),
                                description: Some(format!("Block reward {} BTC", network.block_reward_btc)),
                            }
                            KpiCard {
                                title: "Daily Revenue".to_string(),
                                value: format_usd(snapshot.daily_revenue_usd),
                            }
                            KpiCard {
                                title: "Daily Power Cost".to_string(),
                                value: format_usd(snapshot.daily_power_cost_usd),
                                description: break_even.map(|cost| format!("Break-even at {cost:.4} USD/kWh")),
                            }
                            KpiCard {
                                title: "Daily Profit".to_string(),
                                value: format_usd(snapshot.daily_profit_usd),
                                value_class: Some(theme::signed_amount(snapshot.daily_profit_usd).to_string()),
                            }
                            KpiCard {
                                title: "Monthly Profit".to_string(),
                                value: format_usd(snapshot.monthly_profit_usd),
                                description: Some("30 days".to_string()),
                                value_class: Some(theme::signed_amount(snapshot.monthly_profit_usd).to_string()),
                            }
                            KpiCard {
                                title: "Yearly Profit".to_string(),
                                value: format_usd(snapshot.yearly_profit_usd),
                                description: Some("365 days".to_string()),
                                value_class: Some(theme::signed_amount(snapshot.yearly_profit_usd).to_string()),
                            }
                        }
                        ProfitIndicator { outlook, daily_profit_usd: snapshot.daily_profit_usd }
                    }
                }
                Err(_) => rsx! {
                    section { class: "panel",
                        p { class: "muted", "Fix the highlighted fields to see projected earnings." }
                    }
                },
            }
        }
    }
}

/// Quiet period after the last keystroke before the draft is written to disk.
const DRAFT_SAVE_DELAY: Duration = Duration::from_millis(750);

/// Hands out save tickets; only the newest ticket gets to write.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DraftSaves {
    latest: u64,
}

impl DraftSaves {
    fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest == ticket
    }
}

fn update_draft(
    mut state: Signal<AppState>,
    mut saves: Signal<DraftSaves>,
    edit: impl FnOnce(&mut CalculatorDraft),
) {
    state.with_mut(|st| edit(&mut st.calculator));
    let ticket = saves.with_mut(DraftSaves::issue);
    spawn(async move {
        tokio::time::sleep(DRAFT_SAVE_DELAY).await;
        if saves.with(|s| s.is_current(ticket)) {
            persist_user_state(&state);
        }
    });
}

fn field_error<T>(result: &Result<T, CalculatorError>, field: InputField) -> Option<String> {
    match result {
        Err(err) if err.field() == field => Some(err.to_string()),
        _ => None,
    }
}

fn describe_quote(quote: Option<&BtcQuote>, age: Option<String>, stale: bool) -> String {
    let Some(quote) = quote else {
        return "Live BTC price not loaded yet.".to_string();
    };
    let mut line = format!("Live: {:.2} USD", quote.usd);
    if let Some(change) = quote.usd_24h_change {
        line.push_str(&format!(" ({change:+.2}% 24h)"));
    }
    if let Some(age) = age {
        line.push_str(&format!(", updated {age}"));
    }
    if stale {
        line.push_str(" (stale)");
    }
    line
}

fn format_usd(value: f64) -> String {
    format!("${value:.2}")
}

pub fn humanize_age(updated_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(updated_at)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}
