use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{AppState, CalculatorDraft, CalculatorError, NetworkParams},
    infra::price_feed::{PriceFeedClient, PRICE_URL_ENV},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        pages::calculator::humanize_age,
    },
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<Option<PriceFeedClient>>();

    let initial = state.with(|st| st.network.clone());
    let mut reward_input = use_signal(|| initial.block_reward_btc.to_string());

    let quote_age = state.with(|st| st.quote_fetched_at()).map(humanize_age);

    let on_apply = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| match parse_network(&reward_input()) {
            Ok(network) => {
                state.with_mut(|st| st.network = network);
                persist_user_state(&state);
                push_toast(toasts.clone(), ToastKind::Success, "Updated network parameters.");
            }
            Err(err) => push_toast(toasts.clone(), ToastKind::Error, err.to_string()),
        }
    };

    let on_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let defaults = NetworkParams::default();
            reward_input.set(defaults.block_reward_btc.to_string());
            state.with_mut(|st| {
                st.network = defaults;
                st.calculator = CalculatorDraft::default();
            });
            persist_user_state(&state);
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Restored default calculator and network settings.",
            );
        }
    };

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let client = client.clone();
        move |_| {
            let client = client.clone();
            state.with_mut(|st| st.market = None);
            spawn(async move {
                if let Some(client) = client {
                    client.clear_cache().await;
                }
                push_toast(
                    toasts,
                    ToastKind::Info,
                    "Cleared cached BTC price. It will refresh on the next poll.",
                );
            });
        }
    };

    rsx! {
        div { class: "stack",
            section {
                class: "panel",
                h2 { class: "panel-title", "Network Parameters" }
                div { class: "grid",
                    div { class: "field",
                        label { "Block reward (BTC)" }
                        input {
                            value: reward_input(),
                            inputmode: "decimal",
                            oninput: move |evt| reward_input.set(evt.value()),
                        }
                    }
                }
                p { class: "muted", "Update after each halving." }
                div { class: "row", style: "justify-content: flex-start; margin-top: 1rem",
                    button { class: "btn btn-primary", onclick: on_apply, "Apply" }
                    button { class: "btn", onclick: on_reset, "Reset Defaults" }
                }
            }

            section {
                class: "panel",
                h2 { class: "panel-title", "Price Cache" }
                match quote_age {
                    Some(age) => rsx! { p { class: "muted", "Last BTC quote fetched {age}." } },
                    None => rsx! { p { class: "muted", "No BTC quote cached." } },
                }
                if client.is_none() {
                    p { class: "field-error", "Price feed unavailable. Check {PRICE_URL_ENV}." }
                }
                button { class: "btn", style: "margin-top: 1rem", onclick: on_clear_cache, "Clear Cache" }
            }

            section {
                class: "panel",
                h2 { class: "panel-title", "Data Attribution" }
                p {
                    class: "muted",
                    "BTC prices provided by "
                    a { href: "https://www.coingecko.com", target: "_blank", rel: "noreferrer", "CoinGecko" }
                    "."
                }
            }
        }
    }
}

fn parse_network(block_reward: &str) -> Result<NetworkParams, CalculatorError> {
    let block_reward_btc = block_reward.trim().parse::<f64>().unwrap_or(f64::NAN);
    let network = NetworkParams { block_reward_btc };
    network.validate()?;
    Ok(network)
}
