use dioxus::prelude::*;

use crate::domain::ProfitOutlook;
use crate::ui::theme;

#[component]
pub fn ProfitIndicator(outlook: ProfitOutlook, daily_profit_usd: f64) -> Element {
    let (label, class) = theme::outlook(outlook.status);
    let profit_display = format!("{daily_profit_usd:.2} USD/day");

    rsx! {
        div {
            class: "{class}",
            div {
                class: "row",
                span { class: "panel-title", "Profitability" }
                span { class: "panel-title", "{label}" }
            }
            p { class: "kpi-value", "{profit_display}" }
            p { class: "muted", "{outlook.rationale}" }
        }
    }
}
