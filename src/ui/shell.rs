use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let ticker = state.with(|st| {
        st.market.as_ref().map(|quote| match quote.usd_24h_change {
            Some(change) => format!("BTC {:.0} USD ({change:+.2}%)", quote.usd),
            None => format!("BTC {:.0} USD", quote.usd),
        })
    });

    rsx! {
        div {
            header {
                class: "app-header",
                div {
                    h1 { class: "app-title", "⛏️ {APP_NAME}" }
                    if let Some(ticker) = ticker {
                        p { class: "muted", "{ticker}" }
                    }
                }
                nav { class: "row",
                    NavButton { active: matches!(current_route, Route::Calculator {}), onclick: move |_| { nav.push(Route::Calculator {}); }, label: "🧮 Calculator" }
                    NavButton { active: matches!(current_route, Route::Audit {}), onclick: move |_| { nav.push(Route::Audit {}); }, label: "📋 Audit" }
                    NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "⚙️" }
                }
            }
            main { class: "app-main",
                {children}
            }
            footer { class: "app-footer", "{APP_NAME} {version_label()}" }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: theme::nav_button(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
