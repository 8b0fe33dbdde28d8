use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};
use tracing::{info, warn};

use crate::{
    domain::AppState,
    infra::price_feed::{CacheStatus, PriceFeedClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{AuditPage, CalculatorPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// How often the market price is re-polled.
pub const PRICE_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/calculator")]
    Calculator {},
    #[route("/audit")]
    Audit {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    let client = use_hook(|| match PriceFeedClient::new() {
        Ok(client) => Some(client),
        Err(err) => {
            warn!("price feed unavailable: {err}");
            None
        }
    });

    use_hook({
        let mut state = state;
        let client = client.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                info!("restored saved calculator settings");
                state.with_mut(|st| st.apply_persisted(saved));
            }
            if let Some(cached) = client.as_ref().and_then(|c| c.disk_quote()) {
                state.with_mut(|st| st.record_quote(cached.data));
            }
        }
    });
    use_context_provider(|| state);
    use_context_provider(|| client.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let _price_poll = use_future({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move {
                let mut last_health: Option<FeedHealth> = None;
                loop {
                    let health = refresh_quote(state, client.clone()).await;
                    if let Some((kind, message)) = feed_notice(last_health.as_ref(), &health) {
                        push_toast(toasts, kind, message);
                    }
                    last_health = Some(health);
                    tokio::time::sleep(PRICE_POLL_INTERVAL).await;
                }
            }
        }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!("failed to persist user state: {err}");
    }
}

/// Outcome of one price refresh, as far as the user is concerned.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedHealth {
    Live,
    Stale,
    Down(String),
}

impl FeedHealth {
    fn same_kind(&self, other: &FeedHealth) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Toast to show for `current`, or `None` when nothing changed since `previous`.
///
/// Pass `previous = None` for a user-triggered refresh so problems are always reported.
pub fn feed_notice(
    previous: Option<&FeedHealth>,
    current: &FeedHealth,
) -> Option<(ToastKind, String)> {
    if previous.is_some_and(|prev| prev.same_kind(current)) {
        return None;
    }
    match current {
        FeedHealth::Stale => Some((
            ToastKind::Warning,
            "Price feed unreachable; showing the last known BTC price.".to_string(),
        )),
        FeedHealth::Down(reason) => Some((ToastKind::Error, reason.clone())),
        FeedHealth::Live if previous.is_some() => {
            Some((ToastKind::Success, "Price feed reconnected.".to_string()))
        }
        FeedHealth::Live => None,
    }
}

/// Pulls a quote from the feed into shared state.
pub async fn refresh_quote(
    mut state: Signal<AppState>,
    client: Option<PriceFeedClient>,
) -> FeedHealth {
    let Some(client) = client else {
        return FeedHealth::Down("Price feed is not configured.".to_string());
    };

    match client.get_btc_quote().await {
        Ok(payload) => {
            let health = match payload.status {
                CacheStatus::Stale => FeedHealth::Stale,
                CacheStatus::Fresh | CacheStatus::Cached => FeedHealth::Live,
            };
            state.with_mut(|st| st.record_quote(payload.data));
            health
        }
        Err(err) => {
            warn!("failed to load BTC price: {err}");
            FeedHealth::Down(format!("Failed to load BTC price: {err}"))
        }
    }
}

#[component]
pub fn Calculator() -> Element {
    rsx! { Shell { CalculatorPage {} } }
}

#[component]
pub fn Audit() -> Element {
    rsx! { Shell { AuditPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down() -> FeedHealth {
        FeedHealth::Down("Failed to load BTC price: timeout".to_string())
    }

    #[test]
    fn repeated_outages_toast_once() {
        let first = feed_notice(None, &FeedHealth::Stale);
        assert_eq!(first.map(|(kind, _)| kind), Some(ToastKind::Warning));

        assert_eq!(feed_notice(Some(&FeedHealth::Stale), &FeedHealth::Stale), None);
        assert_eq!(feed_notice(Some(&down()), &down()), None);
        assert_eq!(
            feed_notice(
                Some(&down()),
                &FeedHealth::Down("Failed to load BTC price: 503".to_string())
            ),
            None
        );
    }

    #[test]
    fn transitions_are_reported() {
        let (kind, message) = feed_notice(Some(&FeedHealth::Live), &down()).unwrap();
        assert_eq!(kind, ToastKind::Error);
        assert!(message.contains("timeout"));

        let (kind, _) = feed_notice(Some(&down()), &FeedHealth::Stale).unwrap();
        assert_eq!(kind, ToastKind::Warning);

        let (kind, _) = feed_notice(Some(&FeedHealth::Stale), &FeedHealth::Live).unwrap();
        assert_eq!(kind, ToastKind::Success);
    }

    #[test]
    fn healthy_feed_stays_quiet() {
        assert_eq!(feed_notice(None, &FeedHealth::Live), None);
        assert_eq!(feed_notice(Some(&FeedHealth::Live), &FeedHealth::Live), None);
    }
}
