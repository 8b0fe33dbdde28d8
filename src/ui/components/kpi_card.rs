use dioxus::prelude::*;

#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    value_class: Option<String>,
) -> Element {
    let value_class = value_class.unwrap_or_default();
    rsx! {
        div {
            class: "panel",
            h3 { class: "panel-title", "{title}" }
            p { class: "kpi-value {value_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "muted", "{desc}" }
            }
        }
    }
}
