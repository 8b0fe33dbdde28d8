use dioxus::prelude::*;

/// Labelled text input for numeric values; parsing happens elsewhere.
#[component]
pub fn NumberField(
    label: String,
    value: String,
    oninput: EventHandler<String>,
    error: Option<String>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label { "{label}" }
            input {
                r#type: "text",
                inputmode: "decimal",
                value: value,
                oninput: move |evt| oninput.call(evt.value()),
            }
            if let Some(message) = error {
                p { class: "field-error", "{message}" }
            }
        }
    }
}
