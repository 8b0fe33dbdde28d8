use dioxus::prelude::*;

use crate::domain::{AuditStatus, Progress, StatusCounts};
use crate::ui::theme;

#[component]
pub fn AuditProgress(progress: Progress, counts: StatusCounts) -> Element {
    let tiles = [
        (AuditStatus::Passed, counts.passed),
        (AuditStatus::Failed, counts.failed),
        (AuditStatus::Pending, counts.pending),
    ];

    rsx! {
        section {
            class: "panel",
            h2 { class: "panel-title", "Audit Progress" }
            div {
                class: "row",
                div {
                    style: "flex: 1",
                    div {
                        class: "progress-track",
                        div { class: "progress-fill", style: "width: {progress.percentage}%" }
                    }
                }
                span { "{progress.percentage}%" }
            }
            p { class: "muted", "{progress.completed} of {progress.total} items reviewed" }
            div {
                class: "grid",
                for (status, count) in tiles {
                    div {
                        class: "panel",
                        div {
                            class: "row",
                            span { "{theme::status_icon(status)} {status.label()}" }
                        }
                        p { class: "kpi-value", "{count}" }
                        p { class: "muted", "items" }
                    }
                }
            }
        }
    }
}
