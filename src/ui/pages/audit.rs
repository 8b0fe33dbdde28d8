use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    domain::{
        checklist_template::CHECKLIST_TITLE, failed_items_missing_notes, AppState, AuditStatus,
    },
    ui::components::{
        audit_progress::AuditProgress,
        checklist::AuditChecklist,
        toast::{push_toast, ToastKind, ToastMessage},
    },
    util::export::{export_dir, write_report},
};

#[component]
pub fn AuditPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let tracker = state.with(|st| st.audit.clone());
    let progress = tracker.compute_progress();
    let counts = tracker.status_counts();
    let missing_notes = failed_items_missing_notes(&tracker).len();
    let session = tracker.session_id().to_string();

    let on_status = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |(item_id, status): (String, AuditStatus)| {
            if let Err(err) = state.with_mut(|st| st.audit.set_item_status(&item_id, status)) {
                warn!("status update rejected: {err}");
                push_toast(toasts.clone(), ToastKind::Error, err.to_string());
            }
        }
    };

    let on_note = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |(item_id, text): (String, String)| {
            if let Err(err) = state.with_mut(|st| st.audit.set_item_note(&item_id, text)) {
                warn!("note update rejected: {err}");
                push_toast(toasts.clone(), ToastKind::Error, err.to_string());
            }
        }
    };

    let on_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            state.with_mut(|st| st.audit.reset());
            info!("audit checklist reset");
            push_toast(toasts.clone(), ToastKind::Info, "Checklist reset to pending.");
        }
    };

    let on_export = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let report = state.with(|st| st.audit.export_report());
            match write_report(&report, &export_dir()) {
                Ok(path) => push_toast(
                    toasts.clone(),
                    ToastKind::Success,
                    format!("Report saved to {}", path.display()),
                ),
                Err(err) => {
                    warn!("report export failed: {err}");
                    push_toast(toasts.clone(), ToastKind::Error, format!("Export failed: {err}"));
                }
            }
        }
    };

    rsx! {
        div { class: "stack",
            section {
                class: "panel",
                div { class: "row",
                    div {
                        h2 { class: "panel-title", "{CHECKLIST_TITLE}" }
                        p { class: "muted", "Session {session}" }
                    }
                    div { class: "row",
                        button { class: "btn", onclick: on_reset, "Reset" }
                        button { class: "btn btn-primary", onclick: on_export, "Export Report" }
                    }
                }
                if missing_notes > 0 {
                    p { class: "nudge", "{missing_notes} failed item(s) still need notes." }
                }
            }
            AuditProgress { progress, counts }
            AuditChecklist { tracker, on_status, on_note }
        }
    }
}
