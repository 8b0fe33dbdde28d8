use std::collections::{HashMap, HashSet};

use dioxus::prelude::*;

use crate::domain::{failed_items_missing_notes, AuditItem, AuditStatus, AuditTracker};
use crate::ui::theme;

#[derive(Clone, PartialEq)]
struct CategoryView {
    id: String,
    name: String,
    passed: usize,
    total: usize,
    rows: Vec<RowView>,
}

#[derive(Clone, PartialEq)]
struct RowView {
    item: AuditItem,
    note: String,
    needs_note: bool,
}

fn category_views(tracker: &AuditTracker) -> Vec<CategoryView> {
    let needs_note: HashSet<&str> = failed_items_missing_notes(tracker)
        .into_iter()
        .map(|item| item.id.as_str())
        .collect();

    tracker
        .categories()
        .iter()
        .zip(tracker.category_summaries())
        .map(|(category, summary)| CategoryView {
            id: category.id.clone(),
            name: category.name.clone(),
            passed: summary.passed,
            total: summary.total,
            rows: category
                .items
                .iter()
                .map(|item| RowView {
                    item: item.clone(),
                    note: tracker.note(&item.id).unwrap_or_default().to_string(),
                    needs_note: needs_note.contains(item.id.as_str()),
                })
                .collect(),
        })
        .collect()
}

#[component]
pub fn AuditChecklist(
    tracker: AuditTracker,
    on_status: EventHandler<(String, AuditStatus)>,
    on_note: EventHandler<(String, String)>,
) -> Element {
    let mut collapsed = use_signal(HashMap::<String, bool>::new);
    let views = category_views(&tracker);

    rsx! {
        div {
            class: "stack",
            for view in views {
                section {
                    key: "{view.id}",
                    class: "panel",
                    button {
                        class: "nav-btn row",
                        style: "width: 100%",
                        onclick: {
                            let id = view.id.clone();
                            move |_| collapsed.with_mut(|map| {
                                let entry = map.entry(id.clone()).or_insert(false);
                                *entry = !*entry;
                            })
                        },
                        h3 { "{view.name}" }
                        span { class: "badge badge-pending", "{view.passed} / {view.total}" }
                    }
                    if !collapsed.with(|map| map.get(&view.id).copied().unwrap_or(false)) {
                        for row in view.rows {
                            ChecklistRow {
                                key: "{row.item.id}",
                                item: row.item,
                                note: row.note,
                                needs_note: row.needs_note,
                                on_status,
                                on_note,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ChecklistRow(
    item: AuditItem,
    note: String,
    needs_note: bool,
    on_status: EventHandler<(String, AuditStatus)>,
    on_note: EventHandler<(String, String)>,
) -> Element {
    let note_id = item.id.clone();

    rsx! {
        div {
            class: "checklist-item",
            div {
                class: "row",
                div {
                    h4 { "{item.title}" }
                    p { class: "muted", "{item.description}" }
                }
                div {
                    class: "row",
                    span { class: theme::status_badge(item.status), "{item.status.label()}" }
                    for status in AuditStatus::ALL {
                        button {
                            class: theme::status_button(status, item.status),
                            title: status.label(),
                            onclick: {
                                let id = item.id.clone();
                                move |_| on_status.call((id.clone(), status))
                            },
                            "{theme::status_icon(status)}"
                        }
                    }
                }
            }
            textarea {
                rows: "3",
                placeholder: "Add notes...",
                value: note,
                oninput: move |evt| on_note.call((note_id.clone(), evt.value())),
            }
            if needs_note {
                p { class: "nudge", "⚠️ Please add notes for failed items" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_mirror_tracker_state() {
        let mut tracker = AuditTracker::new();
        tracker.set_item_status("changelog", AuditStatus::Failed).unwrap();
        tracker.set_item_status("backup", AuditStatus::Passed).unwrap();
        tracker.set_item_note("backup", "snapshot taken").unwrap();

        let views = category_views(&tracker);
        assert_eq!(views.len(), 7);

        let docs = views.iter().find(|v| v.id == "documentation").unwrap();
        assert_eq!((docs.passed, docs.total), (1, 5));

        let changelog = docs.rows.iter().find(|r| r.item.id == "changelog").unwrap();
        assert!(changelog.needs_note);
        let backup = docs.rows.iter().find(|r| r.item.id == "backup").unwrap();
        assert_eq!(backup.note, "snapshot taken");
        assert!(!backup.needs_note);
    }
}
