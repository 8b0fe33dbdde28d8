//! Page-audit checklist: per-item status, free-text notes, progress, report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::checklist_template::{duplicate_item_id, TemplateCategory, DEFAULT_CHECKLIST};
use super::entities::AuditStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("no audit item with id \"{0}\"")]
    NotFound(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuditItem {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub status: AuditStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuditCategory {
    pub id: String,
    pub name: String,
    pub items: Vec<AuditItem>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub passed: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub progress: Progress,
    pub categories: Vec<ReportCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportCategory {
    pub name: String,
    pub items: Vec<ReportItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub title: String,
    pub status: AuditStatus,
    pub notes: String,
}

/// Checklist state for one audit session.
///
/// The category/item layout is fixed at construction; only statuses and
/// notes change afterwards. Notes live in a map keyed by item id, and only
/// ids present in the checklist are accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditTracker {
    session_id: Uuid,
    template: &'static [TemplateCategory],
    categories: Vec<AuditCategory>,
    notes: HashMap<String, String>,
}

impl Default for AuditTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditTracker {
    pub fn new() -> Self {
        Self::from_template(DEFAULT_CHECKLIST)
    }

    /// Item ids must be unique across the whole template.
    pub fn from_template(template: &'static [TemplateCategory]) -> Self {
        let duplicate = duplicate_item_id(template);
        debug_assert!(duplicate.is_none(), "duplicate checklist item id {duplicate:?}");
        let tracker = Self {
            session_id: Uuid::new_v4(),
            template,
            categories: seed_categories(template),
            notes: HashMap::new(),
        };
        tracing::debug!(
            session = %tracker.session_id,
            items = tracker.compute_progress().total,
            "audit session started"
        );
        tracker
    }

    /// Drops every status and note and starts over from the template.
    pub fn reset(&mut self) {
        *self = Self::from_template(self.template);
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn categories(&self) -> &[AuditCategory] {
        &self.categories
    }

    pub fn item(&self, item_id: &str) -> Option<&AuditItem> {
        self.items().find(|item| item.id == item_id)
    }

    pub fn note(&self, item_id: &str) -> Option<&str> {
        self.notes.get(item_id).map(String::as_str)
    }

    pub fn set_item_status(&mut self, item_id: &str, status: AuditStatus) -> Result<(), AuditError> {
        let item = self
            .categories
            .iter_mut()
            .flat_map(|category| category.items.iter_mut())
            .find(|item| item.id == item_id)
            .ok_or_else(|| AuditError::NotFound(item_id.to_string()))?;
        item.status = status;
        Ok(())
    }

    pub fn set_item_note(&mut self, item_id: &str, text: impl Into<String>) -> Result<(), AuditError> {
        if self.item(item_id).is_none() {
            return Err(AuditError::NotFound(item_id.to_string()));
        }
        self.notes.insert(item_id.to_string(), text.into());
        Ok(())
    }

    pub fn compute_progress(&self) -> Progress {
        let (total, completed) = self.items().fold((0_usize, 0_usize), |(total, done), item| {
            (total + 1, done + usize::from(item.status.is_reviewed()))
        });

        Progress {
            total,
            completed,
            percentage: rounded_percentage(completed, total),
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.items()
            .fold(StatusCounts::default(), |mut counts, item| {
                match item.status {
                    AuditStatus::Passed => counts.passed += 1,
                    AuditStatus::Failed => counts.failed += 1,
                    AuditStatus::Pending => counts.pending += 1,
                }
                counts
            })
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|category| CategorySummary {
                id: category.id.clone(),
                name: category.name.clone(),
                passed: category
                    .items
                    .iter()
                    .filter(|item| item.status == AuditStatus::Passed)
                    .count(),
                total: category.items.len(),
            })
            .collect()
    }

    pub fn export_report(&self) -> AuditReport {
        self.export_report_at(OffsetDateTime::now_utc())
    }

    pub fn export_report_at(&self, timestamp: OffsetDateTime) -> AuditReport {
        AuditReport {
            timestamp,
            progress: self.compute_progress(),
            categories: self
                .categories
                .iter()
                .map(|category| ReportCategory {
                    name: category.name.clone(),
                    items: category
                        .items
                        .iter()
                        .map(|item| ReportItem {
                            title: item.title.clone(),
                            status: item.status,
                            notes: self.note(&item.id).unwrap_or_default().to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn items(&self) -> impl Iterator<Item = &AuditItem> {
        self.categories.iter().flat_map(|category| category.items.iter())
    }
}

/// Failed items that still have no explanatory note.
///
/// Presentation nudge only; the tracker accepts failed items without notes.
pub fn failed_items_missing_notes(tracker: &AuditTracker) -> Vec<&AuditItem> {
    tracker
        .items()
        .filter(|item| item.status == AuditStatus::Failed)
        .filter(|item| tracker.note(&item.id).map_or(true, |note| note.trim().is_empty()))
        .collect()
}

fn seed_categories(template: &[TemplateCategory]) -> Vec<AuditCategory> {
    template
        .iter()
        .map(|category| AuditCategory {
            id: category.id.to_string(),
            name: category.name.to_string(),
            items: category
                .items
                .iter()
                .map(|item| AuditItem {
                    id: item.id.to_string(),
                    category: category.id.to_string(),
                    title: item.title.to_string(),
                    description: item.description.to_string(),
                    status: AuditStatus::Pending,
                })
                .collect(),
        })
        .collect()
}

/// `round(completed / total * 100)` with halves rounding up; zero items is 0%.
fn rounded_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (2 * total)) as u32
}
