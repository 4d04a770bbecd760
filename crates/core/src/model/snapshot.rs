use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ItemId, SectionId, SessionId};
use crate::model::item::Item;
use crate::model::response::Response;
use crate::model::section::Section;
use crate::time::epoch_ms;

/// Complete serializable state of one exam session.
///
/// The snapshot is the root aggregate: it is created fresh, loaded from local
/// storage, or hydrated wholesale from the server, and mutated exclusively
/// through [`crate::engine::apply`]. Every transition produces a new value;
/// nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_package_id: Option<String>,
    /// Fixed for the session's lifetime.
    pub sections: Vec<Section>,
    /// Ability estimate per section, always within `[-3, 3]`.
    #[serde(default)]
    pub thetas: BTreeMap<SectionId, f64>,
    pub active_section: usize,
    pub active_item: usize,
    #[serde(default)]
    pub responses: BTreeMap<ItemId, Response>,
    /// Current unsubmitted input.
    #[serde(default)]
    pub draft_answer: String,
    /// Last local persistence timestamp, epoch milliseconds.
    pub saved_at_ms: i64,
    /// Last heartbeat-attempt timestamp, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_attempted_at_ms: Option<i64>,
}

impl SessionSnapshot {
    /// Create a fresh snapshot with theta initialized to 0 for every section
    /// and the cursor at the first item of the first section.
    #[must_use]
    pub fn new(session_id: SessionId, sections: Vec<Section>, created_at: DateTime<Utc>) -> Self {
        let thetas = sections
            .iter()
            .map(|section| (section.id.clone(), 0.0))
            .collect();
        Self {
            session_id,
            exam_package_id: None,
            sections,
            thetas,
            active_section: 0,
            active_item: 0,
            responses: BTreeMap::new(),
            draft_answer: String::new(),
            saved_at_ms: epoch_ms(created_at),
            heartbeat_attempted_at_ms: None,
        }
    }

    #[must_use]
    pub fn with_exam_package(mut self, exam_package_id: impl Into<String>) -> Self {
        self.exam_package_id = Some(exam_package_id.into());
        self
    }

    /// Section the cursor currently points into, if any.
    #[must_use]
    pub fn active_section(&self) -> Option<&Section> {
        self.sections.get(self.active_section)
    }

    /// Item the cursor currently points at.
    ///
    /// `None` when the cursor is past the end or the section is empty; the
    /// session is then terminal for navigation purposes.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.active_section()
            .and_then(|section| section.item(self.active_item))
    }

    /// Ability estimate for the given section, 0 when never updated.
    #[must_use]
    pub fn theta_for(&self, section_id: &SectionId) -> f64 {
        self.thetas.get(section_id).copied().unwrap_or(0.0)
    }

    /// Ids of all items with a recorded response.
    #[must_use]
    pub fn responded_ids(&self) -> BTreeSet<ItemId> {
        self.responses.keys().cloned().collect()
    }

    /// Whether every item in the section at `index` has a recorded response.
    ///
    /// Callers must use this before interpreting a selector result: the
    /// selector falls back to index 0 on an exhausted section instead of
    /// signalling completion.
    #[must_use]
    pub fn is_section_complete(&self, index: usize) -> bool {
        self.sections.get(index).is_some_and(|section| {
            section
                .items
                .iter()
                .all(|item| self.responses.contains_key(&item.id))
        })
    }

    /// Whether an item with this id exists in any section of the snapshot.
    #[must_use]
    pub fn item_exists(&self, id: &ItemId) -> bool {
        self.sections.iter().any(|section| section.contains_item(id))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
