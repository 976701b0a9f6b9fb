//! In-memory storage backend using DashMap.
//!
//! Submissions live in a `DashMap<String, Submission>` keyed by record id,
//! next to the compiled validator for the served schema.

use std::sync::Arc;

use dashmap::DashMap;
use formkit_core::{Submission, SortOrder};
use formkit_validate::SchemaValidator;

struct Inner {
    validator: SchemaValidator,
    submissions: DashMap<String, Submission>,
}

/// Shared application state.
///
/// Cloning is cheap; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(validator: SchemaValidator) -> Self {
        Self {
            inner: Arc::new(Inner {
                validator,
                submissions: DashMap::new(),
            }),
        }
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.inner.validator
    }

    pub fn submissions(&self) -> &DashMap<String, Submission> {
        &self.inner.submissions
    }

    /// Every stored submission matching `search`, sorted by creation time.
    ///
    /// Matching is a case-insensitive substring test over the record id and
    /// the display form of each value.
    pub fn matching(&self, search: Option<&str>, order: SortOrder) -> Vec<Submission> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut found: Vec<Submission> = self
            .submissions()
            .iter()
            .filter(|entry| match &needle {
                None => true,
                Some(needle) => matches_search(entry.value(), needle),
            })
            .map(|entry| entry.value().clone())
            .collect();

        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        if order == SortOrder::Desc {
            found.reverse();
        }
        found
    }
}

fn matches_search(submission: &Submission, needle: &str) -> bool {
    submission.id.to_lowercase().contains(needle)
        || submission
            .data
            .values()
            .any(|v| v.display().to_lowercase().contains(needle))
}
