//! # Records and Listing
//!
//! Wire types for persisted submissions, paginated listings, and
//! structured rejection bodies. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::{FieldErrors, FieldValues};

/// A persisted form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Server-assigned record id.
    pub id: String,
    /// When the record was first stored.
    pub created_at: DateTime<Utc>,
    /// Submitted values keyed by field id.
    pub data: FieldValues,
}

/// Position of one page within a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Number of pages at this size.
    pub total_pages: u32,
    /// Number of matching records.
    pub total_count: u64,
}

/// One page of submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse {
    /// Always `true` on a 2xx response.
    #[serde(default = "default_true")]
    pub success: bool,
    /// Records on this page.
    pub data: Vec<Submission>,
    /// Page position.
    pub pagination: Pagination,
}

fn default_true() -> bool {
    true
}

/// Listing sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Query-string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Parameters of a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Sort key; the server supports `createdAt`.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Free-text filter; omitted from the query string when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::Desc,
            search: None,
        }
    }
}

impl ListQuery {
    /// Change the search term. A new term always starts at page 1.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.is_empty() { None } else { Some(term) };
        self.page = 1;
        self
    }

    /// Flip the sort direction.
    pub fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    /// Query-string pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortOrder", self.sort_order.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Body of a rejected submit, update, or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Form-level message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-field messages keyed by field id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiErrorBody {
    /// A form-level rejection.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            errors: None,
        }
    }

    /// A rejection carrying per-field messages.
    pub fn with_field_errors(error: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            error: Some(error.into()),
            errors: Some(errors),
        }
    }
}
