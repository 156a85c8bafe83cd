//! Dashboard-side list projections.
//!
//! # Responsibility
//! - Free-text search across name, code and sub-competence names.
//! - Exact-match filtering on global status.
//! - Per-sub-competence toggle preparation for evaluation updates.
//!
//! # Invariants
//! - Search is case-insensitive substring match, OR'd across fields.
//! - Filtering preserves the input list order.

use crate::model::competence::{Competence, GlobalStatus, SubCompetence};

/// Status facet of the dashboard filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Validated,
    NotValidated,
}

impl StatusFilter {
    fn accepts(self, status: GlobalStatus) -> bool {
        match self {
            Self::All => true,
            Self::Validated => status == GlobalStatus::Validated,
            Self::NotValidated => status == GlobalStatus::NotValidated,
        }
    }
}

/// Combined search + status filter applied to a fetched list.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Free-text term; `None` or blank matches everything.
    pub search: Option<String>,
    pub status: StatusFilter,
}

/// Returns whether a record matches a free-text search term.
///
/// The term is matched case-insensitively as a substring of the record
/// name, the code, or any sub-competence name.
pub fn matches_search(record: &Competence, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(&needle)
        || record.code.to_lowercase().contains(&needle)
        || record
            .sub_competences
            .iter()
            .any(|sc| sc.name.to_lowercase().contains(&needle))
}

/// Applies search and status filters, preserving list order.
pub fn apply_filter<'a>(records: &'a [Competence], filter: &ListFilter) -> Vec<&'a Competence> {
    let term = filter.search.as_deref().map(str::trim).unwrap_or("");
    records
        .iter()
        .filter(|record| filter.status.accepts(record.global_status))
        .filter(|record| matches_search(record, term))
        .collect()
}

/// Builds the sub-competence sequence with one flag flipped.
///
/// Returns `None` when `index` is out of range. The returned sequence is
/// what the caller feeds into `update_sub_items`; reconciling the
/// returned record locally avoids a full list refetch.
pub fn toggle_sub_competence(
    sub_competences: &[SubCompetence],
    index: usize,
) -> Option<Vec<SubCompetence>> {
    if index >= sub_competences.len() {
        return None;
    }
    let mut toggled = sub_competences.to_vec();
    toggled[index].validated = !toggled[index].validated;
    Some(toggled)
}

/// Summary counts rendered by the dashboard stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub validated: usize,
    pub not_validated: usize,
}

/// Counts records per status over the unfiltered list.
pub fn dashboard_stats(records: &[Competence]) -> DashboardStats {
    let validated = records
        .iter()
        .filter(|record| record.global_status == GlobalStatus::Validated)
        .count();
    DashboardStats {
        total: records.len(),
        validated,
        not_validated: records.len() - validated,
    }
}
