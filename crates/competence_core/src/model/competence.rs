//! Competence domain model.
//!
//! # Responsibility
//! - Define the competence aggregate and its sub-competence elements.
//! - Validate construction requests before persistence is attempted.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another competence.
//! - `code` must be unique across all records (enforced by the store).
//! - `sub_competences` is non-empty at creation time.
//! - `global_status` always reflects the current sub-competence flags.

use crate::status::derive_global_status;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store to every competence record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CompetenceId = Uuid;

/// A named boolean-validated component of a competence.
///
/// Sub-competences carry no identity of their own; they live only inside
/// their parent's ordered sequence, addressed by position during edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCompetence {
    pub name: String,
    pub validated: bool,
}

impl SubCompetence {
    pub fn new(name: impl Into<String>, validated: bool) -> Self {
        Self {
            name: name.into(),
            validated,
        }
    }
}

/// Majority-derived classification of a competence.
///
/// Serializes as `"validated"` / `"not validated"` to match the wire shape
/// consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalStatus {
    #[serde(rename = "validated")]
    Validated,
    #[serde(rename = "not validated")]
    NotValidated,
}

impl GlobalStatus {
    /// Stable text form used in storage and response payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::NotValidated => "not validated",
        }
    }

    /// Parses the stable text form; `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "validated" => Some(Self::Validated),
            "not validated" => Some(Self::NotValidated),
            _ => None,
        }
    }
}

impl Display for GlobalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical competence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competence {
    /// Store-assigned identity used for fetch/update/delete addressing.
    pub uuid: CompetenceId,
    /// Unique business code, e.g. `C1` or `TECH-001`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Ordered sub-competence sequence; order is insertion order.
    #[serde(rename = "subCompetences")]
    pub sub_competences: Vec<SubCompetence>,
    /// Derived majority status; cached in storage but recomputed on read.
    #[serde(rename = "globalStatus")]
    pub global_status: GlobalStatus,
}

impl Competence {
    /// Builds a record from a validated draft, assigning a fresh identity.
    pub fn from_draft(draft: CompetenceDraft) -> Result<Self, CompetenceValidationError> {
        draft.validate()?;
        let global_status = derive_global_status(&draft.sub_competences);
        Ok(Self {
            uuid: Uuid::new_v4(),
            code: draft.code,
            name: draft.name,
            sub_competences: draft.sub_competences,
            global_status,
        })
    }

    /// Recomputes `global_status` from the current sub-competence flags.
    ///
    /// Must be called after any mutation of `sub_competences`; read paths
    /// call it as well so a stale cached value can never leak out.
    pub fn refresh_status(&mut self) {
        self.global_status = derive_global_status(&self.sub_competences);
    }

    /// Checks the same field invariants as draft validation.
    ///
    /// Full updates must keep a record constructible: a patch may not
    /// empty out `code`, `name` or the sub-competence sequence.
    pub fn validate(&self) -> Result<(), CompetenceValidationError> {
        check_required_fields(&self.code, &self.name, &self.sub_competences)
    }
}

/// Creation request for a competence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetenceDraft {
    pub code: String,
    pub name: String,
    #[serde(rename = "subCompetences")]
    pub sub_competences: Vec<SubCompetence>,
}

impl CompetenceDraft {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        sub_competences: Vec<SubCompetence>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            sub_competences,
        }
    }

    /// Checks creation invariants.
    ///
    /// # Errors
    /// - `CodeRequired` when `code` is empty or blank.
    /// - `NameRequired` when `name` is empty or blank.
    /// - `SubCompetencesRequired` when the sequence is empty.
    pub fn validate(&self) -> Result<(), CompetenceValidationError> {
        check_required_fields(&self.code, &self.name, &self.sub_competences)
    }
}

fn check_required_fields(
    code: &str,
    name: &str,
    sub_competences: &[SubCompetence],
) -> Result<(), CompetenceValidationError> {
    if code.trim().is_empty() {
        return Err(CompetenceValidationError::CodeRequired);
    }
    if name.trim().is_empty() {
        return Err(CompetenceValidationError::NameRequired);
    }
    if sub_competences.is_empty() {
        return Err(CompetenceValidationError::SubCompetencesRequired);
    }
    Ok(())
}

/// Partial update for a competence.
///
/// Presence is explicit: a `None` field is left untouched, a `Some` field
/// replaces the stored value wholesale. There is deliberately no status
/// field; status is always re-derived server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "subCompetences")]
    pub sub_competences: Option<Vec<SubCompetence>>,
}

/// Validation failure for competence construction/update requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetenceValidationError {
    CodeRequired,
    NameRequired,
    SubCompetencesRequired,
}

impl Display for CompetenceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodeRequired => write!(f, "code is required"),
            Self::NameRequired => write!(f, "name is required"),
            Self::SubCompetencesRequired => {
                write!(f, "at least one sub-competence is required")
            }
        }
    }
}

impl Error for CompetenceValidationError {}
