//! Competence use-case service.
//!
//! # Responsibility
//! - Provide the operation set consumed by transport layers: list,
//!   create, replace, update_sub_items, remove.
//! - Run validation and status derivation before any store write.
//!
//! # Invariants
//! - The store is never called when request validation fails.
//! - `global_status` is recomputed server-side on every read and before
//!   every persist; a caller-supplied status is never accepted.
//! - Every mutation is a single-record single-write; a failure leaves
//!   prior state untouched.

use crate::model::competence::{
    Competence, CompetenceDraft, CompetenceId, CompetencePatch, SubCompetence,
};
use crate::repo::competence_repo::{CompetenceRepository, FailureKind, RepoError, RepoResult};
use crate::service::observer::{LogObserver, ServiceEvent, ServiceObserver};
use std::time::Instant;

/// Use-case service orchestrating competence CRUD operations.
pub struct CompetenceService<R: CompetenceRepository, O: ServiceObserver = LogObserver> {
    repo: R,
    observer: O,
}

impl<R: CompetenceRepository> CompetenceService<R> {
    /// Creates a service logging operations through the `log` facade.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            observer: LogObserver,
        }
    }
}

impl<R: CompetenceRepository, O: ServiceObserver> CompetenceService<R, O> {
    /// Creates a service with a caller-provided observability collaborator.
    pub fn with_observer(repo: R, observer: O) -> Self {
        Self { repo, observer }
    }

    /// Lists all competences with freshly derived status.
    ///
    /// The cached storage value is never trusted: each record's status is
    /// recomputed from its current sub-competences before it is returned.
    pub fn list(&self) -> RepoResult<Vec<Competence>> {
        self.observed("list", || {
            let mut records = self.repo.find()?;
            for record in &mut records {
                record.refresh_status();
            }
            Ok(records)
        })
    }

    /// Creates a competence from a draft.
    ///
    /// # Errors
    /// - `Validation` for missing/empty code, name or sub-competences;
    ///   the store is not called in that case.
    /// - `DuplicateCode` when the code already exists; nothing is persisted.
    pub fn create(&self, draft: CompetenceDraft) -> RepoResult<Competence> {
        self.observed("create", || {
            let record = Competence::from_draft(draft)?;
            self.repo.insert(&record)?;
            Ok(record)
        })
    }

    /// Applies a partial update to an existing competence.
    ///
    /// Only fields present in the patch are replaced; status is always
    /// re-derived from whatever sub-competence sequence ends up stored.
    /// The merged record must still satisfy the construction invariants:
    /// a patch cannot empty out code, name or the sub-competences.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not resolve to a record.
    /// - `Validation` when the merged record has a blank code or name or
    ///   an empty sub-competence sequence; nothing is persisted.
    /// - `DuplicateCode` when a patched code collides with another record.
    pub fn replace(&self, id: CompetenceId, patch: CompetencePatch) -> RepoResult<Competence> {
        self.observed("replace", || {
            let mut record = self.fetch(id)?;

            if let Some(code) = patch.code {
                record.code = code;
            }
            if let Some(name) = patch.name {
                record.name = name;
            }
            if let Some(sub_competences) = patch.sub_competences {
                record.sub_competences = sub_competences;
            }
            record.validate()?;
            record.refresh_status();

            self.repo.save(&record)?;
            Ok(record)
        })
    }

    /// Replaces the sub-competence sequence wholesale.
    ///
    /// Unlike creation, an empty sequence is accepted on this evaluation
    /// path; the record then reads as not validated.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not resolve to a record.
    pub fn update_sub_items(
        &self,
        id: CompetenceId,
        sub_competences: Vec<SubCompetence>,
    ) -> RepoResult<Competence> {
        self.observed("update_sub_items", || {
            let mut record = self.fetch(id)?;
            record.sub_competences = sub_competences;
            record.refresh_status();

            self.repo.save(&record)?;
            Ok(record)
        })
    }

    /// Deletes a competence by identity.
    ///
    /// # Errors
    /// - `NotFound` when no record matched.
    pub fn remove(&self, id: CompetenceId) -> RepoResult<Competence> {
        self.observed("remove", || {
            self.repo.delete_by_id(id)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn fetch(&self, id: CompetenceId) -> RepoResult<Competence> {
        self.repo.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    fn observed<T>(
        &self,
        operation: &'static str,
        run: impl FnOnce() -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = run();
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => failure_label(err),
        };
        self.observer.record(&ServiceEvent {
            operation,
            outcome,
            duration: started_at.elapsed(),
        });
        result
    }
}

fn failure_label(err: &RepoError) -> &'static str {
    match err.kind() {
        FailureKind::Validation => "validation_error",
        FailureKind::DuplicateKey => "duplicate_key",
        FailureKind::NotFound => "not_found",
        FailureKind::Store => "store_error",
    }
}
