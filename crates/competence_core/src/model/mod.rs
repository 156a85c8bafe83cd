//! Domain model for competence records.
//!
//! # Responsibility
//! - Define the canonical competence/sub-competence data structures.
//! - Enforce construction invariants before anything reaches storage.
//!
//! # Invariants
//! - Every competence is identified by a stable `CompetenceId`.
//! - A created competence always carries at least one sub-competence.
//! - `global_status` is engine-derived; callers never supply it.

pub mod competence;
