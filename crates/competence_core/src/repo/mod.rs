//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract consumed by the service layer.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository reads reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateCode`)
//!   in addition to DB transport errors.

pub mod competence_repo;
