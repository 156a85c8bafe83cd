//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, status derivation and store calls per
//!   operation.
//! - Keep transport/UI layers decoupled from storage details.

pub mod competence_service;
pub mod observer;
