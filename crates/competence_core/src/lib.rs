//! Core domain logic for competence management.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod status;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::competence::{
    Competence, CompetenceDraft, CompetenceId, CompetencePatch, CompetenceValidationError,
    GlobalStatus, SubCompetence,
};
pub use repo::competence_repo::{
    CompetenceRepository, FailureKind, RepoError, RepoResult, SqliteCompetenceRepository,
};
pub use service::competence_service::CompetenceService;
pub use service::observer::{LogObserver, NoopObserver, ServiceEvent, ServiceObserver};
pub use status::{derive_global_status, derive_progress, ValidationProgress};
pub use view::filter::{
    apply_filter, dashboard_stats, matches_search, toggle_sub_competence, DashboardStats,
    ListFilter, StatusFilter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
