//! Local, non-persisted projections over the service's list output.
//!
//! # Responsibility
//! - Search, status filtering, toggle helpers and summary counts for
//!   dashboard-style consumers.
//!
//! # Invariants
//! - Projections never mutate or refetch records; they only derive views.

pub mod filter;
