//! Domain model for the portfolio project catalog.
//!
//! # Responsibility
//! - Define the canonical `Project` entity shared by loader, sync and store.
//! - Own field normalization and kind-dependent defaulting rules.
//!
//! # Invariants
//! - `file_name` is the stable identity used for cross-source matching.
//! - `id` is a recomputed display position, never a stable key.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod project;
