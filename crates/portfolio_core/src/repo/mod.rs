//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the local cache store contract consumed by sync and store.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - The whole project list lives under one fixed cache key; writes fully
//!   overwrite the previous value.
//! - Corrupt cached values are discarded, never surfaced as hard errors.

pub mod cache_repo;
