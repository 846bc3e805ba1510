//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loader, synchronizer and cache into the session store.
//! - Keep UI layers decoupled from storage and transport details.

pub mod project_service;
