//! Project list reconciliation.
//!
//! # Responsibility
//! - Merge a freshly loaded remote list with the cached one, preserving the
//!   user's prior ordering for entries present in both.
//! - Own the single id normalization point for the whole crate.
//!
//! # Invariants
//! - Matching is keyed by `file_name`; `id` never participates in matching.
//! - Every produced list has ids equal to `{0, 1, ..., n-1}` in order.
//! - `sync_with_cache` performs exactly one cache write and no network I/O.
//!
//! # See also
//! - docs/architecture/sync.md

use crate::model::project::Project;
use crate::repo::cache_repo::ProjectCacheRepository;
use log::{error, info};

/// Recomputes every id as the 0-based position in the list.
///
/// This is the only function allowed to hand out ids.
pub fn reindex_ids(mut projects: Vec<Project>) -> Vec<Project> {
    for (position, project) in projects.iter_mut().enumerate() {
        project.id = position as u32;
    }
    projects
}

/// Merges a remote list against a cached one.
///
/// Partition rules, keyed by `file_name`:
/// - present in both: remote content, cached relative order;
/// - present only in remote: appended at the end, in remote order;
/// - present only in cache: dropped (removed upstream).
///
/// The result is reindexed; an empty cache passes the remote list through
/// unchanged apart from reindexing.
pub fn merge_project_lists(remote: Vec<Project>, cached: &[Project]) -> Vec<Project> {
    if cached.is_empty() {
        return reindex_ids(remote);
    }

    let mut remaining = remote;
    let mut merged: Vec<Project> = Vec::with_capacity(remaining.len());

    for cached_project in cached {
        if let Some(index) = remaining
            .iter()
            .position(|candidate| candidate.file_name == cached_project.file_name)
        {
            merged.push(remaining.remove(index));
        }
    }

    // Whatever the cache did not claim is new upstream.
    merged.append(&mut remaining);
    reindex_ids(merged)
}

/// Reconciles the remote list with the cache and persists the result.
///
/// Cache faults are logged and absorbed: a failed read merges against an
/// empty cache, a failed write still returns the merged list. Callers always
/// receive a usable list.
pub fn sync_with_cache<R: ProjectCacheRepository>(
    cache: &R,
    remote: Vec<Project>,
) -> Vec<Project> {
    let cached = match cache.load_projects() {
        Ok(cached) => cached.unwrap_or_default(),
        Err(err) => {
            error!("event=project_sync module=sync status=cache_read_error error={err}");
            Vec::new()
        }
    };

    let merged = merge_project_lists(remote, &cached);

    match cache.save_projects(&merged) {
        Ok(()) => info!(
            "event=project_sync module=sync status=ok project_count={}",
            merged.len()
        ),
        Err(err) => {
            error!("event=project_sync module=sync status=cache_write_error error={err}");
        }
    }

    merged
}
