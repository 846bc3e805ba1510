//! Core domain logic for the portfolio project catalog.
//! This crate is the single source of truth for list-ordering invariants.

pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;
pub mod sync;

pub use loader::{load_projects, map_record, FieldSpec, PropertyKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{
    normalize_image_url, Category, LayoutSlot, Project, ProjectDraft, ProjectKind,
    PLACEHOLDER_IMAGE_PATH, PLACEHOLDER_REPO_LINK,
};
pub use repo::cache_repo::{
    ProjectCacheRepository, RepoError, RepoResult, SqliteCacheRepository, PROJECT_LIST_CACHE_KEY,
};
pub use service::project_service::{default_projects, ProjectService, StoreConfig, StoreState};
pub use source::proxy_client::ProxyClient;
pub use source::{ProjectSource, SourceError, SourceResult, StaticSource};
pub use sync::{merge_project_lists, reindex_ids, sync_with_cache};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
