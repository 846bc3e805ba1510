//! Project store: the in-memory source of truth for a session.
//!
//! # Responsibility
//! - Hold the authoritative project list and expose CRUD/reorder mutators.
//! - Run the load+sync pipeline with the cache/defaults fallback chain.
//! - Write every mutation through to the local cache.
//!
//! # Invariants
//! - Lifecycle is `Uninitialized -> Loading -> Ready`; `Ready` re-enters
//!   `Loading` on refresh. The store never ends in an error state.
//! - After every mutator the list's ids are contiguous from 0.
//! - Cache write failures are logged, never propagated: losing an edit is
//!   acceptable for this data, a crashed session is not.
//!
//! # See also
//! - docs/architecture/sync.md

use crate::loader::load_projects;
use crate::model::project::{Category, LayoutSlot, Project, ProjectDraft, ProjectKind};
use crate::repo::cache_repo::ProjectCacheRepository;
use crate::source::ProjectSource;
use crate::sync::{reindex_ids, sync_with_cache};
use log::{error, info, warn};
use std::time::{Duration, Instant};

/// Session lifecycle of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    /// A load+sync pipeline run is in progress; hosts show a blocking
    /// loading affordance.
    Loading,
    Ready,
}

/// Store construction options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreConfig {
    /// When set, `tick()` re-runs the refresh pipeline once this interval
    /// has elapsed since the last run. `None` disables interval refresh.
    pub auto_refresh: Option<Duration>,
}

/// The session project store.
///
/// All reads by the presentation layer go through this type; it is the sole
/// mutation point for the in-memory list.
pub struct ProjectService<R, S> {
    cache: R,
    source: S,
    config: StoreConfig,
    state: StoreState,
    projects: Vec<Project>,
    last_refresh_at: Option<Instant>,
}

impl<R, S> ProjectService<R, S>
where
    R: ProjectCacheRepository,
    S: ProjectSource,
{
    pub fn new(cache: R, source: S) -> Self {
        Self::with_config(cache, source, StoreConfig::default())
    }

    pub fn with_config(cache: R, source: S, config: StoreConfig) -> Self {
        Self {
            cache,
            source,
            config,
            state: StoreState::Uninitialized,
            projects: Vec::new(),
            last_refresh_at: None,
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    /// Current list, ordered by id.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Runs the load+sync pipeline for the first time.
    pub fn initialize(&mut self) {
        self.run_pipeline("initialize");
    }

    /// Re-runs the pipeline, replacing current state (manual pull-latest).
    pub fn refresh(&mut self) {
        self.run_pipeline("refresh");
    }

    /// Interval-refresh hook for the host event loop.
    ///
    /// Does nothing unless `auto_refresh` is configured and the interval has
    /// elapsed since the last pipeline run.
    pub fn tick(&mut self) {
        let Some(interval) = self.config.auto_refresh else {
            return;
        };
        let due = self
            .last_refresh_at
            .map_or(true, |last| last.elapsed() >= interval);
        if due {
            self.run_pipeline("interval");
        }
    }

    /// Admits a draft, assigning the next id, and persists.
    ///
    /// Returns the assigned id.
    pub fn add(&mut self, draft: ProjectDraft) -> u32 {
        let next_id = self
            .projects
            .iter()
            .map(|project| project.id)
            .max()
            .map_or(0, |max| max + 1);
        self.projects.push(draft.into_project(next_id));
        self.persist();
        info!("event=project_add module=store status=ok id={next_id}");
        next_id
    }

    /// Replaces the entry whose id matches; logged no-op when absent.
    pub fn update(&mut self, updated: Project) {
        let Some(slot) = self
            .projects
            .iter_mut()
            .find(|project| project.id == updated.id)
        else {
            warn!(
                "event=project_update module=store status=not_found id={}",
                updated.id
            );
            return;
        };
        *slot = updated;
        slot.normalize();
        self.persist();
    }

    /// Removes the entry whose id matches, closes the id gap, persists.
    pub fn delete(&mut self, id: u32) {
        let before = self.projects.len();
        self.projects.retain(|project| project.id != id);
        if self.projects.len() == before {
            warn!("event=project_delete module=store status=not_found id={id}");
            return;
        }
        self.projects = reindex_ids(std::mem::take(&mut self.projects));
        self.persist();
    }

    /// Moves the entry at `from` to position `to` (splice, not swap).
    ///
    /// Out-of-range indices are a caller contract violation; the store
    /// answers with a logged no-op rather than a panic.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.projects.len() || to >= self.projects.len() {
            warn!(
                "event=project_reorder module=store status=out_of_range from={from} to={to} len={}",
                self.projects.len()
            );
            return;
        }
        let moved = self.projects.remove(from);
        self.projects.insert(to, moved);
        self.projects = reindex_ids(std::mem::take(&mut self.projects));
        self.persist();
    }

    /// Discards local state and cache, restores the built-in defaults, then
    /// attempts a fresh reconcile against the live source.
    pub fn reset_to_defaults(&mut self) {
        if let Err(err) = self.cache.clear_projects() {
            error!("event=project_reset module=store status=cache_clear_error error={err}");
        }
        self.projects = default_projects();
        self.persist();
        self.refresh();
    }

    fn run_pipeline(&mut self, trigger: &str) {
        self.state = StoreState::Loading;
        info!("event=store_refresh module=store status=start trigger={trigger}");

        let remote = load_projects(&self.source);
        self.projects = if remote.is_empty() {
            // Unreachable source and "no records" are indistinguishable by
            // design; both take the cache -> defaults fallback chain.
            match self.cache.load_projects() {
                Ok(Some(cached)) if !cached.is_empty() => {
                    info!("event=store_refresh module=store status=fallback source=cache");
                    cached
                }
                Ok(_) => {
                    info!("event=store_refresh module=store status=fallback source=defaults");
                    let defaults = default_projects();
                    self.persist_list(&defaults);
                    defaults
                }
                Err(err) => {
                    error!(
                        "event=store_refresh module=store status=cache_read_error error={err}"
                    );
                    default_projects()
                }
            }
        } else {
            sync_with_cache(&self.cache, remote)
        };

        self.last_refresh_at = Some(Instant::now());
        self.state = StoreState::Ready;
        info!(
            "event=store_refresh module=store status=ok trigger={trigger} project_count={}",
            self.projects.len()
        );
    }

    fn persist(&self) {
        self.persist_list(&self.projects);
    }

    fn persist_list(&self, projects: &[Project]) {
        if let Err(err) = self.cache.save_projects(projects) {
            error!("event=cache_save module=store status=error error={err}");
        }
    }
}

/// Built-in fallback list used when neither source nor cache can serve.
pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            id: 0,
            file_name: "FallibleMemory".to_string(),
            title: "Diffusion Models & Memory".to_string(),
            description: "Notes on diffusion models as a biological model of fallible \
                          associative memory."
                .to_string(),
            image_url: "/projects/images/fallible-memory.png".to_string(),
            kind: ProjectKind::Written,
            author_names: "Avery Louis".to_string(),
            repo_link: "#".to_string(),
            layout_slot: LayoutSlot::Left,
            category: Category::Research,
            detail_slug: None,
        },
        Project {
            id: 1,
            file_name: "ChaosEffect".to_string(),
            title: "Chaos Effect".to_string(),
            description: "An interactive physics-based animation that brings chaos to order \
                          and back again."
                .to_string(),
            image_url: "/projects/images/chaos-effect.jpg".to_string(),
            kind: ProjectKind::Computational,
            author_names: String::new(),
            repo_link: "https://github.com/example/chaos-effect".to_string(),
            layout_slot: LayoutSlot::Middle,
            category: Category::Computer,
            detail_slug: None,
        },
        Project {
            id: 2,
            file_name: "PersonalSite".to_string(),
            title: "Personal Website".to_string(),
            description: "A minimalist personal website with interactive elements and clean \
                          typography."
                .to_string(),
            image_url: "/projects/images/personal-site.png".to_string(),
            kind: ProjectKind::Computational,
            author_names: String::new(),
            repo_link: "https://github.com/example/personal-website".to_string(),
            layout_slot: LayoutSlot::Right,
            category: Category::Both,
            detail_slug: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_projects, ProjectService, StoreConfig, StoreState};
    use crate::model::project::Project;
    use crate::repo::cache_repo::{ProjectCacheRepository, RepoResult};
    use crate::source::StaticSource;
    use std::cell::RefCell;
    use std::time::Duration;

    /// In-memory cache double for store-level tests.
    #[derive(Default)]
    struct MemoryCache {
        stored: RefCell<Option<Vec<Project>>>,
    }

    impl ProjectCacheRepository for MemoryCache {
        fn load_projects(&self) -> RepoResult<Option<Vec<Project>>> {
            Ok(self.stored.borrow().clone())
        }

        fn save_projects(&self, projects: &[Project]) -> RepoResult<()> {
            *self.stored.borrow_mut() = Some(projects.to_vec());
            Ok(())
        }

        fn clear_projects(&self) -> RepoResult<()> {
            *self.stored.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn defaults_are_a_fixed_three_entry_sample_with_contiguous_ids() {
        let defaults = default_projects();
        assert_eq!(defaults.len(), 3);
        let ids: Vec<u32> = defaults.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn store_starts_uninitialized_and_initialize_ends_ready() {
        let mut service = ProjectService::new(MemoryCache::default(), StaticSource::new(vec![]));
        assert_eq!(service.state(), StoreState::Uninitialized);
        service.initialize();
        assert_eq!(service.state(), StoreState::Ready);
        assert!(!service.is_loading());
    }

    #[test]
    fn tick_without_auto_refresh_is_inert() {
        let mut service = ProjectService::new(MemoryCache::default(), StaticSource::new(vec![]));
        service.initialize();
        let before = service.projects().to_vec();
        service.tick();
        assert_eq!(service.projects(), before.as_slice());
    }

    #[test]
    fn tick_runs_pipeline_once_interval_elapsed() {
        let mut service = ProjectService::with_config(
            MemoryCache::default(),
            StaticSource::new(vec![]),
            StoreConfig {
                auto_refresh: Some(Duration::ZERO),
            },
        );
        // Never initialized: the first due tick takes the initial pipeline run.
        service.tick();
        assert_eq!(service.state(), StoreState::Ready);
        assert_eq!(service.projects().len(), 3);
    }
}
