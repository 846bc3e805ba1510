//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record rendered by the portfolio pages.
//! - Provide normalization helpers for image paths and kind-dependent fields.
//!
//! # Invariants
//! - `file_name` is the stable merge key; duplicates within one list are a
//!   data-quality defect upstream, not a modeled case.
//! - `id` equals the project's 0-based position in its list and is reassigned
//!   on every structural change.
//! - `author_names` and `repo_link` are never absent after normalization:
//!   absence is replaced by `""` and `"#"` respectively.
//!
//! # See also
//! - docs/architecture/data-model.md

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder shown when a project carries no usable image reference.
pub const PLACEHOLDER_IMAGE_PATH: &str = "/assets/placeholder.svg";
/// Placeholder link for computational projects without a repository URL.
pub const PLACEHOLDER_REPO_LINK: &str = "#";

static ABSOLUTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid url scheme regex"));

/// Authoring flavor of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// Essay or paper; `author_names` carries the byline.
    Written,
    /// Software project; `repo_link` points at the repository.
    Computational,
}

impl ProjectKind {
    /// Parses the remote select value. Unknown values map to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "written" => Some(Self::Written),
            "computational" => Some(Self::Computational),
            _ => None,
        }
    }
}

/// Presentation hint: which column a project card lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSlot {
    Left,
    Middle,
    Right,
}

impl LayoutSlot {
    /// Round-robin slot assignment keyed by source position.
    pub fn from_position(position: usize) -> Self {
        match position % 3 {
            0 => Self::Left,
            1 => Self::Middle,
            _ => Self::Right,
        }
    }
}

/// Which portfolio page(s) display the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Research,
    Computer,
    Both,
}

/// Canonical project record.
///
/// Serialized as JSON for the local cache; `kind` is written as `type` to
/// keep the stored shape aligned with the authoring vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// 0-based display position within the current list.
    pub id: u32,
    /// Stable label used to match a project across source and cache.
    pub file_name: String,
    pub title: String,
    pub description: String,
    /// Absolute URL or single-`/`-prefixed asset path. Never double-prefixed.
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    /// Byline; meaningful only for `ProjectKind::Written`, `""` otherwise.
    pub author_names: String,
    /// Repository URL; meaningful only for `ProjectKind::Computational`,
    /// `"#"` placeholder otherwise.
    pub repo_link: String,
    pub layout_slot: LayoutSlot,
    pub category: Category,
    /// Optional slug for deep-linking into a detail view.
    pub detail_slug: Option<String>,
}

impl Project {
    /// Applies all field normalization rules in place.
    ///
    /// After this call the image URL invariant and the kind-dependent
    /// defaulting invariant both hold.
    pub fn normalize(&mut self) {
        self.image_url = normalize_image_url(&self.image_url);
        if self.repo_link.trim().is_empty() {
            self.repo_link = PLACEHOLDER_REPO_LINK.to_string();
        }
        if self.detail_slug.as_deref().is_some_and(|slug| slug.trim().is_empty()) {
            self.detail_slug = None;
        }
    }
}

/// Authoring input for a new project. Carries no `id`; the store assigns one
/// on admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub file_name: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    /// Optional in the authoring form; stored as `""` when omitted.
    pub author_names: Option<String>,
    /// Optional in the authoring form; stored as `"#"` when omitted.
    pub repo_link: Option<String>,
    pub layout_slot: LayoutSlot,
    pub category: Category,
    pub detail_slug: Option<String>,
}

impl ProjectDraft {
    /// Materializes the draft as a normalized project with the given id.
    pub fn into_project(self, id: u32) -> Project {
        let mut project = Project {
            id,
            file_name: self.file_name,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            kind: self.kind,
            author_names: self.author_names.unwrap_or_default(),
            repo_link: self.repo_link.unwrap_or_default(),
            layout_slot: self.layout_slot,
            category: self.category,
            detail_slug: self.detail_slug,
        };
        project.normalize();
        project
    }
}

/// Normalizes an image reference.
///
/// Rules:
/// - empty input falls back to [`PLACEHOLDER_IMAGE_PATH`];
/// - absolute URLs (any scheme) pass through untouched;
/// - everything else gets exactly one leading `/`, collapsing any existing
///   prefix so paths are never double-prefixed.
pub fn normalize_image_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_IMAGE_PATH.to_string();
    }
    if ABSOLUTE_URL_RE.is_match(trimmed) {
        return trimmed.to_string();
    }
    format!("/{}", trimmed.trim_start_matches('/'))
}
