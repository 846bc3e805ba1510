//! Raw-record to project mapping.
//!
//! # Responsibility
//! - Turn the remote source's nested property objects into validated
//!   `Project` entities.
//! - Keep the field mapping auditable as a declarative table resolved by
//!   pure extraction functions.
//!
//! # Invariants
//! - Source failure yields an empty list, never an error; callers own the
//!   fallback decision.
//! - A record that cannot be mapped yields an error-flagged placeholder, so
//!   list length always tracks the source's record count.
//! - Kind-dependent fields are always defaulted, never left absent.

use crate::model::project::{Category, LayoutSlot, Project, ProjectKind};
use crate::source::ProjectSource;
use crate::sync::reindex_ids;
use log::{error, info, warn};
use serde_json::Value;

/// Property value shapes understood by the extraction functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Url,
    Select,
    MultiSelect,
    Files,
}

/// One row of the source-to-project field mapping table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub property: &'static str,
    pub kind: PropertyKind,
    pub default: &'static str,
}

const FILE_NAME_FIELD: FieldSpec = FieldSpec {
    property: "Name",
    kind: PropertyKind::Title,
    default: "",
};
const TITLE_FIELD: FieldSpec = FieldSpec {
    property: "ProjectTitle",
    kind: PropertyKind::RichText,
    default: "",
};
const DESCRIPTION_FIELD: FieldSpec = FieldSpec {
    property: "Description",
    kind: PropertyKind::RichText,
    default: "No description provided",
};
const IMAGE_FIELD: FieldSpec = FieldSpec {
    property: "ProjectImage",
    kind: PropertyKind::Files,
    default: "",
};
const KIND_FIELD: FieldSpec = FieldSpec {
    property: "Type",
    kind: PropertyKind::Select,
    default: "computational",
};
const AUTHORS_FIELD: FieldSpec = FieldSpec {
    property: "AuthorNames",
    kind: PropertyKind::RichText,
    default: "",
};
const REPO_LINK_FIELD: FieldSpec = FieldSpec {
    property: "RepoLink",
    kind: PropertyKind::Url,
    default: "",
};
const SLUG_FIELD: FieldSpec = FieldSpec {
    property: "ProjectSlug",
    kind: PropertyKind::RichText,
    default: "",
};
const CATEGORY_FIELD: FieldSpec = FieldSpec {
    property: "Category",
    kind: PropertyKind::MultiSelect,
    default: "",
};

/// Fetches raw records and maps them into a reindexed project list.
///
/// On any source failure the fault is logged and an empty list is returned;
/// the store decides whether to fall back to cache or defaults.
pub fn load_projects<S: ProjectSource>(source: &S) -> Vec<Project> {
    let records = match source.fetch_records() {
        Ok(records) => records,
        Err(err) => {
            error!("event=project_load module=loader status=error error={err}");
            return Vec::new();
        }
    };

    let projects: Vec<Project> = records
        .iter()
        .enumerate()
        .map(|(position, record)| map_record(record, position))
        .collect();

    info!(
        "event=project_load module=loader status=ok record_count={}",
        projects.len()
    );
    reindex_ids(projects)
}

/// Maps one raw record into a project.
///
/// A structurally unusable record (not an object, or without `properties`)
/// produces an error-flagged placeholder instead of being dropped.
pub fn map_record(record: &Value, position: usize) -> Project {
    let Some(properties) = record.get("properties").filter(|value| value.is_object()) else {
        warn!("event=project_map module=loader status=unmappable position={position}");
        return error_placeholder(position);
    };

    let file_name = non_empty_or(
        extract_scalar(properties, &FILE_NAME_FIELD, position),
        || format!("Project {}", position + 1),
    );
    let title = non_empty_or(extract_scalar(properties, &TITLE_FIELD, position), || {
        format!("Untitled Project {}", position + 1)
    });
    let kind = ProjectKind::parse(&extract_scalar(properties, &KIND_FIELD, position))
        .unwrap_or(ProjectKind::Computational);
    let detail_slug = {
        let slug = extract_scalar(properties, &SLUG_FIELD, position);
        if slug.is_empty() {
            None
        } else {
            Some(slug)
        }
    };

    let mut project = Project {
        id: position as u32,
        file_name,
        title,
        description: extract_scalar(properties, &DESCRIPTION_FIELD, position),
        image_url: extract_scalar(properties, &IMAGE_FIELD, position),
        kind,
        author_names: extract_scalar(properties, &AUTHORS_FIELD, position),
        repo_link: extract_scalar(properties, &REPO_LINK_FIELD, position),
        layout_slot: LayoutSlot::from_position(position),
        category: derive_category(properties),
        detail_slug,
    };
    project.normalize();
    project
}

/// Resolves one mapping-table row against a record's `properties` object.
pub fn extract_scalar(properties: &Value, spec: &FieldSpec, position: usize) -> String {
    let Some(property) = properties.get(spec.property) else {
        return spec.default.to_string();
    };

    let extracted = match spec.kind {
        PropertyKind::Title => extract_plain_text(property, "title"),
        PropertyKind::RichText => extract_plain_text(property, "rich_text"),
        PropertyKind::Url => property
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string),
        PropertyKind::Select => property
            .get("select")
            .and_then(|select| select.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        PropertyKind::MultiSelect => {
            let names = extract_multi_select(property);
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        PropertyKind::Files => extract_file_url(property, position),
    };

    extracted
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| spec.default.to_string())
}

/// First element's `plain_text` from a title/rich_text property array.
fn extract_plain_text(property: &Value, key: &str) -> Option<String> {
    property
        .get(key)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("plain_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// All option names from a multi_select property, lowercased.
fn extract_multi_select(property: &Value) -> Vec<String> {
    property
        .get("multi_select")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option.get("name"))
                .filter_map(Value::as_str)
                .map(|name| name.to_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

/// First file URL from a files property.
///
/// Externally hosted URLs are preferred; a host-managed URL will expire and
/// is logged as such, but still used when it is the only option.
fn extract_file_url(property: &Value, position: usize) -> Option<String> {
    let first = property
        .get("files")
        .and_then(Value::as_array)
        .and_then(|files| files.first())?;

    match first.get("type").and_then(Value::as_str) {
        Some("external") => first
            .get("external")
            .and_then(|external| external.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Some("file") => {
            warn!(
                "event=project_map module=loader status=expiring_image position={position}"
            );
            first
                .get("file")
                .and_then(|file| file.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
        }
        _ => None,
    }
}

/// Category from the multi-valued selection.
///
/// computer + research -> `Both`; research only -> `Research`; anything else
/// (including no selection at all) -> `Computer`.
fn derive_category(properties: &Value) -> Category {
    let Some(property) = properties.get(CATEGORY_FIELD.property) else {
        return Category::Computer;
    };
    let selections = extract_multi_select(property);

    let has_computer = selections.iter().any(|name| name == "computer");
    let has_research = selections.iter().any(|name| name == "research");

    if has_computer && has_research {
        Category::Both
    } else if has_research {
        Category::Research
    } else {
        Category::Computer
    }
}

fn error_placeholder(position: usize) -> Project {
    let mut project = Project {
        id: position as u32,
        file_name: format!("Error Project {}", position + 1),
        title: "Error Loading Project".to_string(),
        description: "This project could not be read from the remote source.".to_string(),
        image_url: String::new(),
        kind: ProjectKind::Computational,
        author_names: String::new(),
        repo_link: String::new(),
        layout_slot: LayoutSlot::from_position(position),
        category: Category::Computer,
        detail_slug: None,
    };
    project.normalize();
    project
}

fn non_empty_or(value: String, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{load_projects, map_record};
    use crate::model::project::{
        Category, LayoutSlot, ProjectKind, PLACEHOLDER_IMAGE_PATH, PLACEHOLDER_REPO_LINK,
    };
    use crate::source::{ProjectSource, SourceError, SourceResult, StaticSource};
    use serde_json::{json, Value};

    struct UnreachableSource;

    impl ProjectSource for UnreachableSource {
        fn fetch_records(&self) -> SourceResult<Vec<Value>> {
            Err(SourceError::Transport("connection refused".to_string()))
        }
    }

    fn record(file_name: &str, extra: Value) -> Value {
        let mut properties = json!({
            "Name": { "title": [{ "plain_text": file_name }] },
            "ProjectTitle": { "rich_text": [{ "plain_text": format!("{file_name} Title") }] },
            "Description": { "rich_text": [{ "plain_text": "About this project" }] },
            "Type": { "select": { "name": "computational" } },
            "RepoLink": { "url": "https://github.com/example/repo" },
            "ProjectImage": {
                "files": [{ "type": "external", "external": { "url": "https://img.example/a.png" } }]
            },
        });
        if let (Some(base), Some(extra)) = (properties.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        json!({ "properties": properties })
    }

    #[test]
    fn maps_a_complete_record() {
        let project = map_record(&record("Alpha", json!({})), 0);
        assert_eq!(project.id, 0);
        assert_eq!(project.file_name, "Alpha");
        assert_eq!(project.title, "Alpha Title");
        assert_eq!(project.kind, ProjectKind::Computational);
        assert_eq!(project.repo_link, "https://github.com/example/repo");
        assert_eq!(project.image_url, "https://img.example/a.png");
        assert_eq!(project.layout_slot, LayoutSlot::Left);
        assert_eq!(project.category, Category::Computer);
    }

    #[test]
    fn missing_name_and_title_fall_back_to_positional_labels() {
        let raw = json!({ "properties": {} });
        let project = map_record(&raw, 2);
        assert_eq!(project.file_name, "Project 3");
        assert_eq!(project.title, "Untitled Project 3");
        assert_eq!(project.description, "No description provided");
        assert_eq!(project.image_url, PLACEHOLDER_IMAGE_PATH);
        assert_eq!(project.repo_link, PLACEHOLDER_REPO_LINK);
    }

    #[test]
    fn record_without_properties_becomes_error_placeholder() {
        let project = map_record(&json!("not an object"), 1);
        assert_eq!(project.title, "Error Loading Project");
        assert_eq!(project.file_name, "Error Project 2");
        assert_eq!(project.layout_slot, LayoutSlot::Middle);
    }

    #[test]
    fn category_requires_both_selections_for_both() {
        let both = record(
            "A",
            json!({ "Category": { "multi_select": [
                { "name": "Computer" }, { "name": "Research" }
            ] } }),
        );
        assert_eq!(map_record(&both, 0).category, Category::Both);

        let research = record(
            "B",
            json!({ "Category": { "multi_select": [{ "name": "research" }] } }),
        );
        assert_eq!(map_record(&research, 0).category, Category::Research);

        let neither = record("C", json!({ "Category": { "multi_select": [] } }));
        assert_eq!(map_record(&neither, 0).category, Category::Computer);
    }

    #[test]
    fn host_managed_image_is_used_when_no_external_url_exists() {
        let raw = record(
            "A",
            json!({ "ProjectImage": { "files": [
                { "type": "file", "file": { "url": "https://host.example/tmp.png" } }
            ] } }),
        );
        assert_eq!(map_record(&raw, 0).image_url, "https://host.example/tmp.png");
    }

    #[test]
    fn empty_files_array_falls_back_to_placeholder_image() {
        let raw = record("A", json!({ "ProjectImage": { "files": [] } }));
        assert_eq!(map_record(&raw, 0).image_url, PLACEHOLDER_IMAGE_PATH);
    }

    #[test]
    fn written_kind_keeps_author_names_and_placeholder_repo_link() {
        let raw = record(
            "Essay",
            json!({
                "Type": { "select": { "name": "written" } },
                "AuthorNames": { "rich_text": [{ "plain_text": "A. Author" }] },
                "RepoLink": { "url": null },
            }),
        );
        let project = map_record(&raw, 0);
        assert_eq!(project.kind, ProjectKind::Written);
        assert_eq!(project.author_names, "A. Author");
        assert_eq!(project.repo_link, PLACEHOLDER_REPO_LINK);
    }

    #[test]
    fn optional_slug_maps_when_present() {
        let raw = record(
            "A",
            json!({ "ProjectSlug": { "rich_text": [{ "plain_text": "alpha-deep-dive" }] } }),
        );
        assert_eq!(
            map_record(&raw, 0).detail_slug.as_deref(),
            Some("alpha-deep-dive")
        );
        assert_eq!(map_record(&record("B", json!({})), 0).detail_slug, None);
    }

    #[test]
    fn layout_slots_follow_source_order_round_robin() {
        let source = StaticSource::new(vec![
            record("A", json!({})),
            record("B", json!({})),
            record("C", json!({})),
            record("D", json!({})),
        ]);
        let projects = load_projects(&source);
        let slots: Vec<LayoutSlot> = projects.iter().map(|p| p.layout_slot).collect();
        assert_eq!(
            slots,
            vec![
                LayoutSlot::Left,
                LayoutSlot::Middle,
                LayoutSlot::Right,
                LayoutSlot::Left
            ]
        );
        let ids: Vec<u32> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn source_failure_yields_empty_list() {
        assert!(load_projects(&UnreachableSource).is_empty());
    }
}
