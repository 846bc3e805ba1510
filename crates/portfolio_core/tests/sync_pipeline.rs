use portfolio_core::db::open_db_in_memory;
use portfolio_core::{
    load_projects, sync_with_cache, ProjectCacheRepository, ProjectSource, SqliteCacheRepository,
    StaticSource,
};
use serde_json::{json, Value};

fn record(file_name: &str, title: &str) -> Value {
    json!({
        "properties": {
            "Name": { "title": [{ "plain_text": file_name }] },
            "ProjectTitle": { "rich_text": [{ "plain_text": title }] },
            "Description": { "rich_text": [{ "plain_text": "desc" }] },
            "Type": { "select": { "name": "computational" } },
            "RepoLink": { "url": "https://github.com/example/repo" },
            "ProjectImage": {
                "files": [{ "type": "external", "external": { "url": "https://img.example/x.png" } }]
            },
        }
    })
}

fn run_pipeline<S: ProjectSource>(
    cache: &SqliteCacheRepository<'_>,
    source: &S,
) -> Vec<portfolio_core::Project> {
    sync_with_cache(cache, load_projects(source))
}

#[test]
fn first_sync_persists_remote_list_as_is() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCacheRepository::try_new(&conn).unwrap();
    let source = StaticSource::new(vec![record("A", "Alpha"), record("B", "Beta")]);

    let merged = run_pipeline(&cache, &source);

    let names: Vec<&str> = merged.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(cache.load_projects().unwrap().unwrap(), merged);
}

#[test]
fn resync_preserves_local_order_and_appends_new_entries() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCacheRepository::try_new(&conn).unwrap();

    // Seed the cache in user-chosen order A, B.
    let seed = StaticSource::new(vec![record("A", "Alpha"), record("B", "Beta")]);
    run_pipeline(&cache, &seed);

    // Remote now answers B, A, C.
    let remote = StaticSource::new(vec![
        record("B", "Beta"),
        record("A", "Alpha"),
        record("C", "Gamma"),
    ]);
    let merged = run_pipeline(&cache, &remote);

    let names: Vec<&str> = merged.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    let ids: Vec<u32> = merged.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn entry_removed_upstream_is_dropped_on_resync() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCacheRepository::try_new(&conn).unwrap();

    let seed = StaticSource::new(vec![record("A", "Alpha"), record("B", "Beta")]);
    run_pipeline(&cache, &seed);

    let remote = StaticSource::new(vec![record("B", "Beta")]);
    let merged = run_pipeline(&cache, &remote);

    let names: Vec<&str> = merged.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
    assert_eq!(merged[0].id, 0);
}

#[test]
fn pipeline_is_idempotent_for_unchanged_remote() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCacheRepository::try_new(&conn).unwrap();
    let source = StaticSource::new(vec![
        record("A", "Alpha"),
        record("B", "Beta"),
        record("C", "Gamma"),
    ]);

    let first = run_pipeline(&cache, &source);
    let second = run_pipeline(&cache, &source);

    assert_eq!(first, second);
    assert_eq!(cache.load_projects().unwrap().unwrap(), second);
}

#[test]
fn resync_refreshes_content_of_matched_entries() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCacheRepository::try_new(&conn).unwrap();

    let seed = StaticSource::new(vec![record("A", "Old Title")]);
    run_pipeline(&cache, &seed);

    let remote = StaticSource::new(vec![record("A", "New Title")]);
    let merged = run_pipeline(&cache, &remote);

    assert_eq!(merged[0].title, "New Title");
}
