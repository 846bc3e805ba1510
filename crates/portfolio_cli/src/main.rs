//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `portfolio_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use portfolio_core::db::open_db_in_memory;
use portfolio_core::{ProjectService, SqliteCacheRepository, StaticSource};

fn main() {
    println!("portfolio_core ping={}", portfolio_core::ping());
    println!("portfolio_core version={}", portfolio_core::core_version());

    // Empty source + empty cache: the store settles on the built-in defaults.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cache bootstrap failed: {err}");
            std::process::exit(1);
        }
    };
    let cache = match SqliteCacheRepository::try_new(&conn) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("cache store unavailable: {err}");
            std::process::exit(1);
        }
    };

    let mut store = ProjectService::new(cache, StaticSource::new(Vec::new()));
    store.initialize();
    for project in store.projects() {
        println!("{} {} [{}]", project.id, project.file_name, project.title);
    }
}
