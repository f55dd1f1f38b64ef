//! Shared store configuration module for `HabitBuddy`.
//!
//! This module locates the `SQLite` file that holds every habit, completion and
//! preference, opens it, and creates all tables from the entity definitions. Tables
//! are generated with `SeaORM`'s `Schema::create_table_from_entity` and `IF NOT EXISTS`,
//! so opening an existing store is idempotent. File-backed stores are switched to WAL
//! journal mode so another process can read the file while this one writes.

use crate::config::settings::StoreConfig;
use crate::entities::{Completion, Habit, Preference};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable that overrides the configured store location
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Resolves the store URL: `DATABASE_URL` if set, otherwise the configured file path.
///
/// File paths are opened with `mode=rwc` so the store is created on first run.
#[must_use]
pub fn get_database_url(store: &StoreConfig) -> String {
    std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| sqlite_url_for_path(&store.path))
}

/// Builds a `sqlite://` URL for a file path, creating it if missing.
#[must_use]
pub fn sqlite_url_for_path(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Opens the shared store and makes sure all tables exist.
///
/// The parent directory of a file-backed store is created first, taken from the
/// resolved URL so a `DATABASE_URL` override is honored. Any failure here is
/// meant to abort startup: without the store there is nothing the bot can do.
#[instrument(skip(store))]
pub async fn init_store(store: &StoreConfig) -> Result<DatabaseConnection> {
    open_store(&get_database_url(store)).await
}

/// Opens the store at `url`, creating the file's directory and all tables as needed.
pub async fn open_store(url: &str) -> Result<DatabaseConnection> {
    if let Some(file) = store_file_path(url) {
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!("Opening shared store at {}", url);
    let db = Database::connect(url).await?;

    if !is_memory_url(url) {
        db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
    }

    info!("Shared store opened. Ensuring tables are created...");
    create_tables(&db).await?;
    Ok(db)
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// File path of a file-backed `SQLite` URL; `None` for in-memory stores.
fn store_file_path(url: &str) -> Option<PathBuf> {
    if is_memory_url(url) {
        return None;
    }
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Creates all tables (habits, completions, preferences) if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table_if_missing(db, &schema, Habit).await?;
    create_table_if_missing(db, &schema, Completion).await?;
    create_table_if_missing(db, &schema, Preference).await?;

    Ok(())
}

async fn create_table_if_missing<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
