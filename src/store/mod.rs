//! Local joke archive backed by SQLite.
//!
//! Two tables: `categories` (seeded once from the remote category list) and
//! `jokes` (one row per archived joke, keyed by the remote id and linked to
//! its category). The store is owned by the event loop and only ever touched
//! from that thread, so the connection is not wrapped in a lock.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

/// Format of the `created_at` column, e.g. "08-25-2026 14:05"
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M";

/// An archived joke row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeRecord {
  pub id: String,
  pub text: String,
  pub category: String,
  /// Local fetch time, formatted with [`TIMESTAMP_FORMAT`]
  pub created_at: String,
}

/// A category row with its archived joke count
#[derive(Debug, Clone)]
pub struct CategoryCount {
  pub name: String,
  pub jokes: i64,
}

/// Schema for the archive tables. Idempotent; run on every open.
const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS jokes (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    category TEXT NOT NULL REFERENCES categories(name) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jokes_category ON jokes(category);
"#;

/// Embedded database holding the joke archive
pub struct JokeStore {
  conn: Connection,
}

impl JokeStore {
  /// Open or create the archive at the default location
  pub fn open_default() -> Result<Self> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create archive directory: {}", e))?;
    }

    Self::open(&path)
  }

  /// Open or create the archive at a specific path
  pub fn open(path: &Path) -> Result<Self> {
    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open archive database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// In-memory archive, used by tests
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;

    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self { conn };
    store.run_migrations()?;
    Ok(store)
  }

  /// Get the default database path
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("jokebox").join("archive.db"))
  }

  /// Run database migrations
  fn run_migrations(&self) -> Result<()> {
    self
      .conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
    Ok(())
  }

  // ==========================================================================
  // Categories
  // ==========================================================================

  /// All category names, sorted
  pub fn categories(&self) -> Result<Vec<String>> {
    let mut stmt = self
      .conn
      .prepare("SELECT name FROM categories ORDER BY name")
      .map_err(|e| eyre!("Failed to prepare category query: {}", e))?;

    let names = stmt
      .query_map([], |row| row.get(0))
      .map_err(|e| eyre!("Failed to query categories: {}", e))?
      .collect::<rusqlite::Result<Vec<String>>>()
      .map_err(|e| eyre!("Failed to read category row: {}", e))?;

    Ok(names)
  }

  /// Whether the category table holds at least one row.
  /// Seeding from the remote list is only requested when it does not.
  pub fn has_categories(&self) -> Result<bool> {
    let mut stmt = self
      .conn
      .prepare("SELECT 1 FROM categories LIMIT 1")
      .map_err(|e| eyre!("Failed to prepare category check: {}", e))?;

    let exists = stmt
      .exists([])
      .map_err(|e| eyre!("Failed to check categories: {}", e))?;

    Ok(exists)
  }

  pub fn category_exists(&self, name: &str) -> Result<bool> {
    let mut stmt = self
      .conn
      .prepare("SELECT 1 FROM categories WHERE name = ?1")
      .map_err(|e| eyre!("Failed to prepare category check: {}", e))?;

    let exists = stmt
      .exists(params![name])
      .map_err(|e| eyre!("Failed to check category {}: {}", name, e))?;

    Ok(exists)
  }

  /// Insert a category, keeping an existing row untouched
  pub fn insert_category(&self, name: &str) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
        params![name],
      )
      .map_err(|e| eyre!("Failed to insert category {}: {}", name, e))?;

    Ok(())
  }

  /// Insert every name from the remote category list, skipping names already
  /// present. Returns how many rows were actually added.
  pub fn seed_categories(&self, names: &[String]) -> Result<usize> {
    let mut added = 0;
    for name in names {
      added += self
        .conn
        .execute(
          "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
          params![name],
        )
        .map_err(|e| eyre!("Failed to seed category {}: {}", name, e))?;
    }
    Ok(added)
  }

  /// All categories with their archived joke counts, sorted by name
  pub fn category_counts(&self) -> Result<Vec<CategoryCount>> {
    let mut stmt = self
      .conn
      .prepare(
        "SELECT c.name, COUNT(j.id) FROM categories c
         LEFT JOIN jokes j ON j.category = c.name
         GROUP BY c.name
         ORDER BY c.name",
      )
      .map_err(|e| eyre!("Failed to prepare count query: {}", e))?;

    let counts = stmt
      .query_map([], |row| {
        Ok(CategoryCount {
          name: row.get(0)?,
          jokes: row.get(1)?,
        })
      })
      .map_err(|e| eyre!("Failed to query category counts: {}", e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read count row: {}", e))?;

    Ok(counts)
  }

  // ==========================================================================
  // Jokes
  // ==========================================================================

  pub fn joke_exists(&self, id: &str) -> Result<bool> {
    let mut stmt = self
      .conn
      .prepare("SELECT 1 FROM jokes WHERE id = ?1")
      .map_err(|e| eyre!("Failed to prepare joke check: {}", e))?;

    let exists = stmt
      .exists(params![id])
      .map_err(|e| eyre!("Failed to check joke {}: {}", id, e))?;

    Ok(exists)
  }

  /// Insert a joke row. The category row must already exist; the archive
  /// flow creates it first. A duplicate id is an error rather than an
  /// overwrite.
  pub fn insert_joke(&self, record: &JokeRecord) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO jokes (id, text, category, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![record.id, record.text, record.category, record.created_at],
      )
      .map_err(|e| eyre!("Failed to insert joke {}: {}", record.id, e))?;

    Ok(())
  }

  /// All archived jokes, newest first
  pub fn jokes(&self) -> Result<Vec<JokeRecord>> {
    let mut stmt = self
      .conn
      .prepare(
        "SELECT id, text, category, created_at FROM jokes ORDER BY rowid DESC",
      )
      .map_err(|e| eyre!("Failed to prepare joke query: {}", e))?;

    let records = stmt
      .query_map([], row_to_record)
      .map_err(|e| eyre!("Failed to query jokes: {}", e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read joke row: {}", e))?;

    Ok(records)
  }

  /// Archived jokes for one category, in insertion order
  pub fn jokes_by_category(&self, category: &str) -> Result<Vec<JokeRecord>> {
    let mut stmt = self
      .conn
      .prepare(
        "SELECT id, text, category, created_at FROM jokes
         WHERE category = ?1 ORDER BY rowid",
      )
      .map_err(|e| eyre!("Failed to prepare joke query: {}", e))?;

    let records = stmt
      .query_map(params![category], row_to_record)
      .map_err(|e| eyre!("Failed to query jokes for {}: {}", category, e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read joke row: {}", e))?;

    Ok(records)
  }

  // ==========================================================================
  // Wipe
  // ==========================================================================

  /// Delete every joke and every category. Categories are reseeded by the
  /// caller afterwards.
  pub fn delete_all(&self) -> Result<()> {
    self
      .conn
      .execute_batch("BEGIN; DELETE FROM jokes; DELETE FROM categories; COMMIT;")
      .map_err(|e| eyre!("Failed to delete archive contents: {}", e))?;

    Ok(())
  }
}

fn row_to_record(row: &Row) -> rusqlite::Result<JokeRecord> {
  Ok(JokeRecord {
    id: row.get(0)?,
    text: row.get(1)?,
    category: row.get(2)?,
    created_at: row.get(3)?,
  })
}
