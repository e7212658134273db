//! Persisted user preferences (theme and language).

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::i18n::Language;
use crate::ui::Theme;

const THEME_KEY: &str = "theme";
const LANGUAGE_KEY: &str = "language";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Directory for the preferences database and log files.
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("upcon"))
}

/// Key/value preferences in SQLite.
pub struct PreferenceStore {
  conn: Mutex<Connection>,
}

impl PreferenceStore {
  /// Open or create the store at the default location.
  pub fn open_default() -> Result<Self> {
    Self::open(&data_dir()?.join("prefs.db"))
  }

  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create data directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open preferences at {}: {}", path.display(), e))?;
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read preference {}: {}", key, e))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let now: DateTime<Utc> = Utc::now();
    conn
      .execute(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now.to_rfc3339()],
      )
      .map_err(|e| eyre!("Failed to write preference {}: {}", key, e))?;

    debug!(key, value, "preference saved");
    Ok(())
  }

  /// Stored theme. Unknown values are treated as unset.
  pub fn theme(&self) -> Result<Option<Theme>> {
    Ok(self.get(THEME_KEY)?.and_then(|v| v.parse().ok()))
  }

  pub fn set_theme(&self, theme: Theme) -> Result<()> {
    self.set(THEME_KEY, theme.as_str())
  }

  /// Stored language. Unknown values are treated as unset.
  pub fn language(&self) -> Result<Option<Language>> {
    Ok(self.get(LANGUAGE_KEY)?.and_then(|v| v.parse().ok()))
  }

  pub fn set_language(&self, language: Language) -> Result<()> {
    self.set(LANGUAGE_KEY, language.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn store() -> (TempDir, PreferenceStore) {
    let dir = TempDir::new().unwrap();
    let store = PreferenceStore::open(&dir.path().join("nested").join("prefs.db")).unwrap();
    (dir, store)
  }

  #[test]
  fn test_empty_store() {
    let (_dir, store) = store();
    assert_eq!(store.theme().unwrap(), None);
    assert_eq!(store.language().unwrap(), None);
  }

  #[test]
  fn test_round_trip_and_overwrite() {
    let (_dir, store) = store();
    store.set_theme(Theme::Dark).unwrap();
    store.set_language(Language::En).unwrap();
    assert_eq!(store.theme().unwrap(), Some(Theme::Dark));
    assert_eq!(store.language().unwrap(), Some(Language::En));

    store.set_theme(Theme::Light).unwrap();
    assert_eq!(store.theme().unwrap(), Some(Theme::Light));
  }

  #[test]
  fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.db");
    PreferenceStore::open(&path)
      .unwrap()
      .set_language(Language::En)
      .unwrap();

    let reopened = PreferenceStore::open(&path).unwrap();
    assert_eq!(reopened.language().unwrap(), Some(Language::En));
  }

  #[test]
  fn test_unknown_value_reads_as_unset() {
    let (_dir, store) = store();
    store.set(THEME_KEY, "sepia").unwrap();
    assert_eq!(store.theme().unwrap(), None);
  }
}
