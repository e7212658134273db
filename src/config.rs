use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::CacheOptions;
use crate::table::SortOrder;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for the header (defaults to the API host)
  pub title: Option<String>,
  pub tables: TablesConfig,
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Per-request timeout
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout_secs: 10,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
  pub users: TableConfig,
  pub posts: TableConfig,
}

impl Default for TablesConfig {
  fn default() -> Self {
    Self {
      users: TableConfig {
        page_size: 10,
        sort: SortOrder::Asc,
      },
      posts: TableConfig {
        page_size: 20,
        sort: SortOrder::Asc,
      },
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
  pub page_size: usize,
  /// Initial sort direction of the id column
  #[serde(default)]
  pub sort: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Restore a deleted row when the DELETE request fails
  pub rollback_failed_deletes: bool,
}

impl From<CacheConfig> for CacheOptions {
  fn from(config: CacheConfig) -> Self {
    CacheOptions {
      rollback_failed_deletes: config.rollback_failed_deletes,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./upcon.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/upcon/config.yaml
  ///
  /// Every field has a default, so running without any file is fine.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("upcon.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("upcon").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to YAML null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    if config.tables.users.page_size == 0 || config.tables.posts.page_size == 0 {
      return Err(eyre!("page_size must be at least 1"));
    }
    Ok(config)
  }

  /// Header title: the configured one, else the API host.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    url::Url::parse(&self.api.base_url)
      .ok()
      .and_then(|u| u.host_str().map(str::to_string))
      .unwrap_or_else(|| self.api.base_url.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.tables.users.page_size, 10);
    assert_eq!(config.tables.posts.page_size, 20);
    assert!(!config.cache.rollback_failed_deletes);
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.tables.posts.page_size, 20);
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let yaml = r#"
api:
  base_url: http://localhost:3000
tables:
  posts:
    page_size: 5
    sort: desc
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.tables.posts.page_size, 5);
    assert_eq!(config.tables.posts.sort, SortOrder::Desc);
    assert_eq!(config.tables.users.page_size, 10);
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    let yaml = "tables:\n  users:\n    page_size: 0\n";
    assert!(Config::parse(yaml).is_err());
  }

  #[test]
  fn test_cache_options_from_config() {
    let config = Config::parse("cache:\n  rollback_failed_deletes: true\n").unwrap();
    let options: CacheOptions = config.cache.into();
    assert!(options.rollback_failed_deletes);
  }

  #[test]
  fn test_display_title() {
    let mut config = Config::default();
    assert_eq!(config.display_title(), "jsonplaceholder.typicode.com");

    config.title = Some("Admin".to_string());
    assert_eq!(config.display_title(), "Admin");
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "title: Console").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.title.as_deref(), Some("Console"));
  }

  #[test]
  fn test_load_missing_explicit_path() {
    let err = Config::load(Some(Path::new("/nonexistent/upcon.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
