use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

/// File name of the database created in the home directory when nothing else is configured
pub const DEFAULT_DATABASE_FILE: &str = "products.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductsConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("products.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(DEFAULT_DATABASE_FILE)
}

/// `~/products.db`
pub fn default_database_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| default_database_path_in(&home))
        .ok_or_else(|| Error::Config("cannot determine home directory; pass --db".to_string()))
}

pub fn load_config(path: Option<&Path>) -> Result<Option<ProductsConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ProductsConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Pick the database path: explicit flag, then config file, then the home default.
pub fn resolve_database_path(
    explicit: Option<PathBuf>,
    config: Option<&ProductsConfig>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(db) = config.and_then(|c| c.database.as_deref()) {
        return Ok(PathBuf::from(db));
    }
    default_database_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.toml");
        std::fs::write(&path, "database = \"/tmp/shop.db\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("/tmp/shop.db"));
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.toml");
        std::fs::write(&path, "database = [").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(Error::Toml(_))));
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = ProductsConfig {
            database: Some("from-config.db".to_string()),
        };
        let path = resolve_database_path(Some(PathBuf::from("flag.db")), Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("flag.db"));
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let config = ProductsConfig {
            database: Some("from-config.db".to_string()),
        };
        let path = resolve_database_path(None, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("from-config.db"));
    }

    #[test]
    fn test_default_path_in_base() {
        let path = default_database_path_in(Path::new("/home/user"));
        assert_eq!(path, PathBuf::from("/home/user/products.db"));
    }
}
