//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::SharpenConfig;
use crate::Result;
use crate::error::SharpenError;

/// Config file names, in priority order
const CONFIG_FILES: [&str; 3] = [".sharpenrc.toml", ".sharpenrc.json", "sharpen.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Within one directory, `.sharpenrc.toml` wins over `.sharpenrc.json`,
    /// which wins over `sharpen.toml`.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SharpenError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn load_from_file(path: &Path) -> Result<SharpenConfig> {
        let content = fs::read_to_string(path).map_err(|e| SharpenError::io_error(path, e))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|e| {
            SharpenError::config_error(format!(
                "Failed to load config from '{}': {e}",
                path.display()
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the search starts at
    /// `start_dir` (or the current directory) and falls back to the default
    /// configuration when nothing is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<SharpenConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(SharpenError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(SharpenConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{LanguageVersion, SourceCodeKind};
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "sharpen.toml",
            "[parser]\nlanguageVersion = \"10\"\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.parser.language_version, Some(LanguageVersion::CSharp10));
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".sharpenrc.json",
            r#"{
                "parser": { "kind": "script" },
                "files": { "extensions": ["cs"], "exclude": ["generated"] }
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.parser.kind, Some(SourceCodeKind::Script));
        assert!(config.files.is_excluded_dir("generated"));
        assert!(!config.files.is_excluded_dir("obj"));
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "sharpen.toml", "");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "sharpen.toml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();

        create_temp_config(temp_dir.path(), "sharpen.toml", "");
        create_temp_config(temp_dir.path(), ".sharpenrc.json", "{}");
        create_temp_config(temp_dir.path(), ".sharpenrc.toml", "");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".sharpenrc.toml");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(matches!(result, Err(SharpenError::ConfigError { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), "invalid.json", r#"{ invalid json }"#);

        let result = ConfigLoader::load_from_file(&config_path);
        assert!(matches!(result, Err(SharpenError::ConfigError { .. })));
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), ".sharpenrc.toml", "[linter]\nenabled = true\n");

        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_discovered_config_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(
            temp_dir.path(),
            ".sharpenrc.toml",
            "[parser]\nlanguageVersion = \"preview\"\n",
        );

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config.parser.language_version, Some(LanguageVersion::Preview));
    }
}
