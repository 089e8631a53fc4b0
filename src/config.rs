use crate::marker::MarkerPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no config path is given.
pub const CONFIG_ENV: &str = "SCENE_MARKERS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URI of the property holding the active story identifier.
    pub story_uri: String,
    /// Request id of the info-icon entry in the fetched-data store.
    pub info_icon_key: String,
    /// Identifier of the root owner whose children are scene nodes.
    pub scene_root: String,
    /// Emit stop commands for tracked properties that vanish between updates.
    pub unsubscribe_removed: bool,
    pub log_level: String,
    pub policy: MarkerPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            story_uri: "Story.Identifier".to_string(),
            info_icon_key: "infoIcons".to_string(),
            scene_root: "Scene".to_string(),
            unsubscribe_removed: true,
            log_level: "info".to_string(),
            policy: MarkerPolicy::default(),
        }
    }
}

impl Config {
    /// Resolve the config file by priority:
    /// 1. Explicit path
    /// 2. `SCENE_MARKERS_CONFIG` environment variable
    /// 3. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load_from(path);
        }
        if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(&PathBuf::from(env_path));
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.policy.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = Config::from_toml("story_uri = \"Dashboard.Story\"\n[policy]\nmax_size = 4.0\n")
            .unwrap();
        assert_eq!(config.story_uri, "Dashboard.Story");
        assert_eq!(config.info_icon_key, "infoIcons");
        assert!(config.unsubscribe_removed);
        assert_eq!(config.policy.max_size, 4.0);
        assert_eq!(config.policy.min_size, 1.5);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(Config::from_toml("story_uri = ["), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_inverted_size_range() {
        let err = Config::from_toml("[policy]\nmin_size = 4.0\nmax_size = 2.0\n").unwrap_err();
        assert!(matches!(err, Error::Policy(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "unsubscribe_removed = false").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.unsubscribe_removed);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load_from(Path::new("/nonexistent/scene-markers.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
