use crate::domain::{config::TermLinkConfig, error::{TermLinkError, TermLinkResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> TermLinkResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Create a manager rooted at explicit paths
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files.
    ///
    /// A project file, when present, takes precedence over the global one.
    pub fn load_config(&self) -> TermLinkResult<TermLinkConfig> {
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                debug!("Using project configuration {}", project_path.display());
                return self.load_config_from_path(project_path);
            }
        }

        if self.global_config_path.exists() {
            debug!("Using global configuration {}", self.global_config_path.display());
            return self.load_config_from_path(&self.global_config_path);
        }

        Ok(TermLinkConfig::default())
    }

    /// Path of the file `load_config` would read, if any exists
    pub fn active_config_path(&self) -> Option<&Path> {
        self.project_config_path
            .as_deref()
            .filter(|path| path.exists())
            .or_else(|| Some(self.global_config_path.as_path()).filter(|path| path.exists()))
    }

    /// Get global configuration path
    fn get_global_config_path() -> TermLinkResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| TermLinkError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("termlink").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".termlink").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> TermLinkResult<TermLinkConfig> {
        let content = fs::read_to_string(path).map_err(|e| TermLinkError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| TermLinkError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &TermLinkConfig) -> TermLinkResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TermLinkError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| TermLinkError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| TermLinkError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Write a default global configuration
    pub fn init_global_config(&self) -> TermLinkResult<PathBuf> {
        if self.global_config_path.exists() {
            return Err(TermLinkError::Config {
                message: "Global configuration already exists".to_string(),
            });
        }
        self.save_config_to_path(&self.global_config_path, &TermLinkConfig::default())?;
        Ok(self.global_config_path.clone())
    }

    /// Create default project configuration
    pub fn init_project_config(&self, path: &Path) -> TermLinkResult<PathBuf> {
        let config_file = path.join(".termlink").join("config.toml");

        if config_file.exists() {
            return Err(TermLinkError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        self.save_config_to_path(&config_file, &TermLinkConfig::default())?;

        Ok(config_file)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_give_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_paths(temp_dir.path().join("config.toml"), None);
        let config = manager.load_config().unwrap();

        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.serial.default_baud, 115_200);
        assert!(manager.active_config_path().is_none());
    }

    #[test]
    fn test_project_config_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        fs::write(&global, "[network]\ntelnet_port = 2000\n").unwrap();

        let manager = ConfigManager::with_paths(global.clone(), None);
        assert_eq!(manager.load_config().unwrap().network.telnet_port, 2000);

        let project = manager.init_project_config(temp_dir.path()).unwrap();
        let manager = ConfigManager::with_paths(global, Some(project.clone()));
        assert_eq!(manager.load_config().unwrap().network.telnet_port, 23);
        assert_eq!(manager.active_config_path(), Some(project.as_path()));
    }

    #[test]
    fn test_init_project_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_paths(temp_dir.path().join("global.toml"), None);

        manager.init_project_config(temp_dir.path()).unwrap();

        let config_file = temp_dir.path().join(".termlink").join("config.toml");
        assert!(config_file.exists());

        let content = fs::read_to_string(&config_file).unwrap();
        let config: TermLinkConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.discovery.port, 17222);

        assert!(manager.init_project_config(temp_dir.path()).is_err());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[serial\n").unwrap();

        let manager = ConfigManager::with_paths(path.clone(), None);
        let err = manager.load_config_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
