use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How new list item ids are generated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum IdStyle {
    /// Random v4 UUIDs
    #[default]
    Uuid,
    /// `<prefix>00`, `<prefix>01`, ... Readable, but only unique per session
    Sequential { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outline opened when the CLI is started without a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_outline: Option<PathBuf>,
    /// Spaces per indent level when rendering
    pub indent_width: usize,
    pub ids: IdStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_outline: None,
            indent_width: 2,
            ids: IdStyle::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the outline path
        config.default_outline = config
            .default_outline
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Load the config at `config_path`, writing the defaults there first
    /// when no file exists yet
    pub fn load_or_create_at<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if let Some(config) = Self::load_from_path(config_path)? {
            return Ok(config);
        }

        let config = Self::default();
        config.save_to_path(config_path)?;
        Ok(config)
    }

    pub fn load_or_create() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        Self::load_or_create_at(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blocklist");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/blocklist/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.ids, IdStyle::Uuid);
    }

    #[test]
    fn test_sequential_ids_in_toml() {
        let config_content = r#"
indent_width = 4

[ids]
style = "sequential"
prefix = "n"
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(
            config.ids,
            IdStyle::Sequential {
                prefix: "n".to_string()
            }
        );
        assert_eq!(config.indent_width, 4);
        assert!(config.default_outline.is_none());
    }

    #[test]
    fn test_unknown_id_style_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[ids]\nstyle = \"snowflake\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_outline_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("BLOCKLIST_TEST_ROOT", "/custom/outlines");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "default_outline = \"$BLOCKLIST_TEST_ROOT/todo.outline\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.default_outline,
            Some(PathBuf::from("/custom/outlines/todo.outline"))
        );
        unsafe {
            env::remove_var("BLOCKLIST_TEST_ROOT");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            default_outline: Some(PathBuf::from("/tmp/todo.outline")),
            indent_width: 3,
            ids: IdStyle::Sequential {
                prefix: "x".to_string(),
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("blocklist").join("config.toml");

        let created = Config::load_or_create_at(&config_file).unwrap();
        assert_eq!(created, Config::default());
        assert!(config_file.exists());

        std::fs::write(&config_file, "indent_width = 4\n").unwrap();
        let reloaded = Config::load_or_create_at(&config_file).unwrap();
        assert_eq!(reloaded.indent_width, 4);
    }
}
