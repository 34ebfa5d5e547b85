//! Persisted user configuration
//!
//! Small `KEY="value"` file under the per-user config directory:
//!
//! ```text
//! LAL_OS="macos"
//! OLLAMA_MODEL="llama3.2"
//! ```
//!
//! Reads tolerate a missing file and missing keys (defaults apply).
//! Writes go through write-temp-then-rename so an interrupted save never
//! truncates the file. The struct is constructed once at process start and
//! passed into the components that need it; nothing reads ambient process
//! state.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::types::TargetOs;

const OS_KEY: &str = "LAL_OS";
const MODEL_KEY: &str = "OLLAMA_MODEL";

/// Default local model when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// User configuration, loaded at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub target_os: TargetOs,
    pub ollama_model: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            target_os: TargetOs::default(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

impl UserConfig {
    /// Config file path: `~/.config/lal/config`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("lal").join("config"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file is absent (first run) or a key is missing.
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("Config directory unavailable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit path. Never fails: unreadable or partial
    /// files degrade to defaults key by key.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::default();

        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config, // first run, no file yet
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim() {
                OS_KEY => match value.parse::<TargetOs>() {
                    Ok(os) => config.target_os = os,
                    Err(_) => warn!("Ignoring invalid {} value '{}'", OS_KEY, value),
                },
                MODEL_KEY if !value.is_empty() => config.ollama_model = value.to_string(),
                _ => {}
            }
        }

        config
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path, atomically (write temp, then rename).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = format!(
            "{}=\"{}\"\n{}=\"{}\"\n",
            OS_KEY,
            self.target_os.as_str(),
            MODEL_KEY,
            self.ollama_model
        );

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_file_absent() {
        let dir = tempdir().unwrap();
        let config = UserConfig::load_from(&dir.path().join("missing"));
        assert_eq!(config.target_os, TargetOs::MacOs);
        assert_eq!(config.ollama_model, DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        let original = UserConfig {
            target_os: TargetOs::Linux,
            ollama_model: "qwen2.5-coder:7b".to_string(),
        };
        original.save_to(&path).unwrap();

        let loaded = UserConfig::load_from(&path);
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "LAL_OS=\"windows\"\n").unwrap();

        let config = UserConfig::load_from(&path);
        assert_eq!(config.target_os, TargetOs::Windows);
        assert_eq!(config.ollama_model, DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_invalid_os_value_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "LAL_OS=\"templeos\"\nOLLAMA_MODEL=\"mistral\"\n").unwrap();

        let config = UserConfig::load_from(&path);
        assert_eq!(config.target_os, TargetOs::MacOs);
        assert_eq!(config.ollama_model, "mistral");
    }

    #[test]
    fn test_comments_and_blank_lines_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "# lal config\n\nLAL_OS=\"linux\"\n").unwrap();

        let config = UserConfig::load_from(&path);
        assert_eq!(config.target_os, TargetOs::Linux);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        UserConfig::default().save_to(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
