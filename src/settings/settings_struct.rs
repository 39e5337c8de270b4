use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{TextCodec, TextFormat, UnknownKindPolicy};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Settings lock poisoned")]
    LockPoisoned,
}

/// Codec behaviour, read from the `codec` section of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// What to do with unrecognised `kind` tags in text documents
    pub unknown_kind: UnknownKindPolicy,
    /// Default syntax for text documents
    pub text_format: TextFormat,
}

/// Settings structure to hold global configuration
///
/// ```toml
/// [codec]
/// unknown_kind = "strict"
/// text_format = "yaml"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub codec: CodecSettings,
    /// Path the settings were loaded from, empty for defaults
    #[serde(skip)]
    pub pref_path: String,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SettingsError> {
        // An empty YAML document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse settings as TOML, falling back to YAML when TOML rejects the content.
    pub fn from_content(content: &str) -> Result<Self, SettingsError> {
        let toml_err = match Self::from_toml_str(content) {
            Ok(settings) => return Ok(settings),
            Err(err) => err,
        };
        debug!("Content is not TOML settings ({}), trying YAML", toml_err);

        match Self::from_yaml_str(content) {
            Ok(settings) => Ok(settings),
            // Report the error of the syntax the content was written in.
            Err(yaml_err) if looks_like_yaml(content) => Err(yaml_err),
            Err(_) => Err(toml_err),
        }
    }

    /// Load settings from a file; the extension picks the parser when it is known.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(TextFormat::from_extension);

        let mut settings = match ext {
            Some(TextFormat::Toml) => Self::from_toml_str(&content)?,
            Some(TextFormat::Yaml) => Self::from_yaml_str(&content)?,
            _ => Self::from_content(&content)?,
        };
        settings.pref_path = path.display().to_string();
        Ok(settings)
    }

    /// Text codec configured from these settings
    pub fn text_codec(&self) -> TextCodec {
        TextCodec::new(self.codec.text_format, self.codec.unknown_kind)
    }

    /// Current global settings
    pub fn current() -> Arc<Settings> {
        match global.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

/// Whether a non-comment line opens the `codec` section as a YAML mapping key.
fn looks_like_yaml(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .any(|line| !line.starts_with('#') && line.starts_with("codec:"))
}

// Global settings instance
#[allow(non_upper_case_globals)]
static global: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

fn replace_global(settings: Settings) -> Result<(), SettingsError> {
    let mut guard = global.write().map_err(|_| SettingsError::LockPoisoned)?;
    *guard = Arc::new(settings);
    Ok(())
}

/// Replace the global settings with the contents of `path`
pub fn update_settings_from_file(path: &str) -> Result<(), SettingsError> {
    let settings = Settings::from_file(path)?;
    info!(
        "Loaded settings from {}: unknown_kind={}, text_format={}",
        settings.pref_path,
        settings.codec.unknown_kind.as_str(),
        settings.codec.text_format.as_str()
    );
    replace_global(settings)
}

/// Replace the global settings with parsed `content`
pub fn update_settings_from_content(content: &str) -> Result<(), SettingsError> {
    replace_global(Settings::from_content(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.codec.unknown_kind, UnknownKindPolicy::Lenient);
        assert_eq!(settings.codec.text_format, TextFormat::Json);
        assert_eq!(settings.text_codec(), TextCodec::default());
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str("[codec]\nunknown_kind = \"strict\"\n").unwrap();
        assert_eq!(settings.codec.unknown_kind, UnknownKindPolicy::Strict);
        assert_eq!(settings.codec.text_format, TextFormat::Json);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(Settings::from_content("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml_str("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_looks_like_yaml() {
        assert!(looks_like_yaml("codec:\n  unknown_kind: strict\n"));
        assert!(!looks_like_yaml("# codec: notes\n[codec]\n"));
        assert!(!looks_like_yaml("[codec]\ntext_format = \"json\"\n"));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = Settings::from_toml_str("[codec]\nunknown_kind = \"sometimes\"\n");
        assert!(matches!(result, Err(SettingsError::TomlError(_))));
    }
}
