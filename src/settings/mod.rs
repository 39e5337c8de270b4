//! Settings module for proxy-record
//!
//! Codec configuration loaded from TOML or YAML files

pub mod settings_struct;

// Re-export settings struct and functions
pub use settings_struct::{
    update_settings_from_content, update_settings_from_file, CodecSettings, Settings,
    SettingsError,
};
