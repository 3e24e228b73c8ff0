use std::path::PathBuf;

use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_PROFILE_LIST_PATH: &str =
    r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion\ProfileList";
pub const DEFAULT_PROFILE_GUID_PATH: &str =
    r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion\ProfileGuid";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Subtree holding one key per registered profile.
    pub profile_list_path: String,
    /// Subtree holding the correlated per-profile Guid keys.
    pub profile_guid_path: String,
    /// Where backup exports land; process temp dir when unset.
    pub backup_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<AppConfig, ConfigError> {
        // Defaults target the live subtrees; a 'Config.toml' next to the
        // binary overrides them when present
        let builder = Config::builder()
            .set_default("profile_list_path", DEFAULT_PROFILE_LIST_PATH)?
            .set_default("profile_guid_path", DEFAULT_PROFILE_GUID_PATH)?
            .add_source(ConfigFile::with_name("Config").required(false))
            .build()?;

        builder.try_deserialize::<AppConfig>()
    }

    pub fn backup_destination(&self) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => PathBuf::from(dir),
            None => std::env::temp_dir(),
        }
    }
}
