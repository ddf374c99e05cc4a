//! Connection settings stored in `~/.mingle_metrics/config.json`.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MingleError, Result};

const CONFIG_DIR: &str = ".mingle_metrics";
const CONFIG_FILE: &str = "config.json";

/// Location of the configuration file in the user's home directory.
///
/// # Errors
///
/// Returns [`MingleError::ConfigMissing`] if the home directory cannot be
/// determined.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        MingleError::ConfigMissing("unable to locate the current user's home directory".to_string())
    })?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Credentials and target project for the Mingle API.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    /// HMAC access key id.
    #[serde(rename = "Login", default)]
    pub login: String,
    /// HMAC secret access key.
    #[serde(rename = "Secret", default)]
    pub secret: String,
    /// Base URL of the Mingle instance.
    #[serde(rename = "Endpoint", default)]
    pub endpoint: String,
    /// Project identifier.
    #[serde(rename = "ProjectID", default)]
    pub project_id: String,
}

impl fmt::Debug for SystemConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemConfiguration")
            .field("login", &self.login)
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl SystemConfiguration {
    /// Read the configuration at `path`.
    ///
    /// A missing file is not an error and yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file yet");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(MingleError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| MingleError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A configuration with only `key` set.
    pub fn with(key: ConfigKey, value: &str) -> Self {
        let mut config = Self::default();
        *config.field_mut(key) = value.to_string();
        config
    }

    /// Overwrite fields with the non-empty fields of `other`.
    pub fn merge(&mut self, other: Self) {
        for key in ConfigKey::ALL {
            let value = other.get(key);
            if !value.is_empty() {
                *self.field_mut(key) = value.to_string();
            }
        }
    }

    /// Value of a single field.
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::Login => &self.login,
            ConfigKey::Secret => &self.secret,
            ConfigKey::Endpoint => &self.endpoint,
            ConfigKey::ProjectId => &self.project_id,
        }
    }

    fn field_mut(&mut self, key: ConfigKey) -> &mut String {
        match key {
            ConfigKey::Login => &mut self.login,
            ConfigKey::Secret => &mut self.secret,
            ConfigKey::Endpoint => &mut self.endpoint,
            ConfigKey::ProjectId => &mut self.project_id,
        }
    }

    /// Field names and values in display order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        ConfigKey::ALL.map(|key| (key.as_str(), self.get(key)))
    }

    /// Names of the fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_empty())
            .map(ConfigKey::as_str)
            .collect()
    }
}

/// A configuration field that can be set from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Login,
    Secret,
    Endpoint,
    ProjectId,
}

impl ConfigKey {
    /// All keys in display order.
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Login,
        ConfigKey::Secret,
        ConfigKey::Endpoint,
        ConfigKey::ProjectId,
    ];

    /// Name as written in the configuration file.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Login => "Login",
            ConfigKey::Secret => "Secret",
            ConfigKey::Endpoint => "Endpoint",
            ConfigKey::ProjectId => "ProjectID",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConfigKey(pub String);

impl fmt::Display for UnknownConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown configuration key '{}'", self.0)
    }
}

impl std::error::Error for UnknownConfigKey {}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    /// Keys match case-sensitively.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownConfigKey(s.to_string()))
    }
}

/// Merge `update` into the configuration at `path` and write it back.
///
/// Returns the configuration as written.
///
/// # Errors
///
/// Returns an error if the existing file is corrupt or the file cannot be
/// written.
pub fn save(path: &Path, update: SystemConfiguration) -> Result<SystemConfiguration> {
    let mut config = SystemConfiguration::load(path)?;
    config.merge(update);

    let io_err = |source| MingleError::ConfigIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        create_private_dir(dir).map_err(io_err)?;
    }

    let mut data = serde_json::to_vec_pretty(&config).map_err(|source| MingleError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    data.push(b'\n');

    let mut file = open_private_file(path).map_err(io_err)?;
    file.write_all(&data).map_err(io_err)?;

    tracing::info!(path = %path.display(), "saved configuration");
    Ok(config)
}

/// Set one field of the configuration at `path`.
///
/// Returns `Ok(None)` without touching the file when `key` is not a known
/// configuration key.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or written.
pub fn set(path: &Path, key: &str, value: &str) -> Result<Option<SystemConfiguration>> {
    let Ok(key) = key.parse::<ConfigKey>() else {
        tracing::warn!(key, "ignoring unknown configuration key");
        return Ok(None);
    };
    save(path, SystemConfiguration::with(key, value)).map(Some)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_private_file(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const VALID_JSON: &str = r#"
{
	"Login": "my_login",
	"ProjectID": "my_id",
	"Secret": "my_secret",
	"Endpoint": "my_endpoint"
}
"#;

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let config = SystemConfiguration::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, SystemConfiguration::default());
    }

    #[test]
    fn test_load_parses_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, VALID_JSON).unwrap();

        let config = SystemConfiguration::load(&path).unwrap();
        assert_eq!(config.login, "my_login");
        assert_eq!(config.project_id, "my_id");
        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.endpoint, "my_endpoint");
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"Login": "only_login"}"#).unwrap();

        let config = SystemConfiguration::load(&path).unwrap();
        assert_eq!(config.login, "only_login");
        assert!(config.endpoint.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SystemConfiguration::load(&path).unwrap_err();
        assert!(matches!(err, MingleError::ConfigParse { .. }));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a file
        let err = SystemConfiguration::load(dir.path()).unwrap_err();
        assert!(matches!(err, MingleError::ConfigIo { .. }));
    }

    #[test]
    fn test_set_endpoint_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, VALID_JSON).unwrap();

        let saved = set(&path, "Endpoint", "https://x.example.com").unwrap();
        assert!(saved.is_some());

        let config = SystemConfiguration::load(&path).unwrap();
        assert_eq!(config.endpoint, "https://x.example.com");
        assert_eq!(config.login, "my_login");
        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.project_id, "my_id");
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".mingle_metrics").join("config.json");

        set(&path, "Login", "new_login").unwrap();

        let config = SystemConfiguration::load(&path).unwrap();
        assert_eq!(config.login, "new_login");
        assert!(config.secret.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        set(&path, "Secret", "s3cret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_unknown_key_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, VALID_JSON).unwrap();

        let result = set(&path, "login", "lowercase").unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), VALID_JSON);
    }

    #[test]
    fn test_unknown_key_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(set(&path, "Password", "x").unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_value_does_not_clear_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, VALID_JSON).unwrap();

        let saved = set(&path, "Login", "").unwrap().unwrap();
        assert_eq!(saved.login, "my_login");
    }

    #[test]
    fn test_config_key_parse_is_case_sensitive() {
        assert_eq!("ProjectID".parse::<ConfigKey>(), Ok(ConfigKey::ProjectId));
        assert_eq!(
            "ProjectId".parse::<ConfigKey>(),
            Err(UnknownConfigKey("ProjectId".to_string()))
        );
    }

    #[test]
    fn test_entries_in_field_order() {
        let config = SystemConfiguration::with(ConfigKey::Endpoint, "https://x.example.com");
        let names: Vec<&str> = config.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["Login", "Secret", "Endpoint", "ProjectID"]);
        assert_eq!(config.entries()[2].1, "https://x.example.com");
    }

    #[test]
    fn test_missing_fields() {
        let mut config = SystemConfiguration::with(ConfigKey::Login, "l");
        config.merge(SystemConfiguration::with(ConfigKey::ProjectId, "p"));
        assert_eq!(config.missing_fields(), vec!["Secret", "Endpoint"]);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = SystemConfiguration::with(ConfigKey::Secret, "hidden-value");
        assert!(!format!("{config:?}").contains("hidden-value"));
    }
}
