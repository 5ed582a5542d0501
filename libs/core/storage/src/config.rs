use core_config::{ConfigError, FromEnv, env_or_default};
use std::path::PathBuf;

/// Where uploads are written and how they are addressed.
///
/// Environment variables:
/// - `STORAGE_ROOT` (default `./storage`) - directory on disk
/// - `STORAGE_PUBLIC_URL` (default `/storage`) - URL prefix the files are served under
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub public_url: String,
}

impl StorageConfig {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("./storage", "/storage")
    }
}

impl FromEnv for StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            env_or_default("STORAGE_ROOT", "./storage"),
            env_or_default("STORAGE_PUBLIC_URL", "/storage"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        temp_env::with_vars(
            [("STORAGE_ROOT", None::<&str>), ("STORAGE_PUBLIC_URL", None::<&str>)],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.root, PathBuf::from("./storage"));
                assert_eq!(config.public_url, "/storage");
            },
        );
    }

    #[test]
    fn test_storage_config_custom() {
        temp_env::with_vars(
            [
                ("STORAGE_ROOT", Some("/var/lib/catalog")),
                ("STORAGE_PUBLIC_URL", Some("https://cdn.example.com")),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.root, PathBuf::from("/var/lib/catalog"));
                assert_eq!(config.public_url, "https://cdn.example.com");
            },
        );
    }
}
