//! Configuration loading from TOML files.

use crate::schema::Config;
use finreport_common::{ReportError, Result};
use std::path::Path;
use tracing::info;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "finreport.toml";

/// Loads and validates configuration.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads from the default path, falling back to built-in defaults when
    /// no file exists.
    pub fn load() -> Result<Config> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from_file(DEFAULT_CONFIG_FILE)
        } else {
            info!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Loads from an explicit TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| ReportError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        info!("configuration loaded from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finreport.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[data.synth]\ndays = 7\nseed = 11\n\n[report]\ntop_n = 3"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.data.synth.days, 7);
        assert_eq!(config.data.synth.seed, Some(11));
        assert_eq!(config.report.top_n, 3);
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "not toml at all [[[").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "[report]\ntop_n = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
