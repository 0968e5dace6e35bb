//! Broker definition loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::config::schema::Configuration;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for broker definition loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read modification time of {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config file {}: {}", .path.display(), join_errors(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read the raw bytes of a definition file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Modification time of a definition file.
pub fn modified_at(path: &Path) -> Result<SystemTime, ConfigError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| ConfigError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse and validate definition bytes.
///
/// `path` is only used for error context.
pub fn parse_config(bytes: &[u8], path: &Path) -> Result<Configuration, ConfigError> {
    let config: Configuration = serde_yaml::from_slice(bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&config).map_err(|errors| ConfigError::Invalid {
        path: path.to_path_buf(),
        errors,
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_missing_file() {
        let err = read_bytes(Path::new("./does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_parse_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fn main() {{ println!(\"not yaml\"); }}").unwrap();

        let bytes = read_bytes(file.path()).unwrap();
        let err = parse_config(&bytes, file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_definition_lists_problems() {
        let yaml = b"server:\n  basicauth:\n    username: ''\n    password: ''\n";
        let err = parse_config(yaml, Path::new("inline.yaml")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("username must not be blank"));
        assert!(message.contains("password must not be blank"));
    }

    #[test]
    fn test_modified_at_missing_file() {
        let err = modified_at(Path::new("./does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Stat { .. }));
    }
}
