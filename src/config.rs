//! Settings of the command line tool and the HTTP interface.

use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open configuration file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings read from an optional JSON configuration file.
/// Command line options take precedence over values given here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory with `<ID>.json` country files; the built-in data is used if absent
    pub data_dir: Option<PathBuf>,
    pub json_folder: PathBuf,
    pub csv_folder: PathBuf,
    pub bind: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: None,
            json_folder: PathBuf::from("json"),
            csv_folder: PathBuf::from("csv"),
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the configuration file if one is given, use defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        match path {
            Some(path) => Settings::from_file(path),
            None => Ok(Settings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.data_dir, None);
        assert_eq!(settings.json_folder, PathBuf::from("json"));
        assert_eq!(settings.csv_folder, PathBuf::from("csv"));
        assert_eq!(settings.bind.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_dir": "/srv/holidays", "bind": "0.0.0.0:3000"}}"#).unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.data_dir, Some(PathBuf::from("/srv/holidays")));
        assert_eq!(settings.bind.port(), 3000);
        assert_eq!(settings.json_folder, PathBuf::from("json"));
    }

    #[test]
    fn invalid_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"unknown_key": 1}}"#).unwrap();
        assert!(matches!(Settings::from_file(file.path()), Err(ConfigError::Parse { .. })));

        let missing = Path::new("/nonexistent/holidays.json");
        assert!(matches!(Settings::from_file(missing), Err(ConfigError::Io { .. })));
    }
}
