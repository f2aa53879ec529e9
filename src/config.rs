use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CuraLink";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DB_FILE_NAME: &str = "curalink.db";

/// Proximity search radius when the caller gives none.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 100.0;

/// National emergency and ambulance lines shown with the emergency overview.
pub const EMERGENCY_NUMBER: &str = "112";
pub const AMBULANCE_NUMBER: &str = "108";
pub const EMERGENCY_FACILITY_LIMIT: usize = 10;

pub const ENV_DB_PATH: &str = "CURALINK_DB_PATH";
pub const ENV_BIND: &str = "CURALINK_BIND";
pub const ENV_UTC_OFFSET_MINUTES: &str = "CURALINK_UTC_OFFSET_MINUTES";

/// Get the application data directory
/// ~/CuraLink/ on all platforms. `None` when the home directory is unknown.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE_NAME))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "curalink_lib=info,curalink=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set CURALINK_DB_PATH")]
    NoDataDir,
    #[error("Invalid CURALINK_BIND '{0}': expected host:port")]
    InvalidBind(String),
    #[error("Invalid CURALINK_UTC_OFFSET_MINUTES '{0}': expected minutes within ±1439")]
    InvalidUtcOffset(String),
}

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    /// Offset of the canonical booking timezone from UTC.
    pub utc_offset_minutes: i32,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = match lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path().ok_or(ConfigError::NoDataDir)?,
        };

        let bind_raw = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;

        let utc_offset_minutes = match lookup(ENV_UTC_OFFSET_MINUTES) {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|m| m.abs() < 24 * 60)
                .ok_or(ConfigError::InvalidUtcOffset(raw))?,
            None => 0,
        };

        Ok(Self {
            db_path,
            bind,
            utc_offset_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("CuraLink"));
    }

    #[test]
    fn db_path_under_app_data() {
        let db = default_db_path().unwrap();
        assert!(db.starts_with(app_data_dir().unwrap()));
        assert!(db.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_when_env_empty() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse().unwrap());
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(Some(config.db_path), default_db_path());
    }

    #[test]
    fn env_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/srv/care/care.db"),
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_UTC_OFFSET_MINUTES, "330"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/srv/care/care.db"));
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.utc_offset_minutes, 330);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(ENV_BIND, "localhost")])),
            Err(ConfigError::InvalidBind(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET_MINUTES, "1440")])),
            Err(ConfigError::InvalidUtcOffset(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[(ENV_UTC_OFFSET_MINUTES, "ist")])),
            Err(ConfigError::InvalidUtcOffset(_))
        ));
    }
}
