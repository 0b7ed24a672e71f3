//! # API Configuration Module
//!
//! This module loads the timetable board server's configuration from
//! environment variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `BOARD_UPSTREAM_URL`: Base URL of the solver service
//! - `BOARD_DATA_DIR`: Directory holding `lab_schedule.json` and
//!   `theory_schedule.json`, used when no upstream URL is set
//! - `BOARD_UPSTREAM_TIMEOUT_SECONDS`: Timeout for upstream requests (default: none)
//! - `BOARD_DISABLED_SEMESTERS`: Comma-separated semesters whose timetables are hidden

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use timetable_board_client::{FileSource, HttpSource, TelemetrySource};
use timetable_board_core::semester::SemesterGate;
use tracing::Level;

/// Where the board reads its telemetry from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamConfig {
    /// A running solver service.
    Http {
        base_url: String,
        timeout: Option<Duration>,
    },
    /// Static schedule exports on disk.
    Files { data_dir: PathBuf },
}

/// Configuration for the timetable board server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use timetable_board_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Telemetry source
    pub upstream: UpstreamConfig,

    /// Semesters whose timetables are hidden
    pub disabled_semesters: Vec<u32>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Neither BOARD_UPSTREAM_URL nor BOARD_DATA_DIR is set
    /// - The API_PORT value cannot be parsed as a u16
    /// - BOARD_UPSTREAM_TIMEOUT_SECONDS or BOARD_DISABLED_SEMESTERS is malformed
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(30);

        // Upstream settings; a URL wins over a data directory
        let upstream = match (var("BOARD_UPSTREAM_URL"), var("BOARD_DATA_DIR")) {
            (Some(base_url), _) => {
                let timeout = var("BOARD_UPSTREAM_TIMEOUT_SECONDS")
                    .map(|value| value.trim().parse::<u64>())
                    .transpose()
                    .wrap_err("Invalid BOARD_UPSTREAM_TIMEOUT_SECONDS value")?
                    .map(Duration::from_secs);
                UpstreamConfig::Http {
                    base_url: base_url.trim().to_string(),
                    timeout,
                }
            }
            (None, Some(data_dir)) => UpstreamConfig::Files {
                data_dir: PathBuf::from(data_dir.trim()),
            },
            (None, None) => {
                return Err(eyre!(
                    "BOARD_UPSTREAM_URL or BOARD_DATA_DIR environment variable must be set"
                ));
            }
        };

        let disabled_semesters = var("BOARD_DISABLED_SEMESTERS")
            .map(|value| parse_semesters(&value))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            upstream,
            disabled_semesters,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:8080"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Creates the telemetry source this configuration points at.
    pub fn build_source(&self) -> Result<Arc<dyn TelemetrySource>> {
        let source: Arc<dyn TelemetrySource> = match &self.upstream {
            UpstreamConfig::Http { base_url, timeout } => Arc::new(
                HttpSource::new(base_url, *timeout).wrap_err("Failed to create upstream client")?,
            ),
            UpstreamConfig::Files { data_dir } => Arc::new(FileSource::new(data_dir.clone())),
        };
        Ok(source)
    }

    pub fn semester_gate(&self) -> SemesterGate {
        SemesterGate::new(self.disabled_semesters.iter().copied())
    }
}

fn parse_semesters(value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .wrap_err_with(|| format!("Invalid semester in BOARD_DISABLED_SEMESTERS: {}", s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_data_dir() {
        let config = config(&[("BOARD_DATA_DIR", "/srv/board")]).unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.cors_origins, None);
        assert_eq!(
            config.upstream,
            UpstreamConfig::Files {
                data_dir: PathBuf::from("/srv/board")
            }
        );
        assert!(config.disabled_semesters.is_empty());
    }

    #[test]
    fn test_upstream_url_wins() {
        let config = config(&[
            ("BOARD_UPSTREAM_URL", "http://solver:8000"),
            ("BOARD_DATA_DIR", "/srv/board"),
            ("BOARD_UPSTREAM_TIMEOUT_SECONDS", "15"),
            ("BOARD_DISABLED_SEMESTERS", "2, 4,"),
            ("API_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("LOG_LEVEL", "debug"),
            ("API_PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(
            config.upstream,
            UpstreamConfig::Http {
                base_url: "http://solver:8000".to_string(),
                timeout: Some(Duration::from_secs(15)),
            }
        );
        assert_eq!(config.disabled_semesters, vec![2, 4]);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.port, 8080);
        assert!(config.semester_gate().disabled().eq([2, 4]));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let err = config(&[]).unwrap_err();
        assert!(err.to_string().contains("BOARD_UPSTREAM_URL"));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(config(&[("BOARD_DATA_DIR", "/d"), ("API_PORT", "eighty")]).is_err());
        assert!(config(&[("BOARD_DATA_DIR", "/d"), ("BOARD_DISABLED_SEMESTERS", "3,x")]).is_err());
        assert!(
            config(&[
                ("BOARD_UPSTREAM_URL", "http://solver"),
                ("BOARD_UPSTREAM_TIMEOUT_SECONDS", "soon"),
            ])
            .is_err()
        );
    }
}
