use crate::cli::args::{Cli, Mode};
use crate::core::errors::ConfigError;
use rand::Rng;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const BAD_PATH_LEN: usize = 8;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const BAD_PATH_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Settings that can be supplied by a TOML file. Every field is optional in the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub scan: ScanDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanDefaults {
    pub workers: usize,
    pub timeout_secs: u64,
    pub queue_capacity: usize,
    pub method: String,
    pub body: String,
    pub output_dir: PathBuf,
    pub keepalive: bool,
    pub badpath: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            workers: 20,
            timeout_secs: 10,
            queue_capacity: 100_000,
            method: "GET".to_string(),
            body: String::new(),
            output_dir: PathBuf::from("./"),
            keepalive: true,
            badpath: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// The scan context: built once before scanning and handed to every stage.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub mode: Mode,
    pub probe_path: String,
    pub probe_root: bool,
    pub workers: usize,
    pub timeout: Duration,
    pub queue_capacity: usize,
    pub method: Method,
    pub body: String,
    pub output_dir: PathBuf,
    pub keepalive: bool,
    /// Bytes of response body kept for matching; the rest is not read.
    pub max_body_bytes: usize,
    pub debug: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let defaults = ScanDefaults::default();
        Self {
            mode: Mode::Simple,
            probe_path: "/".to_string(),
            probe_root: false,
            workers: defaults.workers,
            timeout: Duration::from_secs(defaults.timeout_secs),
            queue_capacity: defaults.workers * 2,
            method: Method::GET,
            body: defaults.body,
            output_dir: defaults.output_dir,
            keepalive: defaults.keepalive,
            max_body_bytes: defaults.max_body_bytes,
            debug: false,
        }
    }
}

impl ScanConfig {
    /// Merge command line flags over file defaults. Flags win.
    pub fn from_cli(cli: &Cli, file: &FileConfig) -> Result<Self, ConfigError> {
        let defaults = &file.scan;
        let workers = cli.workers.unwrap_or(defaults.workers);

        // Simple mode mirrors an unbuffered hand-off: a small queue per worker.
        let queue_capacity = match (cli.queue, cli.mode) {
            (Some(q), _) => q,
            (None, Mode::Extended) => defaults.queue_capacity,
            (None, Mode::Simple) => workers.saturating_mul(2),
        };

        let method_name = cli.method.as_deref().unwrap_or(&defaults.method);
        let method = parse_method(method_name)?;

        let probe_path = match cli.badpath.clone().or_else(|| defaults.badpath.clone()) {
            Some(p) if !p.is_empty() => p,
            _ => random_bad_path(&mut rand::rng()),
        };

        let config = Self {
            mode: cli.mode,
            probe_path,
            probe_root: cli.probe_root || cli.mode == Mode::Extended,
            workers,
            timeout: Duration::from_secs(cli.timeout.unwrap_or(defaults.timeout_secs)),
            queue_capacity,
            method,
            body: cli.body.clone().unwrap_or_else(|| defaults.body.clone()),
            output_dir: cli.output.clone().unwrap_or_else(|| defaults.output_dir.clone()),
            keepalive: defaults.keepalive && !cli.no_keepalive,
            max_body_bytes: defaults.max_body_bytes,
            debug: cli.debug,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be greater than 0".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue size must be greater than 0".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be greater than 0".into()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

fn parse_method(name: &str) -> Result<Method, ConfigError> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| ConfigError::Invalid(format!("invalid HTTP method: {name:?}")))
}

/// A path like `/qWeRtYuI` that no sane application serves.
pub fn random_bad_path<R: Rng>(rng: &mut R) -> String {
    let tail: String = (0..BAD_PATH_LEN)
        .map(|_| BAD_PATH_CHARSET[rng.random_range(0..BAD_PATH_CHARSET.len())] as char)
        .collect();
    format!("/{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["badprint", "-f", "fp.json"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults_simple_mode() {
        let config = ScanConfig::from_cli(&cli(&[]), &FileConfig::default()).unwrap();
        assert_eq!(config.workers, 20);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.queue_capacity, 40);
        assert_eq!(config.method, Method::GET);
        assert_eq!(config.output_dir, PathBuf::from("./"));
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert!(!config.probe_root);
        assert!(config.probe_path.starts_with('/'));
        assert_eq!(config.probe_path.len(), BAD_PATH_LEN + 1);
    }

    #[test]
    fn test_extended_mode_uses_large_queue_and_root_probe() {
        let config =
            ScanConfig::from_cli(&cli(&["--mode", "extended"]), &FileConfig::default()).unwrap();
        assert_eq!(config.queue_capacity, 100_000);
        assert!(config.probe_root);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = FileConfig::default();
        file.scan.workers = 5;
        file.scan.method = "PUT".into();
        file.scan.badpath = Some("/from-file".into());

        let config = ScanConfig::from_cli(&cli(&["-w", "7"]), &file).unwrap();
        assert_eq!(config.workers, 7);
        assert_eq!(config.method, Method::PUT);
        assert_eq!(config.probe_path, "/from-file");

        let config = ScanConfig::from_cli(&cli(&["-X", "post", "-p", "/x"]), &file).unwrap();
        assert_eq!(config.method, Method::POST);
        assert_eq!(config.probe_path, "/x");
    }

    #[test]
    fn test_validation() {
        let zero_workers = ScanConfig::from_cli(&cli(&["-w", "0"]), &FileConfig::default());
        assert!(zero_workers.unwrap_err().to_string().contains("workers"));

        let zero_queue = ScanConfig::from_cli(&cli(&["-q", "0"]), &FileConfig::default());
        assert!(zero_queue.is_err());

        let zero_timeout = ScanConfig::from_cli(&cli(&["--timeout", "0"]), &FileConfig::default());
        assert!(zero_timeout.is_err());

        let mut file = FileConfig::default();
        file.scan.max_body_bytes = 0;
        let zero_body = ScanConfig::from_cli(&cli(&[]), &file);
        assert!(zero_body.unwrap_err().to_string().contains("max_body_bytes"));

        let bad_method = ScanConfig::from_cli(&cli(&["-X", "GE T"]), &FileConfig::default());
        assert!(bad_method.unwrap_err().to_string().contains("invalid HTTP method"));
    }

    #[test]
    fn test_random_bad_path_shape() {
        let mut rng = rand::rng();
        let a = random_bad_path(&mut rng);
        assert_eq!(a.len(), 9);
        assert!(a[1..].chars().all(|c| c.is_ascii_alphabetic()));
    }
}
