use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot read fingerprint file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fingerprint JSON is not compliant: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fingerprint #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate fingerprint name: {0}")]
    DuplicateName(String),

    #[error("fingerprint '{0}' has no signatures")]
    NoSignatures(String),

    #[error("fingerprint '{name}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("line {line}: empty target record")]
    Empty { line: usize },

    #[error("line {line}: expected 3 comma-separated fields (domain,ip,port), found {fields}")]
    FieldCount { line: usize, fields: usize },

    #[error("line {line}: domain field is empty")]
    EmptyDomain { line: usize },

    #[error("line {line}: not valid UTF-8")]
    Encoding { line: usize },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid request for {url}: {reason}")]
    Request { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write results to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}
