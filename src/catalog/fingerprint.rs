use crate::core::errors::CatalogError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// One entry of the fingerprint JSON file.
///
/// `fingerprint` accepts either a single string or a list of strings so both
/// catalog generations load through the same path.
#[derive(Debug, Clone, Deserialize)]
pub struct FingerprintRecord {
    pub name: String,
    #[serde(rename = "fingerprint", alias = "fingerprints")]
    pub signatures: OneOrMany,
    #[serde(default, rename = "code")]
    pub expected_status: Option<u16>,
    #[serde(default)]
    pub regex: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// A loaded, compiled fingerprint. Immutable once built.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub name: String,
    pub signatures: Vec<String>,
    pub expected_status: Option<u16>,
    patterns: Vec<Regex>,
}

impl Fingerprint {
    /// Literal signatures become escaped, case-insensitive patterns; with
    /// `regex` set they are used as written (still case-insensitive).
    pub fn compile(record: FingerprintRecord) -> Result<Self, CatalogError> {
        let name = record.name.trim().to_string();
        let signatures: Vec<String> = record
            .signatures
            .into_vec()
            .into_iter()
            .filter(|s| {
                let keep = !s.is_empty();
                if !keep {
                    tracing::warn!("Dropping empty signature from fingerprint '{}'", name);
                }
                keep
            })
            .collect();

        if signatures.is_empty() {
            return Err(CatalogError::NoSignatures(name));
        }

        let patterns = signatures
            .iter()
            .map(|sig| {
                let source = if record.regex {
                    sig.clone()
                } else {
                    regex::escape(sig)
                };
                RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| CatalogError::InvalidPattern {
                        name: name.clone(),
                        pattern: sig.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            signatures,
            expected_status: record.expected_status,
            patterns,
        })
    }

    #[cfg(test)]
    pub fn literal(name: &str, signatures: &[&str]) -> Result<Self, CatalogError> {
        Self::compile(FingerprintRecord {
            name: name.to_string(),
            signatures: OneOrMany::Many(signatures.iter().map(|s| s.to_string()).collect()),
            expected_status: None,
            regex: false,
        })
    }

    /// True when any signature occurs in `response`.
    pub fn matches(&self, response: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(response))
    }

    /// The catalog's `code` is a hint, not a filter: a hit at another status
    /// still counts.
    pub fn status_differs(&self, status: u16) -> bool {
        self.expected_status.is_some_and(|code| code != status)
    }
}
