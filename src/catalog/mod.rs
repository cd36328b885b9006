//! The fingerprint catalog: an ordered, read-only list of named signatures.
//!
//! Order matters. The matcher walks the catalog front to back and the first
//! fingerprint with a hit wins, so entries earlier in the JSON file take
//! precedence over later ones.

pub mod fingerprint;

pub use fingerprint::{Fingerprint, FingerprintRecord};

use crate::core::errors::CatalogError;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fingerprints: Vec<Fingerprint>,
}

impl Catalog {
    /// Build a catalog, enforcing non-empty and unique names.
    pub fn new(fingerprints: Vec<Fingerprint>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (index, fp) in fingerprints.iter().enumerate() {
            if fp.name.is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            if !seen.insert(fp.name.as_str()) {
                return Err(CatalogError::DuplicateName(fp.name.clone()));
            }
        }
        Ok(Self { fingerprints })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<FingerprintRecord> = serde_json::from_str(json)?;
        let fingerprints = records
            .into_iter()
            .map(Fingerprint::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fingerprints)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        if catalog.is_empty() {
            tracing::warn!("Fingerprint file {:?} contains no fingerprints", path);
        }
        Ok(catalog)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.fingerprints.iter()
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_preserves_order() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"name":"Tomcat","fingerprint":"coyote"},
                {"name":"AEM","fingerprint":["cq5","adobe experience manager"]},
                {"name":"JIRA","fingerprint":"jira","code":404}
            ]"#,
        )
        .unwrap();
        let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Tomcat", "AEM", "JIRA"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Catalog::from_json_str(
            r#"[{"name":"A","fingerprint":"x"},{"name":"A","fingerprint":"y"}]"#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateName(n)) if n == "A"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Catalog::from_json_str(r#"[{"name":"  ","fingerprint":"x"}]"#);
        assert!(matches!(result, Err(CatalogError::EmptyName { index: 0 })));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Catalog::from_json_str(r#"[{"name":"A"}]"#),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json_str("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, r#"[{"name":"Tomcat","fingerprint":"coyote"}]"#).unwrap();
        let catalog = Catalog::load(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = Catalog::load(Path::new("/nonexistent/fingerprints.json"));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }
}
