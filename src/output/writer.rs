use crate::core::errors::OutputError;
use crate::scan::MatchBucket;
use crate::utils::fs::atomic_write;
use std::path::{Path, PathBuf};

/// Write one `<fingerprint>.txt` per bucket, one target per line.
///
/// The directory is created if needed. The first failed write stops the run
/// and is returned; files written before it stay intact.
pub fn write_buckets(buckets: &MatchBucket, output_dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(buckets.len());
    for (name, targets) in buckets.iter() {
        let path = output_dir.join(format!("{}.txt", file_stem(name)));

        let mut content = String::new();
        for target in targets {
            content.push_str(target);
            content.push('\n');
        }

        atomic_write(&path, content.as_bytes()).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Wrote {} targets to {:?}", targets.len(), path);
        written.push(path);
    }

    Ok(written)
}

/// Fingerprint names are free text; keep them from escaping the directory.
fn file_stem(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn buckets(entries: &[(&str, &str)]) -> MatchBucket {
        let mut b = MatchBucket::default();
        for (name, target) in entries {
            b.insert(name, target.to_string());
        }
        b
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("results").join("nested");
        assert!(!out.exists());

        let written = write_buckets(&buckets(&[("Tomcat", "example.com")]), &out).unwrap();

        assert_eq!(written, vec![out.join("Tomcat.txt")]);
        assert_eq!(fs::read_to_string(out.join("Tomcat.txt")).unwrap(), "example.com\n");
    }

    #[test]
    fn test_one_file_per_fingerprint() {
        let dir = tempdir().unwrap();
        let b = buckets(&[("Tomcat", "b.com"), ("Tomcat", "a.com"), ("JIRA", "c.com")]);

        write_buckets(&b, dir.path()).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("Tomcat.txt")).unwrap(), "a.com\nb.com\n");
        assert_eq!(fs::read_to_string(dir.path().join("JIRA.txt")).unwrap(), "c.com\n");
    }

    #[test]
    fn test_empty_buckets_write_nothing() {
        let dir = tempdir().unwrap();
        let written = write_buckets(&MatchBucket::default(), dir.path()).unwrap();
        assert!(written.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_separator_in_name_stays_inside_dir() {
        let dir = tempdir().unwrap();
        write_buckets(&buckets(&[("../Evil/Name", "x.com")]), dir.path()).unwrap();
        assert!(dir.path().join(".._Evil_Name.txt").exists());
    }

    #[test]
    fn test_output_dir_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let err = write_buckets(&buckets(&[("Tomcat", "a.com")]), &file).unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }

    #[test]
    fn test_write_failure_stops_remaining_writes() {
        let dir = tempdir().unwrap();
        // a directory squatting on B.txt makes that write fail
        fs::create_dir(dir.path().join("B.txt")).unwrap();
        let b = buckets(&[("A", "a.com"), ("B", "b.com"), ("C", "c.com")]);

        let err = write_buckets(&b, dir.path()).unwrap_err();

        assert!(matches!(err, OutputError::Write { ref path, .. } if path.ends_with("B.txt")));
        assert_eq!(fs::read_to_string(dir.path().join("A.txt")).unwrap(), "a.com\n");
        assert!(!dir.path().join("C.txt").exists());
    }
}
