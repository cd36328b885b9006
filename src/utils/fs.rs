use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `content` to a sibling temp file, sync it, then rename it over
/// `path`. Readers never see a half-written file; on failure the temp file
/// is removed and any previous `path` is left untouched.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let tmp_path = tmp_sibling(path);

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
