use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// File the matched source path is written to, relative to the checkout root
pub const SOURCE_PATH_FILE: &str = "sourcePath";

/// Permission bits of a newly created output file (read-only for everyone)
pub const SOURCE_PATH_MODE: u32 = 0o444;

/// Write `source_path` to `file` verbatim, without a trailing newline.
///
/// The file is created read-only when it does not exist yet; an existing file is
/// truncated, which fails if it is already read-only.
pub fn write_source_path(file: &Path, source_path: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(SOURCE_PATH_MODE);
    }

    let mut handle = options.open(file)?;
    handle.write_all(source_path.as_bytes())?;
    handle.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(SOURCE_PATH_FILE);

        write_source_path(&file, "dependencies/primary").unwrap();

        assert_eq!(std::fs::read(&file).unwrap(), b"dependencies/primary");
    }

    #[cfg(unix)]
    #[test]
    fn test_created_read_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(SOURCE_PATH_FILE);

        write_source_path(&file, "primary").unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, SOURCE_PATH_MODE);
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing").join(SOURCE_PATH_FILE);

        assert!(write_source_path(&file, "primary").is_err());
    }
}
