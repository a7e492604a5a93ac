use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Trait for the file operations the rewriter needs
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::internal_io(e.to_string(), Some("read file".to_string()))
            }
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        // Atomic write: write to a unique temp file beside the target, then rename
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            Some(_) => Path::new("."),
            None => {
                return Err(Error::internal_io(
                    format!("Invalid path: {}", path.display()),
                    Some("write file".to_string()),
                ))
            }
        };

        let permissions = fs::metadata(path).ok().map(|m| m.permissions());

        let mut tmp = NamedTempFile::new_in(parent)
            .map_err(|e| Error::internal_io(e.to_string(), Some("create temp file".to_string())))?;

        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::internal_io(e.to_string(), Some("write temp file".to_string())))?;

        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions).map_err(|e| {
                Error::internal_io(e.to_string(), Some("copy permissions".to_string()))
            })?;
        }

        tmp.persist(path).map_err(|e| {
            Error::internal_io(e.error.to_string(), Some("rename temp file".to_string()))
        })?;

        Ok(())
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn test_local_fs_write_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.dart");
        let fs = local();

        fs.write(&path, "hello world").unwrap();
        let content = fs.read(&path).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.dart");
        let fs = local();

        fs.write(&path, "first").unwrap();
        fs.write(&path, "second").unwrap();

        assert_eq!(fs.read(&path).unwrap(), "second");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_keeps_sibling_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.dart");
        let sibling = dir.path().join("page.dart.tmp");
        std::fs::write(&sibling, "user notes").unwrap();

        local().write(&path, "rewritten").unwrap();

        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "user notes");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "rewritten");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("tool.dart");
        std::fs::write(&path, "before").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        local().write(&path, "after").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.dart");
        let fs = local();

        assert!(!fs.exists(&path));
        let err = fs.read(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_read_binary_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.dart");
        std::fs::write(&path, b"\xff\xfe\x00\xc3").unwrap();

        let err = local().read(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }

    #[test]
    fn test_reading_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let fs = local();

        assert!(fs.exists(dir.path()));
        let err = fs.read(dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }
}
