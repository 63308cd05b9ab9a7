use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path:?} is not a usable directory: {reason}")]
    Directory { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory that will hold `target`, created if missing.
pub fn prepare_parent(target: &Path) -> Result<&Path, PersistError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let unusable = |reason: String| PersistError::Directory {
        path: dir.to_path_buf(),
        reason,
    };

    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(dir),
        Ok(_) => Err(unusable("not a directory".into())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
            Ok(dir)
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}

/// Writes `content` to a temp file next to `target`, then renames it over
/// `target`. Readers see either the old or the new file, never a partial one.
pub fn write_atomically(target: &Path, content: &str) -> Result<(), PersistError> {
    let dir = prepare_parent(target)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{prepare_parent, write_atomically, PersistError};

    #[test]
    fn creates_missing_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/deeper/store.ron");
        write_atomically(&target, "()").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "()");
    }

    #[test]
    fn replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("store.ron");
        write_atomically(&target, "hello").unwrap();
        write_atomically(&target, "world").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "world");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn file_in_place_of_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let not_a_dir = temp.path().join("not_a_dir");
        fs::write(&not_a_dir, "x").unwrap();

        let target = not_a_dir.join("store.ron");
        assert!(matches!(
            prepare_parent(&target),
            Err(PersistError::Directory { .. })
        ));
        assert!(write_atomically(&target, "data").is_err());
    }
}
