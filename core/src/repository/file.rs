use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::repository::traits::{validate_key, KeyValueStore};

const FILE_EXTENSION: &str = "json";

/// One file per key under a data directory: `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| StorageError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(FileKeyValueStore { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.{FILE_EXTENSION}"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_temp(tmp_path: &Path, value: &str) -> Result<(), StorageError> {
    let file = File::create(tmp_path).map_err(io_error(tmp_path))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(value.as_bytes())
        .map_err(io_error(tmp_path))?;
    let file = writer
        .into_inner()
        .map_err(|err| io_error(tmp_path)(err.into_error()))?;
    file.sync_all().map_err(io_error(tmp_path))
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.path_for(key);
        let tmp_path = self.base_dir.join(format!(".{key}.{FILE_EXTENSION}.tmp"));

        let written = write_temp(&tmp_path, value)
            // Rename over the target so readers never observe a partial blob.
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(io_error(&path)));
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
        debug!(key, bytes = value.len(), path = %path.display(), "wrote blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();
        assert_eq!(store.get("todos.v1").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = FileKeyValueStore::new(dir.path()).unwrap();
        store.set("todos.v1", "[1]").unwrap();
        store.set("todos.v1", "[1,2]").unwrap();

        assert_eq!(store.get("todos.v1").unwrap().as_deref(), Some("[1,2]"));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["todos.v1.json".to_string()]);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("todos.v1.json")).unwrap();
        let mut store = FileKeyValueStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.set("todos.v1", "[]"),
            Err(StorageError::Io { .. })
        ));
        assert!(!dir.path().join(".todos.v1.json.tmp").exists());
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileKeyValueStore::new(&nested).unwrap();
        store.set("todos", "[]").unwrap();
        assert!(nested.join("todos.json").exists());
    }

    #[test]
    fn test_rejects_path_like_key() {
        let dir = TempDir::new().unwrap();
        let mut store = FileKeyValueStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "[]"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
