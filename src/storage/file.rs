use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::store::Store;
use crate::utils::paths::get_data_dir;

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory (~/.todo-projects/data)
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("Invalid storage key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        // Write beside the target and rename over it so readers never see a partial slot
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        assert_eq!(store.get("state").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("data");
        let mut store = FileStore::new(&dir);

        store.set("state", b"{}").unwrap();

        assert!(dir.join("state.json").exists());
        assert_eq!(store.get("state").unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());

        store.set("state", b"first").unwrap();
        store.set("state", b"second").unwrap();

        let fresh = FileStore::new(temp.path());
        assert_eq!(fresh.get("state").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_get_returns_non_utf8_bytes_verbatim() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("state.json"), [0xff, 0xfe, b'{']).unwrap();

        let store = FileStore::new(temp.path());
        assert_eq!(store.get("state").unwrap(), Some(vec![0xff, 0xfe, b'{']));
    }

    #[test]
    fn test_set_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());
        store.set("state", b"v").unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());

        store.remove("state").unwrap();
        store.set("state", b"v").unwrap();
        store.remove("state").unwrap();

        assert_eq!(store.get("state").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());

        assert!(store.set("../escape", b"v").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.remove("").is_err());
    }

    #[test]
    #[serial]
    fn test_open_default_uses_data_dir() {
        let temp = TempDir::new().unwrap();
        // SAFETY: tests touching HOME are #[serial]
        unsafe {
            env::set_var("HOME", temp.path());
        }

        let store = FileStore::open_default().unwrap();
        assert_eq!(store.dir(), temp.path().join(".todo-projects").join("data"));
    }
}
