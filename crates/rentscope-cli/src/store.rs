//! File-backed key-value store under the per-user data directory.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use rentscope_core::error::RentscopeError;
use rentscope_core::store::KeyValueStore;
use rentscope_core::RentscopeResult;

/// One JSON-ish text file per key inside a dedicated directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> RentscopeResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| RentscopeError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> RentscopeResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RentscopeError::Storage(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> RentscopeResult<()> {
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| RentscopeError::Storage(format!("cannot write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> RentscopeResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RentscopeError::Storage(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Open the default per-user store.
pub fn open_default() -> RentscopeResult<FileStore> {
    let dirs = ProjectDirs::from("dev", "rentscope", "rentscope")
        .ok_or_else(|| RentscopeError::Storage("cannot determine user data directory".into()))?;
    FileStore::new(dirs.data_dir())
}
