use std::fs;
use std::path::{Path, PathBuf};

use super::codec::{decode, encode};
use super::{PersistError, SaveStore, SessionRecord};

/// Store that keeps a single bincode-encoded record in a file.
///
/// Writes go to a sibling temp file first and are renamed into place, so
/// a crash mid-save leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStore for FileStore {
    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistError> {
        let bytes = encode(record)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved match to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<SessionRecord, PersistError> {
        let bytes = fs::read(&self.path)?;
        decode(&bytes)
    }

    fn delete(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("deleted save {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
