use crate::database::{Collection, Database};
use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// Flat-file store: one pretty-printed JSON document per collection, all in
/// the same directory.
///
/// There is no locking. Two processes writing the same collection race and
/// the last write wins; inside the server the store sits behind a mutex.
pub struct JsonFileDb {
    data_dir: PathBuf,
}

impl JsonFileDb {
    /// Open a store rooted at `data_dir`. The directory is created lazily on
    /// first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonFileDb {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl Database for JsonFileDb {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        let path = self.path(collection);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, collection: Collection, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|err| {
            Error::Storage(format!(
                "cannot create {}: {}",
                self.data_dir.display(),
                err
            ))
        })?;

        let path = self.path(collection);
        std::fs::write(&path, contents)
            .map_err(|err| Error::Storage(format!("cannot write {}: {}", path.display(), err)))?;
        tracing::debug!(file = %path.display(), bytes = contents.len(), "collection written");
        Ok(())
    }

    fn exists(&self, collection: Collection) -> bool {
        self.path(collection).exists()
    }
}
