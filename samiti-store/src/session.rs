// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage for session snapshots.
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// A few named keys holding opaque bytes which survive process restarts.
pub trait SessionStorage: Clone + Send + Sync + 'static {
    type Error: Error + Send + Sync + 'static;

    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Store bytes under a key, replacing any previous value. The value is durable once this
    /// returns.
    fn save(&self, key: &str, value: &[u8]) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Session storage which lives as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage {
    values: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    type Error = Infallible;

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let values = self
            .values
            .read()
            .expect("acquire shared read access on session storage");
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        let mut values = self
            .values
            .write()
            .expect("acquire exclusive write access on session storage");
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let mut values = self
            .values
            .write()
            .expect("acquire exclusive write access on session storage");
        values.remove(key);
        Ok(())
    }
}

#[cfg(feature = "file")]
pub use file::{FileSessionError, FileSessionStorage};

#[cfg(feature = "file")]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use thiserror::Error;
    use tokio::io::AsyncWriteExt;
    use tracing::trace;

    use super::SessionStorage;

    /// Session storage keeping one file per key inside a directory.
    ///
    /// Values are written to a temporary file which is flushed to disk and then renamed over the
    /// previous value, a crash leaves either the old or the new value behind.
    #[derive(Clone, Debug)]
    pub struct FileSessionStorage {
        dir: PathBuf,
    }

    impl FileSessionStorage {
        pub fn new(dir: impl AsRef<Path>) -> Self {
            Self {
                dir: dir.as_ref().to_path_buf(),
            }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path(&self, key: &str) -> Result<PathBuf, FileSessionError> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(FileSessionError::InvalidKey(key.to_string()));
            }
            Ok(self.dir.join(format!("{key}.session")))
        }
    }

    impl SessionStorage for FileSessionStorage {
        type Error = FileSessionError;

        async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
            let path = self.path(key)?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        async fn save(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
            let path = self.path(key)?;
            let temp_path = path.with_extension("session.tmp");

            tokio::fs::create_dir_all(&self.dir).await?;

            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(value).await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&temp_path, &path).await?;
            trace!(path = %path.display(), "saved session value");
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), Self::Error> {
            let path = self.path(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }

    #[derive(Debug, Error)]
    pub enum FileSessionError {
        #[error("invalid session key: {0:?}")]
        InvalidKey(String),

        #[error(transparent)]
        Io(#[from] std::io::Error),
    }
}
