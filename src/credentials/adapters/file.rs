//! File-backed key-value store.
//!
//! Each key maps to one file inside a capability-scoped directory. Keys are
//! restricted to a conservative file-name alphabet so they can never escape
//! the directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::credentials::ports::{KeyValueResult, KeyValueStore, KeyValueStoreError};

/// Key-value store persisting one file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: Arc<Dir>,
}

impl FileKeyValueStore {
    /// Opens (creating when missing) the storage directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Storage`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> KeyValueResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(KeyValueStoreError::storage)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(KeyValueStoreError::storage)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn run_blocking<F, T>(&self, key: &str, operation: F) -> KeyValueResult<T>
    where
        F: FnOnce(&Dir, &str) -> KeyValueResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let file_name = file_name_for(key)?;
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || operation(&dir, &file_name))
            .await
            .map_err(KeyValueStoreError::storage)?
    }
}

fn file_name_for(key: &str) -> KeyValueResult<String> {
    let is_valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !is_valid {
        return Err(KeyValueStoreError::InvalidKey(key.to_owned()));
    }
    Ok(format!("{key}.json"))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueResult<Option<String>> {
        self.run_blocking(key, |dir, file_name| match dir.read_to_string(file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::storage(err)),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> KeyValueResult<()> {
        let contents = value.to_owned();
        self.run_blocking(key, move |dir, file_name| {
            dir.write(file_name, contents.as_bytes())
                .map_err(KeyValueStoreError::storage)
        })
        .await
    }

    async fn remove(&self, key: &str) -> KeyValueResult<()> {
        self.run_blocking(key, |dir, file_name| match dir.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::storage(err)),
        })
        .await
    }
}
