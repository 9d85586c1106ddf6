//! JSON-file record store
//!
//! Every logical collection lives in one JSON document on disk holding an
//! array of records. A [`RecordStore`] is built once at startup and hands out
//! one [`JsonCollection`] per collection; each collection owns the lock that
//! serializes access to its file inside this process. Nothing is locked
//! across processes.

use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::{
    config::{CorruptionPolicy, StorageConfig},
    error::{AppError, AppResult},
};

/// A record that can be kept in a [`JsonCollection`]
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File stem of the backing document (`books` -> `books.json`)
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Result of a closure passed to [`JsonCollection::mutate`]
pub enum Mutation<R> {
    /// The records were changed and must be written back
    Changed(R),
    /// Nothing changed, skip the write
    Unchanged(R),
}

/// Factory for collections sharing one data directory and corruption policy
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
    policy: CorruptionPolicy,
}

impl RecordStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            policy: config.on_corruption,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the collection for `T`, seeding a missing file with `default`
    pub fn collection<T: Record>(&self, default: Vec<T>) -> Arc<JsonCollection<T>> {
        let path = self.data_dir.join(format!("{}.json", T::COLLECTION));
        Arc::new(JsonCollection {
            path,
            policy: self.policy,
            default,
            lock: Mutex::new(()),
            _record: PhantomData,
        })
    }
}

/// One collection file plus the lock guarding it
pub struct JsonCollection<T> {
    path: PathBuf,
    policy: CorruptionPolicy,
    default: Vec<T>,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonCollection<T> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record
    pub async fn read(&self) -> AppResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        read_json(&self.path, self.default.clone(), self.policy).await
    }

    /// Replace the whole collection
    pub async fn write(&self, records: &[T]) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        write_json(&self.path, &records).await
    }

    /// Read, modify and write back under a single lock acquisition.
    ///
    /// The closure sees the current records; returning `Changed` persists
    /// them, `Unchanged` or an error leaves the file as it was.
    pub async fn mutate<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<Mutation<R>>,
    {
        let _guard = self.lock.lock().await;
        let mut records = read_json(&self.path, self.default.clone(), self.policy).await?;
        match f(&mut records)? {
            Mutation::Changed(result) => {
                write_json(&self.path, &records).await?;
                Ok(result)
            }
            Mutation::Unchanged(result) => Ok(result),
        }
    }

    /// Next id: one past the largest numeric id, or "1" for an empty collection
    pub fn next_id(records: &[T]) -> String {
        records
            .iter()
            .filter_map(|r| r.id().parse::<u64>().ok())
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
            .to_string()
    }
}

/// Read a JSON document, creating it from `default` when absent.
///
/// Invalid JSON is handled according to `policy`. Callers must hold the
/// collection lock.
pub async fn read_json<D>(path: &Path, default: D, policy: CorruptionPolicy) -> AppResult<D>
where
    D: Serialize + DeserializeOwned,
{
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            write_json(path, &default).await?;
            return Ok(default);
        }
        Err(e) => {
            return Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(document) => Ok(document),
        Err(e) => match policy {
            CorruptionPolicy::Reset => {
                tracing::warn!(
                    "Corrupted document {} ({}), resetting to default",
                    path.display(),
                    e
                );
                write_json(path, &default).await?;
                Ok(default)
            }
            CorruptionPolicy::Fail => Err(AppError::Storage(format!(
                "Corrupted document {}: {}",
                path.display(),
                e
            ))),
        },
    }
}

/// Write a JSON document through a sibling temp file and an atomic rename.
///
/// Callers must hold the collection lock.
pub async fn write_json<D: Serialize + ?Sized>(path: &Path, document: &D) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let bytes = serde_json::to_vec_pretty(document)?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(AppError::Storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}
