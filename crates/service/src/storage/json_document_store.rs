use std::{marker::PhantomData, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, instrument};

use crate::errors::ServiceError;

/// A value persisted as one JSON file.
pub trait Document: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Repair or reject a freshly loaded value before anyone sees it.
    fn normalize(&mut self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Generic JSON file-backed document store.
///
/// Every call is a full cycle against the file: readers take the shared lock
/// and deserialize the whole document, writers take the exclusive lock, load,
/// mutate and rewrite the whole document before releasing. Nothing is cached,
/// so the file is the only source of truth.
///
/// The file is rewritten in place. A crash in the middle of a write can leave
/// it truncated; there is no journal or rename step.
pub struct JsonDocumentStore<D> {
    lock: RwLock<()>,
    file_path: PathBuf,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> JsonDocumentStore<D> {
    /// Open the store at `path`. Creates parent directories, and writes
    /// `D::default()` if the file does not exist yet.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        match fs::metadata(&file_path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "initializing empty document");
                write_document(&file_path, &D::default()).await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { lock: RwLock::new(()), file_path, _doc: PhantomData })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn load(&self) -> Result<D, ServiceError> {
        let bytes = fs::read(&self.file_path).await?;
        let mut doc: D = serde_json::from_slice(&bytes)?;
        doc.normalize()?;
        Ok(doc)
    }

    /// Load under the shared lock and hand the document to `f`.
    #[instrument(level = "trace", skip_all, fields(path = %self.file_path.display()))]
    pub async fn read<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(D) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.read().await;
        let doc = self.load().await?;
        f(doc)
    }

    /// Load, mutate and persist under the exclusive lock.
    /// Nothing is written if `f` fails.
    #[instrument(level = "trace", skip_all, fields(path = %self.file_path.display()))]
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut D) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.write().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        write_document(&self.file_path, &doc).await?;
        Ok(out)
    }

    /// Replace the whole document with `D::default()`.
    pub async fn reset(&self) -> Result<(), ServiceError> {
        let _guard = self.lock.write().await;
        write_document(&self.file_path, &D::default()).await
    }
}

async fn write_document<D: Serialize>(path: &Path, doc: &D) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(doc)?;
    fs::write(path, data).await?;
    Ok(())
}
