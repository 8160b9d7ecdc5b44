use super::artifact::IndexArtifact;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A flat directory of index artifacts with atomic replace semantics.
///
/// Cheap to clone per request; all state lives on disk. Callers are expected
/// to validate names before handing them in (see the lifecycle manager);
/// this layer treats the name as a plain file name.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the store, creating the root directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Lists the names of all persisted artifacts.
    ///
    /// Leftover temporary files from interrupted writes are skipped; they are
    /// never visible under a final artifact name.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                if !name.starts_with('.') {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Reads and deserializes an artifact.
    pub fn read(&self, name: &str) -> io::Result<IndexArtifact> {
        let bytes = fs::read(self.path(name))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("corrupt artifact {}: {}", name, e),
            )
        })
    }

    /// Persists an artifact atomically.
    ///
    /// Serializes into a uniquely named temporary file in the store root, then
    /// renames it over the final path. Concurrent readers either see the
    /// previous artifact or the new one, never a partial write; concurrent
    /// writers race benignly with last-writer-wins.
    pub fn write(&self, name: &str, artifact: &IndexArtifact) -> io::Result<()> {
        let tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.root)?;

        serde_json::to_writer(&tmp, artifact)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        tmp.as_file().sync_all()?;

        tmp.persist(self.path(name)).map_err(|e| e.error)?;

        tracing::debug!("Persisted artifact {} ({} chunks)", name, artifact.ichunks.len());
        Ok(())
    }

    /// Removes an artifact. Propagates `NotFound` when it does not exist so
    /// the caller can distinguish a no-op delete.
    pub fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path(name))
    }
}
