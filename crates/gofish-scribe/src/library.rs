use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize history: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stores opaque history blobs under a `<game_name>/<entry_id>` key. The
/// storage medium is the implementer's business.
pub trait Library {
    fn save(&self, game_name: &str, entry_id: &str, blob: &[u8]) -> Result<PathBuf, LibraryError>;
}

/// Local-filesystem library rooted at a directory; blobs land at
/// `<root>/<game_name>/<entry_id>.json`.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    root: PathBuf,
}

impl FileLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Library for FileLibrary {
    fn save(&self, game_name: &str, entry_id: &str, blob: &[u8]) -> Result<PathBuf, LibraryError> {
        let dir = self.root.join(game_name);
        fs::create_dir_all(&dir).map_err(|source| LibraryError::Io {
            context: format!("creating library directory {}", dir.display()),
            source,
        })?;
        let path = dir.join(format!("{entry_id}.json"));
        fs::write(&path, blob).map_err(|source| LibraryError::Io {
            context: format!("writing history blob {}", path.display()),
            source,
        })?;
        Ok(path)
    }
}
