//! Static page and asset loading.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::StaticFilesConfig;

/// Source of page and asset bytes, addressed by request path.
///
/// Loads are blocking; the connection calls into handlers from the blocking
/// pool.
pub trait ContentLoader: Send + Sync {
    fn load_file_content(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Loads files from a directory on disk.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(&cfg.root)
    }

    /// Maps a request path onto the root. Rejects anything that would climb
    /// out of it.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to serve path {:?}", path),
            ));
        }

        Ok(self.root.join(relative))
    }
}

impl ContentLoader for StaticFiles {
    fn load_file_content(&self, path: &str) -> io::Result<Vec<u8>> {
        let file = self.resolve(path)?;
        tracing::debug!(path, file = %file.display(), "Loading static file");
        std::fs::read(file)
    }
}
