use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChirpyError, Result};

/// The single file backing a [`RecordStore`](super::RecordStore).
///
/// Reads and writes always cover the whole file. Writes truncate and rewrite in place, there is
/// no fsync and no temp-file swap, so a crash part way through a write can leave a torn file.
#[derive(Debug)]
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    /// makes sure a store file exists at `path`, creating an empty one (and any missing parent
    /// directories) if it does not. An existing file is left untouched.
    ///
    /// # Errors
    /// returns [`ChirpyError::Init`] if the file could not be created or opened for writing
    pub fn ensure_exists(path: &Path) -> Result<StoreFile> {
        let init_err = |source| ChirpyError::Init {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(init_err)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(init_err)?;
        debug!(?path, "store file ready");

        Ok(StoreFile {
            path: path.to_path_buf(),
        })
    }

    /// the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// reads the entire contents of the store file
    ///
    /// # Errors
    /// returns [`ChirpyError::Io`] if the file could not be read, including when it was removed
    /// after start-up
    pub fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|source| self.io_err(source))
    }

    /// replaces the contents of the store file with `bytes`
    pub fn write_all(&self, bytes: &[u8]) -> Result<()> {
        fs::write(&self.path, bytes).map_err(|source| self.io_err(source))
    }

    fn io_err(&self, source: std::io::Error) -> ChirpyError {
        ChirpyError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
