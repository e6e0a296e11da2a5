use std::path::PathBuf;

/// the fixed file name of the store file
pub const DEFAULT_STORE_FILE: &str = "database.json";

/// Where a [`RecordStore`](crate::RecordStore) keeps its file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// directory holding the store file. `None` means the process working directory.
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// a config that places the store file inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            dir: Some(dir.into()),
        }
    }

    /// resolves the path of the store file.
    ///
    /// An empty `dir` is treated the same as no directory at all.
    pub fn path(&self) -> PathBuf {
        match &self.dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(DEFAULT_STORE_FILE),
            _ => PathBuf::from(DEFAULT_STORE_FILE),
        }
    }
}
