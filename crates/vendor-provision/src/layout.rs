use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ProvisionError;
use crate::targets::Target;

pub const DEFAULT_VENDOR_ROOT: &str = "vendor";
const CACHE_DIR_NAME: &str = "cache";
const BIN_DIR_NAME: &str = "bin";

/// Directory tree that receives every vendored tool.
#[derive(Debug, Clone)]
pub struct VendorLayout {
    root: PathBuf,
}

impl VendorLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR_NAME)
    }

    /// Optional home for a bundled archive tool.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR_NAME)
    }

    pub fn cache_path(&self, target: &Target) -> PathBuf {
        self.cache_dir().join(&target.cache_file)
    }

    pub fn dest_dir(&self, target: &Target) -> PathBuf {
        self.root.join(&target.dest_dir)
    }

    /// Creates the cache directory and every target's destination directory.
    pub fn ensure(&self, targets: &[Target]) -> Result<(), ProvisionError> {
        ensure_dir(&self.cache_dir())?;
        for target in targets {
            ensure_dir(&self.dest_dir(target))?;
        }
        Ok(())
    }
}

pub fn ensure_dir(path: &Path) -> Result<(), ProvisionError> {
    fs::create_dir_all(path).map_err(|source| ProvisionError::Layout {
        path: path.to_path_buf(),
        source,
    })
}

/// A directory with any entry at all counts as populated; contents are not checked.
pub fn dir_is_empty(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
