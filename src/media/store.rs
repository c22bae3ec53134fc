use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::errors::AppError;

/// Filesystem-backed variant storage. Files are named by random hex so that
/// original filenames never reach the disk layout.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one variant payload; returns the storage path relative to the
    /// store root.
    pub fn save(&self, data: &[u8], extension: &str) -> Result<String, AppError> {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        let relative = format!("{}.{extension}", hex::encode(bytes));

        let path = self.root.join(&relative);
        fs::write(&path, data)
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {e}", path.display())))?;
        Ok(relative)
    }
}
