//! Application Configuration

use std::path::PathBuf;

/// Default upload limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct PetsConfig {
    /// Directory uploaded files are written to
    pub storage_dir: PathBuf,
    /// Public path prefix under which stored files are served
    pub storage_path_root: String,
    /// Maximum request body size for uploads
    pub max_upload_bytes: usize,
}

impl Default for PetsConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("storage"),
            storage_path_root: "storage".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl PetsConfig {
    /// Public URL of a stored file: `"/{storage_path_root}/{path}"`
    pub fn file_url(&self, path: &str) -> String {
        let root = self.storage_path_root.trim_matches('/');
        let path = path.trim_start_matches('/');
        if root.is_empty() {
            format!("/{path}")
        } else {
            format!("/{root}/{path}")
        }
    }
}
