//! Mirror storage configuration.

use serde::{Deserialize, Serialize};

/// Filesystem mirror and upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the mirror; one subdirectory per project folder.
    #[serde(default = "default_root")]
    pub root: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Rewrite every active revision into the mirror at startup.
    #[serde(default)]
    pub reconcile_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_upload_size_bytes: default_max_upload(),
            reconcile_on_startup: false,
        }
    }
}

fn default_root() -> String {
    "uploads".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}
