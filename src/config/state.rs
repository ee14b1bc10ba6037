// Application state module
// Built once at startup and shared read-only by every connection task

use std::path::PathBuf;
use std::sync::Arc;

use super::types::Config;
use crate::error::Result;
use crate::handler::{FileHandler, PrecompressedFiles, StaticFiles};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical document root
    pub root: PathBuf,
    pub handler: Arc<dyn FileHandler>,
}

impl AppState {
    /// Validate the document root and wire up the precompressed handler
    pub fn new(config: Config) -> Result<Self> {
        let root = config.canonical_root()?;
        let files = StaticFiles::new(
            root.clone(),
            config.files.index_files.clone(),
            config.files.directory_listing,
        );

        Ok(Self {
            config,
            root,
            handler: Arc::new(PrecompressedFiles::new(files)),
        })
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
