//! Flavor template library on disk.
//!
//! Every regular file in the template directory is one template. Files are
//! read in file name order so selection order is stable across runs.

use flavor_migrate_schema::{FlavorTemplate, SchemaError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub fn load_template_library(dir: &Path) -> Result<Vec<FlavorTemplate>, LibraryError> {
    let entries = fs::read_dir(dir).map_err(|source| LibraryError::ReadDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LibraryError::ReadDir {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-file template entry");
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in &paths {
        templates.push(load_template(path)?);
    }
    info!(dir = %dir.display(), count = templates.len(), "template library loaded");
    Ok(templates)
}

fn load_template(path: &Path) -> Result<FlavorTemplate, LibraryError> {
    let bytes = fs::read(path).map_err(|source| LibraryError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    FlavorTemplate::from_slice(&bytes).map_err(|source| LibraryError::ParseTemplate {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("failed to read template directory: {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template at {path}: {source}")]
    ParseTemplate {
        path: String,
        #[source]
        source: SchemaError,
    },
}
