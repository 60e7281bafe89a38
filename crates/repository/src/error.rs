//! # Repository Errors
//!
//! Fatal errors abort a run; [`ManifestError`]s only cost the offending file.

use std::path::PathBuf;

use thiserror::Error;

//================================================================================================
// Types
//================================================================================================

/// An error that aborts index generation.
#[derive(Error, Debug)]
pub enum Error {
    /// The project root could not be listed.
    #[error("Failed to read the project root `{}`", .path.display())]
    ReadDir {
        /// The directory that was being scanned.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// No file matched the manifest naming convention.
    #[error("No {pattern} files found in `{}`", .root.display())]
    NoManifests {
        /// The glob-like description of the naming convention.
        pattern: String,
        /// The directory that was scanned.
        root: PathBuf,
    },
    /// Every candidate manifest was skipped.
    #[error("None of the {found} manifest file(s) produced a usable package")]
    NoPackages {
        /// How many candidate files were found.
        found: usize,
    },
    /// The output directory could not be created.
    #[error("Failed to create output directory `{}`", .path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The index document could not be encoded.
    #[error("Failed to encode the package index")]
    Serialize(#[source] serde_json::Error),
    /// The index file could not be written.
    #[error("Failed to write `{}`", .path.display())]
    Write {
        /// The destination file.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// An error confined to a single manifest file; the file is skipped.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("Unable to read manifest")]
    Read(#[source] std::io::Error),
    /// The file is not valid JSON.
    #[error("Malformed manifest")]
    Parse(#[source] serde_json::Error),
    /// The file is valid JSON, but not an object.
    #[error("Manifest is not a JSON object")]
    NotAnObject,
    /// The `name` field is absent, empty or not a string.
    #[error("Missing 'name' in manifest")]
    MissingName,
}

//================================================================================================
// Impls
//================================================================================================

impl ManifestError {
    /// Warn the user that the manifest at `path` is being skipped.
    pub fn warn(&self, path: &std::path::Path) {
        match self {
            ManifestError::Read(e) => {
                tracing::warn!(path = %path.display(), error = %e, "{}, skipping", self);
            },
            ManifestError::Parse(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = e.line(),
                    column = e.column(),
                    error = %e,
                    "{}, skipping",
                    self
                );
            },
            _ => tracing::warn!(path = %path.display(), "{}, skipping", self),
        }
    }
}
