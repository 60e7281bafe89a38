//! # Manifest Scanner
//!
//! Discovers the per-version manifests living next to the project's own
//! manifest. A per-version manifest is named `<prefix>.<version>.<suffix>`,
//! e.g. `composer.6.5.0.0.json`; the version token is taken verbatim from
//! the file name. The project manifest, `<prefix>.<suffix>`, is never
//! part of the scan.


use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::Error;
use crate::version::natural_cmp;

/// The literal prefix of Composer manifests.
pub const DEFAULT_PREFIX: &str = "composer";
/// The literal suffix of Composer manifests.
pub const DEFAULT_SUFFIX: &str = "json";

//================================================================================================
// Types
//================================================================================================

/// The naming convention shared by all manifests of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPattern {
    prefix: String,
    suffix: String,
}

/// Reasons a file name is not a per-version manifest.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatternError {
    /// The name is the project's own manifest.
    #[error("file is the project manifest")]
    ProjectManifest,
    /// The name does not follow `<prefix>.<version>.<suffix>`.
    #[error("file name does not match the manifest pattern")]
    Mismatch,
    /// The name matches, but carries no version token.
    #[error("file name carries an empty version")]
    EmptyVersion,
}

/// A discovered per-version manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Location of the manifest on disk.
    pub path: PathBuf,
    /// The version token embedded in the file name.
    pub version: String,
}

//================================================================================================
// Impls
//================================================================================================

impl Default for ManifestPattern {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}

impl fmt::Display for ManifestPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.*.{}", self.prefix, self.suffix)
    }
}

impl ManifestPattern {
    /// Create a pattern for `<prefix>.<version>.<suffix>` file names.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The file name of the project's own manifest, e.g. `composer.json`.
    pub fn project_manifest(&self) -> String {
        format!("{}.{}", self.prefix, self.suffix)
    }

    /// Extract the version token from a manifest file name.
    pub fn parse_version<'a>(&self, file_name: &'a str) -> Result<&'a str, PatternError> {
        if file_name == self.project_manifest() {
            return Err(PatternError::ProjectManifest);
        }

        let version = file_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or(PatternError::Mismatch)?;

        if version.is_empty() {
            return Err(PatternError::EmptyVersion);
        }
        Ok(version)
    }
}

impl ManifestFile {
    /// The file name, for diagnostics.
    pub fn file_name(&self) -> std::borrow::Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }
}

//================================================================================================
// Functions
//================================================================================================

/// List the per-version manifests directly inside `root`, in natural file name order.
///
/// Finding nothing is not an error here; callers decide what an empty scan means.
pub fn scan(root: &Path, pattern: &ManifestPattern) -> Result<Vec<ManifestFile>, Error> {
    let read_dir_err = |source: std::io::Error| Error::ReadDir {
        path: root.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(root).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
            tracing::trace!(path = %path.display(), "ignoring non UTF-8 file name");
            continue;
        };

        let version = match pattern.parse_version(&name) {
            Ok(v) => v.to_owned(),
            Err(e) => {
                tracing::trace!(file = %name, reason = %e, "ignoring");
                continue;
            },
        };

        if !path.is_file() {
            tracing::trace!(file = %name, "ignoring non-file entry");
            continue;
        }

        found.push((name, ManifestFile { path, version }));
    }

    found.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    tracing::debug!(root = %root.display(), count = found.len(), "scanned for manifests");

    Ok(found.into_iter().map(|(_, file)| file).collect())
}
