//! Runs the scan → build → write pipeline once.

#[cfg(test)]
mod test;

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::index::{Index, Summary};
use crate::matrix::{self, DEFAULT_TYPE};
use crate::scan::{self, ManifestPattern};

/// Where the index is written when nothing else is asked for, relative to the root.
pub const DEFAULT_OUTPUT_DIR: &str = "build/local-repository";

//================================================================================================
// Types
//================================================================================================

/// Inputs of a single generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Directory scanned for manifests.
    pub root: PathBuf,
    /// Directory receiving `packages.json`.
    pub output: PathBuf,
    /// Naming convention of the manifests.
    pub pattern: ManifestPattern,
    /// `type` given to manifests that omit it.
    pub default_type: String,
}

//================================================================================================
// Impls
//================================================================================================

impl Options {
    /// Options for `root` with every other setting at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            output: root.join(DEFAULT_OUTPUT_DIR),
            root,
            pattern: ManifestPattern::default(),
            default_type: DEFAULT_TYPE.into(),
        }
    }

    /// Set the output directory; a relative path is taken relative to the root.
    pub fn output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = resolve(&self.root, output.as_ref());
        self
    }

    /// Set the manifest naming convention.
    pub fn pattern(mut self, pattern: ManifestPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the default package type.
    pub fn default_type(mut self, default_type: impl Into<String>) -> Self {
        self.default_type = default_type.into();
        self
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Scan `options.root`, build the package matrix and write the index.
///
/// Nothing is written unless at least one manifest is usable.
pub fn generate(options: &Options) -> Result<Summary, Error> {
    let files = scan::scan(&options.root, &options.pattern)?;
    if files.is_empty() {
        return Err(Error::NoManifests {
            pattern: options.pattern.to_string(),
            root: options.root.clone(),
        });
    }

    let matrix = matrix::build(&files, &options.default_type);
    if matrix.is_empty() {
        return Err(Error::NoPackages { found: files.len() });
    }

    Index::from(matrix).write(&options.output)
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
