//! # Index Writer
//!
//! Lays the [`PackageMatrix`] out as the repository document Composer reads:
//!
//! ```json
//! {
//!     "packages": {
//!         "vendor/pkg": {
//!             "2.0.0": { "name": "vendor/pkg", "type": "library", "version": "2.0.0" },
//!             "1.0.0": { "name": "vendor/pkg", "version": "1.0.0", "type": "metapackage" }
//!         }
//!     }
//! }
//! ```
//!
//! Packages are ordered by name and versions from newest to oldest, so the same
//! set of manifests always yields byte-identical output. Within a payload the
//! manifest's own field order is kept, with `version` and `type` appended when
//! the manifest lacks them.

#[cfg(test)]
mod test;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tempfile::NamedTempFile;

use crate::error::Error;
use crate::matrix::{PackageMatrix, Payload};
use crate::version;

/// The file name of the generated index.
pub const INDEX_FILE_NAME: &str = "packages.json";

//================================================================================================
// Types
//================================================================================================

/// A JSON object whose entries are emitted in insertion order.
#[derive(Debug, Clone, PartialEq)]
struct OrderedMap<V>(Vec<(String, V)>);

/// The repository document, ready to be written.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Index {
    packages: OrderedMap<OrderedMap<Payload>>,
}

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of versions across all packages.
    pub versions: usize,
    /// Number of distinct packages.
    pub packages: usize,
    /// The index file that was written.
    pub path: PathBuf,
}

//================================================================================================
// Impls
//================================================================================================

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl From<PackageMatrix> for Index {
    fn from(matrix: PackageMatrix) -> Self {
        // the matrix already iterates by package name
        let packages = matrix
            .into_iter()
            .map(|(name, versions)| {
                let mut versions: Vec<_> = versions.into_iter().collect();
                versions.sort_by(|(a, _), (b, _)| version::descending(a, b));
                (name, OrderedMap(versions))
            })
            .collect();
        Index {
            packages: OrderedMap(packages),
        }
    }
}

impl Index {
    /// Package names in output order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.0.iter().map(|(name, _)| name.as_str())
    }

    /// Versions of a package in output order.
    pub fn versions(&self, package: &str) -> Option<Vec<&str>> {
        self.packages
            .0
            .iter()
            .find(|(name, _)| name == package)
            .map(|(_, versions)| versions.0.iter().map(|(v, _)| v.as_str()).collect())
    }

    /// Number of distinct packages.
    pub fn package_count(&self) -> usize {
        self.packages.0.len()
    }

    /// Number of versions across all packages.
    pub fn version_count(&self) -> usize {
        self.packages.0.iter().map(|(_, v)| v.0.len()).sum()
    }

    /// Encode the document as indented JSON with a trailing newline.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(Error::Serialize)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Write `packages.json` into `output_dir`, creating the directory if needed.
    ///
    /// The file is staged next to its destination and renamed into place, so a
    /// failed write never leaves a truncated index behind.
    pub fn write(&self, output_dir: &Path) -> Result<Summary, Error> {
        let json = self.to_json()?;

        fs::create_dir_all(output_dir).map_err(|source| Error::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let path = output_dir.join(INDEX_FILE_NAME);
        let write_err = |source: std::io::Error| Error::Write {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::with_prefix_in(format!(".{}", INDEX_FILE_NAME), output_dir)
            .map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(write_err)?;
        }
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path.display(), bytes = json.len(), "wrote package index");

        Ok(Summary {
            versions: self.version_count(),
            packages: self.package_count(),
            path,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {} package version(s) for {} package(s) in {}",
            self.versions,
            self.packages,
            self.path.display()
        )
    }
}
