//! # Package Matrix
//!
//! The in-memory aggregate of every usable manifest, keyed by package name and
//! then by version token. Manifests pass through untouched apart from two
//! fields: `version` always mirrors the token from the file name, and `type`
//! falls back to a default when the manifest does not set one.
//!
//! A manifest that cannot be read or parsed, or that lacks a non-empty
//! `name`, is reported through [`ManifestError::warn`] and left out; it never
//! fails the whole build.


use std::collections::BTreeMap;
use std::fs;

use serde_json::Value;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::error::ManifestError;
use crate::scan::ManifestFile;

/// The field naming the package.
pub const NAME_KEY: &str = "name";
/// The field overwritten with the version token.
pub const VERSION_KEY: &str = "version";
/// The field receiving the default package type when absent or null.
pub const TYPE_KEY: &str = "type";
/// The package type given to manifests without one.
pub const DEFAULT_TYPE: &str = "metapackage";

//================================================================================================
// Types
//================================================================================================

/// A manifest's contents: arbitrary JSON fields keyed by name, in the order the
/// manifest lists them.
pub type Payload = serde_json::Map<String, Value>;

/// Package name → version token → payload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PackageMatrix {
    packages: BTreeMap<String, BTreeMap<String, Payload>>,
}

//================================================================================================
// Impls
//================================================================================================

impl PackageMatrix {
    /// Read the manifest at `file.path` and add it under its version token.
    pub fn insert_manifest(
        &mut self,
        file: &ManifestFile,
        default_type: &str,
    ) -> Result<(), ManifestError> {
        let contents = fs::read(&file.path).map_err(ManifestError::Read)?;
        self.insert(&file.version, &contents, default_type)
    }

    /// Parse `contents` as a manifest and add it under `version`.
    ///
    /// An existing entry for the same name and version is replaced.
    pub fn insert(
        &mut self,
        version: &str,
        contents: &[u8],
        default_type: &str,
    ) -> Result<(), ManifestError> {
        let Value::Object(mut payload) =
            serde_json::from_slice::<Value>(contents).map_err(ManifestError::Parse)?
        else {
            return Err(ManifestError::NotAnObject);
        };

        let name = match payload.get(NAME_KEY) {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(ManifestError::MissingName),
        };

        payload.insert(VERSION_KEY.into(), Value::String(version.into()));
        if matches!(payload.get(TYPE_KEY), None | Some(Value::Null)) {
            payload.insert(TYPE_KEY.into(), Value::String(default_type.into()));
        }

        let versions = self.packages.entry(name.clone()).or_default();
        if versions.insert(version.into(), payload).is_some() {
            tracing::debug!(package = %name, version, "replacing previously indexed manifest");
        }
        Ok(())
    }

    /// Look up the payload indexed for a package version.
    pub fn get(&self, name: &str, version: &str) -> Option<&Payload> {
        self.packages.get(name)?.get(version)
    }

    /// Iterate over packages and their versions, by package name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Payload>)> {
        self.packages.iter()
    }

    /// Whether no package has been indexed.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of distinct package names.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of versions across all packages.
    pub fn version_count(&self) -> usize {
        self.packages.values().map(BTreeMap::len).sum()
    }
}

impl IntoIterator for PackageMatrix {
    type IntoIter = std::collections::btree_map::IntoIter<String, BTreeMap<String, Payload>>;
    type Item = (String, BTreeMap<String, Payload>);

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Build the matrix from scanned manifests, skipping the ones that are unusable.
pub fn build(files: &[ManifestFile], default_type: &str) -> PackageMatrix {
    let mut matrix = PackageMatrix::default();

    let span = tracing::info_span!("build");
    crate::log::set_bar(&span, "indexing manifests", files.len() as u64);
    let _enter = span.enter();

    let mut skipped = 0usize;
    for file in files {
        tracing::trace!(file = %file.file_name(), version = %file.version, "indexing");
        if let Err(e) = matrix.insert_manifest(file, default_type) {
            e.warn(&file.path);
            skipped += 1;
        }
        span.pb_inc(1);
    }

    tracing::debug!(
        packages = matrix.package_count(),
        versions = matrix.version_count(),
        skipped,
        "built package matrix"
    );
    matrix
}
