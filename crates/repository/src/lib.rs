//! # Repository Crate
//!
//! The `repository` crate turns a directory of per-version Composer manifests
//! into a local package repository that Composer can resolve against.
//!
//! ## Key Concepts
//!
//! A project keeps its own manifest as `composer.json`. Every released version
//! sits next to it as `composer.<version>.json`, e.g. `composer.6.5.0.0.json`.
//! The version token in the file name is authoritative: it replaces whatever
//! `version` the manifest itself claims.
//!
//! ## Architecture
//!
//! Generation runs strictly forward through three steps:
//! - [`scan`] - Finds the per-version manifests and derives their versions.
//! - [`matrix`] - Parses the manifests into a name → version → payload matrix.
//! - [`index`] - Orders the matrix and writes `packages.json`.
//!
//! [`version`] provides the orderings shared by these steps, and [`generate()`]
//! wires them together.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use repository::{Options, generate};
//!
//! let summary = generate(&Options::new(".").output("dist/repo"))?;
//! println!("{}", summary);
//! # Ok::<(), repository::Error>(())
//! ```

#![deny(missing_docs)]

pub use self::error::{Error, ManifestError};
pub use self::generate::{DEFAULT_OUTPUT_DIR, Options, generate};
pub use self::index::{INDEX_FILE_NAME, Index, Summary};
pub use self::matrix::{PackageMatrix, Payload};
pub use self::scan::{ManifestFile, ManifestPattern};

mod error;
mod generate;
pub mod index;
pub mod log;
pub mod matrix;
pub mod scan;
pub mod version;
