//! localrepo, a generator for local Composer package repositories.
//!
//! The heavy lifting lives in the `repository` crate; this crate provides the
//! command line surface around it.

#![warn(missing_docs)]

pub mod cli;
