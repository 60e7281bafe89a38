//! Command line surface of `localrepo`.
//!
//! Parses the arguments, applies `-C` before anything touches the file system,
//! and hands the resolved options to the `repository` crate.

mod generate;
pub mod logging;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
pub use logging::init_global_subscriber;

/// Build a Composer package repository from per-version manifests.
///
/// Every `composer.<version>.json` next to the project's `composer.json` is
/// indexed into `<OUTPUT>/packages.json`, which Composer can consume as a
/// `composer` type repository.
#[derive(Parser)]
#[command(author, version, about, long_about)]
pub struct Args {
    /// Change the current working directory
    ///
    /// If specified, changes the current working directory to the given
    /// path before executing any commands. This affects all file system
    /// operations performed by the program, including configuration lookup.
    #[arg(short = 'C', value_name = "DIR", global = true, value_parser = validate_path)]
    working_directory: Option<PathBuf>,

    #[command(flatten)]
    log: LogArgs,

    #[command(flatten)]
    generate: generate::GenerateArgs,
}

/// Verbosity controls shared by every invocation.
#[derive(Parser, Clone, Copy, Debug)]
#[command(next_help_heading = "Log Options")]
pub struct LogArgs {
    /// Set the level of verbosity
    ///
    /// This flag can be used multiple times to increase verbosity:
    /// 1. -v    for DEBUG level
    /// 2. -vv   for TRACE level
    ///
    /// If not specified, defaults to INFO level.
    ///
    /// Alternatively, set the `RUST_LOG` environment variable (e.g., `RUST_LOG=info`), which takes
    /// precedence over this flag.
    ///
    /// **Note**: This flag is silently ignored when `--quiet` is also set.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
    )]
    verbosity: u8,

    /// Suppress verbosity (*takes precedent*)
    ///
    /// This flag can be used multiple times to decrease verbosity:
    /// 1. -q    for WARN level
    /// 2. -qq   for ERROR level
    ///
    /// This flag *overrides* any verbosity settings. It takes precedence over both the
    /// `--verbosity` flag and the `RUST_LOG` environment variable.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
    )]
    quiet: u8,
}

fn validate_path(path: &str) -> Result<PathBuf, std::io::Error> {
    std::fs::canonicalize(path)
}

/// Collect the process arguments, applying `-C <DIR>` as soon as it is seen.
///
/// The directory has to change before the configuration is first read, so it
/// cannot wait for argument parsing to finish. The `-C` value is replaced by
/// its canonical form, so that it still resolves once the directory changed.
pub fn change_directory() -> anyhow::Result<Vec<String>> {
    let cwd = std::env::current_dir().context("could not read the current directory")?;
    let (args, dir) = resolve_working_directory(std::env::args(), &cwd)?;
    if let Some(dir) = dir {
        std::env::set_current_dir(&dir)
            .with_context(|| format!("could not change directory to `{}`", dir.display()))?;
    }
    Ok(args)
}

/// Canonicalize the first `-C <DIR>` value against `base`, returning the rewritten
/// arguments together with the directory to change into.
fn resolve_working_directory<I>(
    args: I,
    base: &Path,
) -> anyhow::Result<(Vec<String>, Option<PathBuf>)>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut resolved = Vec::new();
    let mut dir = None;
    while let Some(arg) = args.next() {
        let flag = dir.is_none() && arg == "-C";
        resolved.push(arg);
        if !flag {
            continue;
        }
        if let Some(value) = args.next() {
            let path = std::fs::canonicalize(base.join(&value))
                .with_context(|| format!("invalid working directory `{}`", value))?;
            resolved.push(path.to_string_lossy().into_owned());
            dir = Some(path);
        }
    }
    Ok((resolved, dir))
}

impl Args {
    /// The verbosity flags, needed before the subscriber is installed.
    pub fn log(&self) -> LogArgs {
        self.log
    }
}

/// Generate the index and print the one-line summary to standard output.
pub fn run(args: Args) -> anyhow::Result<()> {
    if let Some(dir) = &args.working_directory {
        tracing::trace!(dir = %dir.display(), "working directory");
    }
    let summary = generate::run(args.generate, &config::CONFIG)?;
    println!("{}", summary);
    Ok(())
}
