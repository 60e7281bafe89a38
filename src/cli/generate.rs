//! This module defines the index generation options.
//!
//! Settings given on the command line take precedence over the loaded
//! configuration, which in turn falls back to built-in defaults.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use config::Config;
use repository::{ManifestPattern, Options, Summary};

//================================================================================================
// Types
//================================================================================================

/// Arguments controlling where manifests are read from and the index is written to.
#[derive(Parser, Debug)]
#[command(next_help_heading = "Index Options")]
pub(super) struct GenerateArgs {
    /// Directory to write `packages.json` into
    ///
    /// Relative paths are resolved against the project root. Defaults to
    /// `build/local-repository` unless configured otherwise.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Directory to write `packages.json` into (takes precedence over OUTPUT)
    #[arg(long = "output", short = 'o', value_name = "DIR")]
    output_flag: Option<PathBuf>,

    /// The project root holding `composer.json` and its per-version manifests
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Package type given to manifests that do not declare one
    #[arg(long, value_name = "TYPE")]
    default_type: Option<String>,
}

//================================================================================================
// Impls
//================================================================================================

impl GenerateArgs {
    fn into_options(self, config: &Config) -> Options {
        let output = self
            .output_flag
            .or(self.output)
            .unwrap_or_else(|| config.output.clone());
        let default_type = self
            .default_type
            .unwrap_or_else(|| config.manifest.default_type.clone());

        Options::new(self.root)
            .output(output)
            .pattern(ManifestPattern::new(
                &config.manifest.prefix,
                &config.manifest.suffix,
            ))
            .default_type(default_type)
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Generate the package index.
pub(super) fn run(args: GenerateArgs, config: &Config) -> Result<Summary> {
    let options = args.into_options(config);
    tracing::debug!(
        root = %options.root.display(),
        output = %options.output.display(),
        pattern = %options.pattern,
        default_type = %options.default_type,
        "generating package index"
    );
    Ok(repository::generate(&options)?)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    fn parse(argv: &[&str]) -> GenerateArgs {
        GenerateArgs::try_parse_from(std::iter::once("localrepo").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn output_flag_wins_over_positional() {
        let config = Config::default();
        let options = parse(&["--root", "/srv/project", "positional", "--output", "flag"])
            .into_options(&config);
        assert_eq!(options.output, Path::new("/srv/project/flag"));

        let options = parse(&["--root", "/srv/project", "positional"]).into_options(&config);
        assert_eq!(options.output, Path::new("/srv/project/positional"));

        let options = parse(&["--root", "/srv/project", "--output=/abs/out"]).into_options(&config);
        assert_eq!(options.output, Path::new("/abs/out"));
    }

    #[test]
    fn falls_back_to_configuration() {
        let mut config = Config::default();
        config.output = PathBuf::from("dist/repo");
        config.manifest.prefix = "package".into();
        config.manifest.default_type = "library".into();

        let options = parse(&["--root", "/srv/project"]).into_options(&config);
        assert_eq!(options.output, Path::new("/srv/project/dist/repo"));
        assert_eq!(options.pattern, ManifestPattern::new("package", "json"));
        assert_eq!(options.default_type, "library");

        let options = parse(&["--root", "/srv/project", "--default-type", "project"])
            .into_options(&config);
        assert_eq!(options.default_type, "project");
    }

    #[test]
    fn run_writes_index() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join("composer.json"), r#"{"name":"vendor/root"}"#)?;
        fs::write(
            tmp.path().join("composer.1.0.0.json"),
            r#"{"name":"vendor/pkg"}"#,
        )?;

        let root = tmp.path().to_string_lossy().into_owned();
        let summary = run(parse(&["--root", &root]), &Config::default())?;
        assert_eq!(summary.versions, 1);
        assert_eq!(summary.packages, 1);

        let written: serde_json::Value = serde_json::from_slice(&fs::read(&summary.path)?)?;
        assert_eq!(written["packages"]["vendor/pkg"]["1.0.0"]["type"], "metapackage");
        Ok(())
    }

    #[test]
    fn run_fails_without_manifests() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_string_lossy().into_owned();

        let err = run(parse(&["--root", &root]), &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("No composer.*.json files found"));
        assert!(!tmp.path().join("build").exists());
        Ok(())
    }
}
