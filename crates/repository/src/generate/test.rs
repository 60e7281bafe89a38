use std::fs;

use super::*;
use crate::INDEX_FILE_NAME;

fn write(dir: &Path, name: &str, contents: &str) -> std::io::Result<()> {
    fs::write(dir.join(name), contents)
}

#[test]
fn end_to_end() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write(tmp.path(), "composer.json", r#"{"name":"vendor/project"}"#)?;
    write(tmp.path(), "composer.1.0.0.json", r#"{"name":"vendor/pkg"}"#)?;
    write(
        tmp.path(),
        "composer.2.0.0.json",
        r#"{"name":"vendor/pkg","type":"library"}"#,
    )?;

    let options = Options::new(tmp.path());
    let summary = generate(&options)?;
    assert_eq!(summary.versions, 2);
    assert_eq!(summary.packages, 1);
    assert_eq!(
        summary.path,
        tmp.path().join(DEFAULT_OUTPUT_DIR).join(INDEX_FILE_NAME)
    );

    let written: serde_json::Value = serde_json::from_slice(&fs::read(&summary.path)?)?;
    assert_eq!(
        written,
        serde_json::json!({
            "packages": {
                "vendor/pkg": {
                    "2.0.0": { "name": "vendor/pkg", "type": "library", "version": "2.0.0" },
                    "1.0.0": { "name": "vendor/pkg", "type": "metapackage", "version": "1.0.0" },
                }
            }
        })
    );
    Ok(())
}

#[test]
fn runs_are_idempotent() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    for (version, name) in [("1.9.0", "a/a"), ("1.10.0", "a/a"), ("0.1.0", "b/b")] {
        write(
            tmp.path(),
            &format!("composer.{version}.json"),
            &format!(r#"{{"name":"{name}","require":{{"php":">=8.1"}}}}"#),
        )?;
    }

    let options = Options::new(tmp.path()).output("out");
    let first = fs::read(generate(&options)?.path)?;
    let second = fs::read(generate(&options)?.path)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn survivors_are_the_usable_manifests() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write(tmp.path(), "composer.1.0.json", r#"{"name":"a/a"}"#)?;
    write(tmp.path(), "composer.2.0.json", r#"{"name":""}"#)?;
    write(tmp.path(), "composer.3.0.json", r#"{"description":"no name"}"#)?;
    write(tmp.path(), "composer.4.0.json", "not json at all")?;

    let summary = generate(&Options::new(tmp.path()))?;
    assert_eq!(summary.versions, 1);
    assert_eq!(summary.packages, 1);

    let written = fs::read_to_string(&summary.path)?;
    assert!(!written.contains("2.0"));
    assert!(!written.contains("no name"));
    Ok(())
}

#[test]
fn no_manifests_writes_nothing() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write(tmp.path(), "composer.json", r#"{"name":"vendor/project"}"#)?;

    let options = Options::new(tmp.path());
    let err = generate(&options).unwrap_err();
    assert!(matches!(err, Error::NoManifests { .. }), "{err:?}");
    assert!(!options.output.exists());
    Ok(())
}

#[test]
fn no_usable_packages_writes_nothing() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write(tmp.path(), "composer.1.0.json", r#"{"name":""}"#)?;
    write(tmp.path(), "composer.2.0.json", "{")?;

    let options = Options::new(tmp.path());
    let err = generate(&options).unwrap_err();
    assert!(matches!(err, Error::NoPackages { found: 2 }), "{err:?}");
    assert!(!options.output.exists());
    Ok(())
}

#[test]
fn existing_index_is_left_alone_on_failure() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let options = Options::new(tmp.path()).output("out");
    fs::create_dir_all(&options.output)?;
    let existing = options.output.join(INDEX_FILE_NAME);
    fs::write(&existing, "previous")?;

    assert!(generate(&options).is_err());
    assert_eq!(fs::read_to_string(&existing)?, "previous");
    Ok(())
}

#[test]
fn options_resolve_output_against_root() {
    let root = Path::new("/srv/project");
    assert_eq!(
        Options::new(root).output,
        root.join("build/local-repository")
    );
    assert_eq!(Options::new(root).output("dist").output, root.join("dist"));
    assert_eq!(
        Options::new(root).output("/tmp/repo").output,
        PathBuf::from("/tmp/repo")
    );
}

#[test]
fn custom_pattern_and_default_type() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write(tmp.path(), "package.1.0.json", r#"{"name":"a/a"}"#)?;
    write(tmp.path(), "composer.2.0.json", r#"{"name":"a/a"}"#)?;

    let options = Options::new(tmp.path())
        .pattern(ManifestPattern::new("package", "json"))
        .default_type("library");
    let summary = generate(&options)?;
    assert_eq!(summary.versions, 1);

    let written: serde_json::Value = serde_json::from_slice(&fs::read(&summary.path)?)?;
    assert_eq!(written["packages"]["a/a"]["1.0"]["type"], "library");
    Ok(())
}
