use std::fs;

use super::*;

fn sample_matrix() -> anyhow::Result<PackageMatrix> {
    let mut matrix = PackageMatrix::default();
    matrix.insert("1.0.0", br#"{"name":"vendor/pkg"}"#, "metapackage")?;
    matrix.insert(
        "2.0.0",
        br#"{"name":"vendor/pkg","type":"library"}"#,
        "metapackage",
    )?;
    Ok(matrix)
}

#[test]
fn orders_packages_by_name_and_versions_descending() -> anyhow::Result<()> {
    let mut matrix = PackageMatrix::default();
    for (version, name) in [
        ("1.9.0", "zeta/z"),
        ("1.10.0", "zeta/z"),
        ("1.2.0", "zeta/z"),
        ("0.1.0", "alpha/a"),
        ("1.0.0-RC1", "beta/b"),
        ("1.0.0", "beta/b"),
    ] {
        matrix.insert(version, format!(r#"{{"name":"{name}"}}"#).as_bytes(), "metapackage")?;
    }

    let index = Index::from(matrix);
    assert_eq!(
        index.package_names().collect::<Vec<_>>(),
        ["alpha/a", "beta/b", "zeta/z"]
    );
    assert_eq!(
        index.versions("zeta/z"),
        Some(vec!["1.10.0", "1.9.0", "1.2.0"])
    );
    assert_eq!(index.versions("beta/b"), Some(vec!["1.0.0", "1.0.0-RC1"]));
    assert_eq!(index.versions("missing/pkg"), None);
    assert_eq!(index.package_count(), 3);
    assert_eq!(index.version_count(), 6);
    Ok(())
}

#[test]
fn document_layout() -> anyhow::Result<()> {
    let index = Index::from(sample_matrix()?);
    insta::assert_snapshot!(
        serde_json::to_string(&index)?,
        @r#"{"packages":{"vendor/pkg":{"2.0.0":{"name":"vendor/pkg","type":"library","version":"2.0.0"},"1.0.0":{"name":"vendor/pkg","version":"1.0.0","type":"metapackage"}}}}"#
    );
    Ok(())
}

#[test]
fn pretty_output_keeps_slashes_unescaped() -> anyhow::Result<()> {
    let index = Index::from(sample_matrix()?);
    let json = String::from_utf8(index.to_json()?)?;
    let expected = r#"{
    "packages": {
        "vendor/pkg": {
            "2.0.0": {
                "name": "vendor/pkg",
                "type": "library",
                "version": "2.0.0"
            },
            "1.0.0": {
                "name": "vendor/pkg",
                "version": "1.0.0",
                "type": "metapackage"
            }
        }
    }
}
"#;
    assert_eq!(json, expected);
    assert!(!json.contains("\\/"));
    Ok(())
}

#[test]
fn write_creates_directories_and_reports_counts() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("build").join("local-repository");
    let index = Index::from(sample_matrix()?);

    let summary = index.write(&out)?;
    assert_eq!(summary.path, out.join(INDEX_FILE_NAME));
    assert_eq!(summary.versions, 2);
    assert_eq!(summary.packages, 1);
    assert_eq!(
        summary.to_string(),
        format!(
            "Generated 2 package version(s) for 1 package(s) in {}",
            out.join("packages.json").display()
        )
    );
    assert_eq!(fs::read(&summary.path)?, index.to_json()?);

    // only the index remains, the staging file was renamed into place
    let entries: Vec<_> = fs::read_dir(&out)?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn write_replaces_previous_index() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    fs::write(tmp.path().join(INDEX_FILE_NAME), "stale contents that are longer than needed")?;

    let index = Index::from(sample_matrix()?);
    index.write(tmp.path())?;
    assert_eq!(fs::read(tmp.path().join(INDEX_FILE_NAME))?, index.to_json()?);
    Ok(())
}

#[test]
fn write_fails_when_output_is_a_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "")?;

    let err = Index::from(sample_matrix()?)
        .write(&blocker.join("out"))
        .unwrap_err();
    assert!(matches!(err, Error::CreateDir { .. }), "{err:?}");
    Ok(())
}
