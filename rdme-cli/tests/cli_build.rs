use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const MANIFEST: &str = r##"
- id: index
  path: rendered/index.md
- id: api/index
  body: "# API\n\nSee [auth](../auth.md#tokens).\n"
- id: auth
  body: "Tokens are issued per project.\n"
  metadata:
    rdme-slug: cli-auth
    rdme-hidden: "true"
"##;

fn write_project(dir: &std::path::Path) -> std::io::Result<()> {
    fs::create_dir_all(dir.join("rendered"))?;
    fs::write(dir.join("rendered/index.md"), "# Home\n\nWelcome.\n")?;
    fs::write(dir.join("docs.yml"), MANIFEST)?;
    fs::write(
        dir.join("rdme.yml"),
        "default_frontmatter:\n  category: documentation\n",
    )?;
    Ok(())
}

#[test]
fn build_writes_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.yml", "--out", "out"])
        .assert()
        .success();

    let out = dir.path().join("out");
    let index = fs::read_to_string(out.join("00_index.md"))?;
    assert!(index.starts_with("---\ntitle: \"Home\"\nslug: \"index\"\n"));
    assert!(index.contains("category: \"documentation\"\n"));
    assert!(index.ends_with("---\n\n# Home\n\nWelcome.\n"));

    let api = fs::read_to_string(out.join("api/00_index.md"))?;
    assert!(api.contains("slug: \"api-index\"\n"));
    assert!(api.contains("See [auth](cli-auth#tokens)."));

    let auth = fs::read_to_string(out.join("auth.md"))?;
    assert!(auth.contains("slug: \"cli-auth\"\n"));
    assert!(auth.contains("hidden: true\n"));

    Ok(())
}

#[test]
fn build_without_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;
    fs::remove_file(dir.path().join("rdme.yml"))?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.yml", "--out", "out"])
        .assert()
        .success();

    let index = fs::read_to_string(dir.path().join("out/00_index.md"))?;
    assert!(!index.contains("category"));
    Ok(())
}

#[test]
fn build_rejects_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;
    fs::write(dir.path().join("rdme.yml"), "excerpt_max_length: 0\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.yml", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    Ok(())
}

#[test]
fn build_rejects_empty_slug() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("docs.json"), r#"[{"id": "__", "body": ""}]"#)?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.json", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty slug"));

    Ok(())
}

#[test]
fn slugs_lists_every_document() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["slugs", "--manifest", "docs.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api/index -> api-index"))
        .stdout(predicate::str::contains("auth -> cli-auth"))
        .stdout(predicate::str::contains("index -> index"));

    Ok(())
}

#[test]
fn slugs_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["slugs", "--manifest", "docs.yml", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["auth"], "cli-auth");
    assert_eq!(value["api/index"], "api-index");
    assert_eq!(value.as_object().map(|o| o.len()), Some(3));

    Ok(())
}

#[test]
fn build_refuses_to_write_outside_out_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("docs.json"),
        r#"[{"id": "safe", "body": "ok"}, {"id": "../escaped", "body": "nope"}]"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.json", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document id"));

    assert!(!dir.path().join("escaped.md").exists());
    assert!(!dir.path().join("out/safe.md").exists());
    Ok(())
}

#[test]
fn build_rejects_duplicate_ids() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("docs.json"),
        r#"[{"id": "dup", "body": "first"}, {"id": "dup", "body": "second"}]"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("rdme")?
        .current_dir(dir.path())
        .args(["build", "--manifest", "docs.json", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("appears more than once"));

    assert!(!dir.path().join("out/dup.md").exists());
    Ok(())
}
