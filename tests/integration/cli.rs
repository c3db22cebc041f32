use super::nvr_path;
use assert_cmd::Command;
use httpmock::prelude::*;
use nvrmap_cli::test_utils::catalog_body;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `nvrmap` isolated from the user's config and environment.
fn nvrmap(server: &MockServer, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nvrmap").unwrap();
    cmd.current_dir(dir)
        .env("NVRMAP_CONFIG", dir.join("absent-config.toml"))
        .env_remove("NVRMAP_BASE_URL")
        .env_remove("NVRMAP_MAPPING_PATH")
        .env_remove("RUST_LOG")
        .args(["--base-url", &server.url("/api/containers/v1/images/nvr")]);
    cmd
}

#[test]
fn test_resolve_prints_content_sets_and_writes_default_mapping() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("foo-bar-1.0-1"));
        then.status(200).json_body(catalog_body(&[(
            &["rhel-8-for-x86_64-baseos-rpms"][..],
            &["cpe:/o:redhat:rhel:8"][..],
        )]));
    });

    nvrmap(&server, temp.path())
        .args(["resolve", "foo-bar-1.0-1", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout("rhel-8-for-x86_64-baseos-rpms\n");

    let content = std::fs::read_to_string(temp.path().join("nvr-mapping.json")).unwrap();
    assert!(content.contains("\"foo-bar-1.0-1//x86_64\""));
    assert!(content.contains("cpe:/o:redhat:rhel:8"));
}

#[test]
fn test_resolve_unknown_build_prints_nothing() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("unknown-1-1"));
        then.status(200).json_body(catalog_body(&[]));
    });

    nvrmap(&server, temp.path())
        .args(["resolve", "unknown-1-1", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout("");

    assert!(!temp.path().join("nvr-mapping.json").exists());
}

#[test]
fn test_resolve_ambiguous_fails_with_message() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("dup-1-1"));
        then.status(200).json_body(catalog_body(&[(&["a"][..], &[][..]), (&["b"][..], &[][..])]));
    });

    nvrmap(&server, temp.path())
        .args(["resolve", "dup-1-1", "--arch", "x86_64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ambiguous response"));
}

#[test]
fn test_resolve_rejects_separator_in_arch() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();

    nvrmap(&server, temp.path())
        .args(["resolve", "foo-1-1", "--arch", "x86//64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid architecture"));
}

#[test]
fn test_resolve_many_json_and_custom_mapping() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    for (nvr, cs) in [("foo-1-1", "cs-foo"), ("bar-1-1", "cs-bar")] {
        server.mock(move |when, then| {
            when.method(GET).path(nvr_path(nvr));
            then.status(200).json_body(catalog_body(&[(&[cs][..], &["cpe"][..])]));
        });
    }
    let mapping = temp.path().join("out").join("custom.json");

    let output = nvrmap(&server, temp.path())
        .args(["--mapping", mapping.to_str().unwrap()])
        .args(["resolve", "foo-1-1", "bar-1-1", "--arch", "s390x", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value, serde_json::json!({ "bar-1-1": ["cs-bar"], "foo-1-1": ["cs-foo"] }));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&mapping).unwrap()).unwrap();
    assert_eq!(stored["foo-1-1//s390x"]["content_sets"][0], "cs-foo");
    assert_eq!(stored["bar-1-1//s390x"]["arch"], "s390x");
}

#[test]
fn test_show_after_resolve() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("foo-1-1"));
        then.status(200).json_body(catalog_body(&[(&["cs-a"][..], &["cpe:/a:redhat:x:1"][..])]));
    });

    nvrmap(&server, temp.path())
        .args(["resolve", "foo-1-1", "--arch", "x86_64"])
        .assert()
        .success();

    nvrmap(&server, temp.path())
        .args(["show", "foo-1-1", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout("foo-1-1//x86_64\tcs-a\tcpe:/a:redhat:x:1\n");

    nvrmap(&server, temp.path())
        .args(["show", "missing-1-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cached entry for missing-1-1"));
}
