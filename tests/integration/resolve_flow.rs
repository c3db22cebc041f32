use super::{nvr_path, resolver_for};
use httpmock::prelude::*;
use nvrmap_cli::core::NvrmapError;
use nvrmap_cli::test_utils::catalog_body;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_single_block_is_returned_and_cached() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("nvr-mapping.json");
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(nvr_path("foo-bar-1.0-1"))
            .query_param("filter", "parsed_data.labels=em=(name=='architecture'andvalue=='x86_64')");
        then.status(200).json_body(json!({
            "data": [{
                "content_sets": ["rhel-8-for-x86_64-baseos-rpms"],
                "cpe_ids": ["cpe:/o:redhat:rhel:8"]
            }]
        }));
    });

    let resolver = resolver_for(&server, &mapping);
    let content_sets = resolver.resolve_content_sets("foo-bar-1.0-1", "x86_64").await.unwrap();

    mock.assert();
    assert_eq!(content_sets, vec!["rhel-8-for-x86_64-baseos-rpms"]);

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&mapping).unwrap()).unwrap();
    assert_eq!(
        stored,
        json!({
            "foo-bar-1.0-1//x86_64": {
                "nvr": "foo-bar-1.0-1",
                "arch": "x86_64",
                "content_sets": ["rhel-8-for-x86_64-baseos-rpms"],
                "cpe_ids": ["cpe:/o:redhat:rhel:8"]
            }
        })
    );
}

#[tokio::test]
async fn test_empty_catalog_answer_leaves_existing_store_unchanged() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("nvr-mapping.json");
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("known-1-1"));
        then.status(200).json_body(catalog_body(&[(&["cs-known"][..], &["cpe"][..])]));
    });
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("unknown-1-1"));
        then.status(200).json_body(json!({ "data": [] }));
    });

    let resolver = resolver_for(&server, &mapping);
    resolver.resolve_content_sets("known-1-1", "x86_64").await.unwrap();
    let before = std::fs::read_to_string(&mapping).unwrap();

    let content_sets = resolver.resolve_content_sets("unknown-1-1", "x86_64").await.unwrap();
    assert!(content_sets.is_empty());
    assert_eq!(std::fs::read_to_string(&mapping).unwrap(), before);
}

#[tokio::test]
async fn test_ambiguous_answer_fails_and_leaves_store_unchanged() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("nvr-mapping.json");
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("dup-1-1"));
        then.status(200)
            .json_body(catalog_body(&[(&["a"][..], &[][..]), (&["b"][..], &[][..]), (&["c"][..], &[][..])]));
    });

    let resolver = resolver_for(&server, &mapping);
    let err = resolver.resolve_content_sets("dup-1-1", "x86_64").await.unwrap_err();
    assert!(matches!(err, NvrmapError::ShapeError { count: 3, .. }));
    assert!(!mapping.exists());
}

#[tokio::test]
async fn test_same_build_on_two_architectures_kept_apart() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("nvr-mapping.json");
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path(nvr_path("foo-1-1"))
            .query_param("filter", "parsed_data.labels=em=(name=='architecture'andvalue=='x86_64')");
        then.status(200).json_body(catalog_body(&[(&["cs-x86"][..], &["cpe"][..])]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(nvr_path("foo-1-1"))
            .query_param("filter", "parsed_data.labels=em=(name=='architecture'andvalue=='aarch64')");
        then.status(200).json_body(catalog_body(&[(&["cs-arm"][..], &["cpe"][..])]));
    });

    let resolver = resolver_for(&server, &mapping);
    assert_eq!(resolver.resolve_content_sets("foo-1-1", "x86_64").await.unwrap(), vec!["cs-x86"]);
    assert_eq!(resolver.resolve_content_sets("foo-1-1", "aarch64").await.unwrap(), vec!["cs-arm"]);

    let stored = resolver.cache().load().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored["foo-1-1//x86_64"].content_sets, vec!["cs-x86"]);
    assert_eq!(stored["foo-1-1//aarch64"].content_sets, vec!["cs-arm"]);
}

#[tokio::test]
async fn test_refetch_overwrites_previous_answer() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("nvr-mapping.json");
    let server = MockServer::start_async().await;
    let mut first = server.mock(|when, then| {
        when.method(GET).path(nvr_path("foo-1-1"));
        then.status(200).json_body(catalog_body(&[(&["old"][..], &["cpe-old"][..])]));
    });

    let resolver = resolver_for(&server, &mapping);
    resolver.resolve_content_sets("foo-1-1", "x86_64").await.unwrap();

    first.delete();
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("foo-1-1"));
        then.status(200).json_body(catalog_body(&[(&["new"][..], &["cpe-new"][..])]));
    });
    resolver.resolve_content_sets("foo-1-1", "x86_64").await.unwrap();

    let stored = resolver.cache().load().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored["foo-1-1//x86_64"].content_sets, vec!["new"]);
    assert_eq!(stored["foo-1-1//x86_64"].cpe_ids, vec!["cpe-new"]);
}

#[tokio::test]
async fn test_transport_error_carries_url() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(nvr_path("foo-1-1"));
        then.status(404).json_body(json!({ "detail": "not found", "status": 404 }));
    });

    let resolver = resolver_for(&server, &temp.path().join("m.json"));
    match resolver.resolve_content_sets("foo-1-1", "x86_64").await.unwrap_err() {
        NvrmapError::TransportError { url, .. } => {
            assert!(url.contains("/nvr/foo-1-1?filter="));
        }
        other => panic!("Expected TransportError, got {other:?}"),
    }
}
