// End-to-end upload tests against a local mockito server.

use mockito::{Matcher, Server};
use std::io::Write;
use std::path::PathBuf;
use tbl_evidence::{ClientConfig, Credentials, Error, EvidenceClient, EvidenceRequest};

fn client() -> EvidenceClient {
    let config = ClientConfig::builder()
        .credentials(Credentials::new("alice", "s3cret", "key-123"))
        .debug(true)
        .build()
        .unwrap();
    EvidenceClient::new(config).unwrap()
}

fn evidence(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::File::create(&path)
        .unwrap()
        .write_all(contents.as_bytes())
        .unwrap();
    path
}

#[test]
fn test_single_url_created_is_success() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "sample.txt", "hello evidence");

    let m = server
        .mock("POST", "/collector/1/")
        .match_header("authorization", "Basic YWxpY2U6czNjcmV0")
        .match_header("x-api-key", "key-123")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=[0-9a-f]+$".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="sample.txt""#.into()),
            Matcher::Regex("Content-Type: text/plain".into()),
            Matcher::Regex("hello evidence".into()),
            Matcher::Regex(r#"name="collected"\r\n\r\n\d{4}-\d{2}-\d{2}\r\n"#.into()),
        ]))
        .with_status(201)
        .expect(1)
        .create();

    let url = format!("{}/collector/1/", server.url());
    client()
        .upload(path.to_str().unwrap(), "text/plain", &url)
        .unwrap();
    m.assert();
}

#[test]
fn test_single_url_non_created_is_protocol_error() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "sample.txt", "x");

    for status in [200usize, 404] {
        let route = format!("/collector/{}/", status);
        let m = server
            .mock("POST", route.as_str())
            .with_status(status)
            .expect(1)
            .create();
        let url = format!("{}{}", server.url(), route);
        let err = client()
            .upload(path.to_str().unwrap(), "text/plain", &url)
            .unwrap_err();
        match err {
            Error::Protocol { status: got, .. } => assert_eq!(got.as_u16() as usize, status),
            other => panic!("expected protocol error, got {:?}", other),
        }
        m.assert();
    }
}

#[test]
fn test_multi_url_partial_success() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "report.csv", "a,b\n1,2\n");

    let a = server.mock("POST", "/a").with_status(201).expect(1).create();
    let b = server.mock("POST", "/b").with_status(500).expect(1).create();

    let urls = format!("{0}/a, {0}/b", server.url());
    let err = client()
        .upload(path.to_str().unwrap(), "text/csv", &urls)
        .unwrap_err();

    assert_eq!(err.partial_counts(), Some((1, 2)));
    match err {
        Error::PartialSuccess { last, .. } => {
            assert!(matches!(*last, Error::Protocol { .. }), "got {:?}", last)
        }
        other => panic!("expected partial success, got {:?}", other),
    }
    a.assert();
    b.assert();
}

#[test]
fn test_multi_url_all_created() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "report.csv", "a,b\n");

    // identical body on both destinations
    let a = server
        .mock("POST", "/a")
        .match_body(Matcher::Regex("a,b\n".into()))
        .with_status(201)
        .expect(1)
        .create();
    let b = server
        .mock("POST", "/b")
        .match_body(Matcher::Regex("a,b\n".into()))
        .with_status(201)
        .expect(1)
        .create();

    let urls = format!("{0}/a,{0}/b", server.url());
    client()
        .upload(path.to_str().unwrap(), "text/csv", &urls)
        .unwrap();
    a.assert();
    b.assert();
}

#[test]
fn test_multi_url_all_failed_returns_last_error() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "report.csv", "a,b\n");

    let a = server.mock("POST", "/a").with_status(403).expect(1).create();
    let b = server.mock("POST", "/b").with_status(502).expect(1).create();

    let urls = format!("{0}/a,{0}/b", server.url());
    let err = client()
        .upload(path.to_str().unwrap(), "text/csv", &urls)
        .unwrap_err();
    assert!(!err.is_partial_success());
    match err {
        Error::Protocol { url, status } => {
            assert!(url.ends_with("/b"));
            assert_eq!(status.as_u16(), 502);
        }
        other => panic!("expected protocol error, got {:?}", other),
    }
    a.assert();
    b.assert();
}

#[test]
fn test_unreachable_destination_keeps_going() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "sample.txt", "x");

    let ok = server.mock("POST", "/ok").with_status(201).expect(1).create();

    // port 1 refuses connections; the second URL must still be tried
    let urls = format!("http://127.0.0.1:1/down,{}/ok", server.url());
    let err = client()
        .upload(path.to_str().unwrap(), "text/plain", &urls)
        .unwrap_err();
    assert_eq!(err.partial_counts(), Some((1, 2)));
    match err {
        Error::PartialSuccess { last, .. } => {
            assert!(matches!(*last, Error::Network { .. }), "got {:?}", last)
        }
        other => panic!("expected partial success, got {:?}", other),
    }
    ok.assert();
}

#[test]
fn test_explicit_collected_date_is_sent() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "photo.jpg", "not really a jpeg");

    let m = server
        .mock("POST", "/c")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="collected"\r\n\r\n2023-12-24\r\n"#.into()),
            // the declared type wins over the file extension
            Matcher::Regex("Content-Type: text/plain".into()),
        ]))
        .with_status(201)
        .expect(1)
        .create();

    let req = EvidenceRequest::new(&path, "text/plain", &format!("{}/c", server.url()))
        .collected("2023-12-24");
    client().submit(&req).unwrap();
    m.assert();
}

#[test]
fn test_missing_file_fails_before_any_request() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    let m = server.mock("POST", Matcher::Any).expect(0).create();

    let urls = format!("{0}/a,{0}/b", server.url());
    let err = client()
        .upload(missing.to_str().unwrap(), "text/plain", &urls)
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {:?}", err);
    m.assert();
}

#[test]
fn test_missing_credentials_fail_before_any_request() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let path = evidence(&dir, "sample.txt", "x");

    let m = server.mock("POST", Matcher::Any).expect(0).create();

    let client = EvidenceClient::new(ClientConfig::builder().build().unwrap()).unwrap();
    let err = client
        .upload(path.to_str().unwrap(), "text/plain", &server.url())
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    m.assert();
}

#[test]
fn test_validation_errors() {
    let c = client();
    for (file, mime, urls) in [
        ("sample.txt", "text/plain", ""),
        ("sample.txt", "text/plain", " , ,"),
        ("", "text/plain", "https://a.example/x"),
        ("sample.txt", "", "https://a.example/x"),
    ] {
        let err = c.upload(file, mime, urls).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
    }
}
