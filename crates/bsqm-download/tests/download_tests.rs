//! Download tests against a mock HTTP server

use bsqm_download::{ArchiveFetcher, FetchPhase, HttpArchiveFetcher};
use std::sync::{Arc, Mutex};
use std::io::{Cursor, Write};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn template_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("beaton-mod-template-master/template.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(br#"{"toFill": [], "toDelete": [], "submodules": []}"#).unwrap();
    writer
        .start_file("beaton-mod-template-master/README.md", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"# {{ mod.name }}").unwrap();
    writer.finish().unwrap().into_inner()
}

async fn serve(server: &MockServer, route: &str, status: u16, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_and_extract_success() {
    let server = MockServer::start().await;
    serve(&server, "/master.zip", 200, template_zip()).await;

    let temp = tempfile::TempDir::new().unwrap();
    let fetcher = HttpArchiveFetcher::new().unwrap().with_progress(false);
    fetcher
        .fetch_and_extract(&format!("{}/master.zip", server.uri()), temp.path())
        .await
        .unwrap();

    let readme = temp.path().join("beaton-mod-template-master/README.md");
    assert_eq!(std::fs::read_to_string(readme).unwrap(), "# {{ mod.name }}");
}

#[tokio::test]
async fn test_fetch_and_extract_http_error() {
    let server = MockServer::start().await;
    serve(&server, "/missing.zip", 404, Vec::new()).await;

    let temp = tempfile::TempDir::new().unwrap();
    let fetcher = HttpArchiveFetcher::new().unwrap().with_progress(false);
    let err = fetcher
        .fetch_and_extract(&format!("{}/missing.zip", server.uri()), temp.path())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("404"));
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_fetch_and_extract_malformed_archive() {
    let server = MockServer::start().await;
    serve(&server, "/broken.zip", 200, b"definitely not a zip".to_vec()).await;

    let temp = tempfile::TempDir::new().unwrap();
    let fetcher = HttpArchiveFetcher::new().unwrap().with_progress(false);
    let err = fetcher
        .fetch_and_extract(&format!("{}/broken.zip", server.uri()), temp.path())
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Malformed zip archive"));
}

#[tokio::test]
async fn test_reports_download_then_extract_phase() {
    let server = MockServer::start().await;
    serve(&server, "/master.zip", 200, template_zip()).await;
    let url = format!("{}/master.zip", server.uri());

    let phases = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&phases);
    let fetcher = HttpArchiveFetcher::new()
        .unwrap()
        .with_progress(false)
        .on_phase(Arc::new(move |phase: FetchPhase, url: &str| {
            seen.lock().unwrap().push((phase, url.to_string()))
        }));

    let temp = tempfile::TempDir::new().unwrap();
    fetcher.fetch_and_extract(&url, temp.path()).await.unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        vec![(FetchPhase::Downloading, url.clone()), (FetchPhase::Extracting, url)]
    );
}

#[tokio::test]
async fn test_failed_download_never_reaches_extract_phase() {
    let server = MockServer::start().await;
    serve(&server, "/missing.zip", 404, Vec::new()).await;

    let phases = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&phases);
    let fetcher = HttpArchiveFetcher::new()
        .unwrap()
        .with_progress(false)
        .on_phase(Arc::new(move |phase: FetchPhase, _: &str| seen.lock().unwrap().push(phase)));

    let temp = tempfile::TempDir::new().unwrap();
    let url = format!("{}/missing.zip", server.uri());
    assert!(fetcher.fetch_and_extract(&url, temp.path()).await.is_err());
    assert_eq!(*phases.lock().unwrap(), vec![FetchPhase::Downloading]);
}
