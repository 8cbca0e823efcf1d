mod http_stub;

use std::path::Path;

use courseflow::config::{DropboxConfig, ExecutionMode, QiniuConfig};
use courseflow::formats::PendingUpload;
use courseflow::publish::{DropboxStore, PublishOutcome, Publisher};
use courseflow::upload::qiniu::encoded_entry;
use courseflow::upload::{Buckets, QiniuStore, UploadDispatcher, UploadOutcome, etag};
use http_stub::HttpStub;
use url::Url;

fn dropbox_publisher(stub: &HttpStub) -> anyhow::Result<Publisher> {
    let store = DropboxStore::new(&DropboxConfig {
        token: "secret-token".to_owned(),
        content_url: Url::parse(&stub.base_url)?,
    })?;
    Ok(Publisher::new(
        ExecutionMode::RemotePublish,
        Some(Box::new(store)),
    ))
}

#[test]
fn dropbox_upload_overwrites_at_absolute_path() -> anyhow::Result<()> {
    let stub = HttpStub::spawn(|_| (200, r#"{"name":"course.yml"}"#.to_owned()));
    let publisher = dropbox_publisher(&stub)?;

    let outcome = publisher.publish("python-basics/course.yml", "chunks: []\n")?;
    assert_eq!(outcome, PublishOutcome::Published);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/2/files/upload");
    assert_eq!(request.header("Authorization"), Some("Bearer secret-token"));
    assert_eq!(
        request.header("Content-Type"),
        Some("application/octet-stream")
    );
    let arg: serde_json::Value =
        serde_json::from_str(request.header("Dropbox-API-Arg").unwrap_or_default())?;
    assert_eq!(arg["path"], "/python-basics/course.yml");
    assert_eq!(arg["mode"], "overwrite");
    assert_eq!(request.body_text(), "chunks: []\n");
    Ok(())
}

#[test]
fn dropbox_error_status_propagates() -> anyhow::Result<()> {
    let stub = HttpStub::spawn(|_| (409, r#"{"error_summary":"path/conflict/"}"#.to_owned()));
    let publisher = dropbox_publisher(&stub)?;

    let err = publisher
        .publish("python-basics/course.yml", "x")
        .expect_err("conflict must fail");
    let message = format!("{err:#}");
    assert!(message.contains("409"), "{message}");
    assert!(message.contains("path/conflict/"), "{message}");
    Ok(())
}

fn qiniu_dispatcher(stub: &HttpStub) -> anyhow::Result<UploadDispatcher> {
    let host = Url::parse(&stub.base_url)?;
    let store = QiniuStore::new(&QiniuConfig {
        access_key: "ak".to_owned(),
        secret_key: "sk".to_owned(),
        bucket: "files".to_owned(),
        video_bucket: "videos".to_owned(),
        prefix: "udemy-videos".to_owned(),
        rs_host: host.clone(),
        up_host: host,
    })?;
    Ok(UploadDispatcher::new(
        Box::new(store),
        Buckets {
            files: "files".to_owned(),
            videos: "videos".to_owned(),
        },
        "udemy-videos",
    ))
}

fn notes(root: &Path) -> anyhow::Result<PendingUpload> {
    let local_path = root.join("notes.pdf");
    std::fs::write(&local_path, b"%PDF-1.4 lecture notes")?;
    Ok(PendingUpload {
        local_path,
        relative_path: "notes.pdf".to_owned(),
    })
}

#[test]
fn qiniu_uploads_when_object_is_absent() -> anyhow::Result<()> {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => (612, r#"{"error":"no such file or directory"}"#.to_owned()),
        _ => (200, r#"{"hash":"ignored","key":"ignored"}"#.to_owned()),
    });
    let temp = tempfile::TempDir::new()?;
    let upload = notes(temp.path())?;

    let outcome = qiniu_dispatcher(&stub)?.upload(&upload)?;
    assert_eq!(outcome, UploadOutcome::Uploaded);

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    let stat = &requests[0];
    assert_eq!(
        stat.url,
        format!("/stat/{}", encoded_entry("files", "udemy-videos/notes.pdf"))
    );
    assert!(
        stat.header("Authorization")
            .is_some_and(|value| value.starts_with("QBox ak:"))
    );

    let put = &requests[1];
    assert_eq!(put.method, "POST");
    assert_eq!(put.url, "/");
    assert!(
        put.header("Content-Type")
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    );
    let body = put.body_text();
    assert!(body.contains("name=\"token\""));
    assert!(body.contains("ak:"));
    assert!(body.contains("name=\"key\""));
    assert!(body.contains("udemy-videos/notes.pdf"));
    assert!(body.contains("%PDF-1.4 lecture notes"));
    Ok(())
}

#[test]
fn qiniu_skips_unchanged_object() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let upload = notes(temp.path())?;
    let stored = etag(&upload.local_path)?;
    let stub = HttpStub::spawn(move |_| (200, format!(r#"{{"fsize":22,"hash":"{stored}"}}"#)));

    let outcome = qiniu_dispatcher(&stub)?.upload(&upload)?;
    assert_eq!(outcome, UploadOutcome::Skipped);
    assert!(stub.requests().iter().all(|request| request.method == "GET"));
    Ok(())
}

#[test]
fn qiniu_replaces_changed_object() -> anyhow::Result<()> {
    let stub = HttpStub::spawn(|request| match request.method.as_str() {
        "GET" => (200, r#"{"fsize":3,"hash":"FstaleHash"}"#.to_owned()),
        _ => (200, r#"{"hash":"new","key":"k"}"#.to_owned()),
    });
    let temp = tempfile::TempDir::new()?;
    let upload = notes(temp.path())?;

    let outcome = qiniu_dispatcher(&stub)?.upload(&upload)?;
    assert_eq!(outcome, UploadOutcome::Replaced);
    assert_eq!(stub.requests().len(), 2);
    Ok(())
}

#[test]
fn qiniu_server_error_propagates() -> anyhow::Result<()> {
    let stub = HttpStub::spawn(|_| (401, r#"{"error":"bad token"}"#.to_owned()));
    let temp = tempfile::TempDir::new()?;
    let upload = notes(temp.path())?;

    let err = qiniu_dispatcher(&stub)?
        .upload(&upload)
        .expect_err("unauthorized stat must fail");
    assert!(format!("{err:#}").contains("bad token"));
    Ok(())
}
