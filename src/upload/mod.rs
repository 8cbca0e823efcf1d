//! Object storage uploads with a fingerprint check.

pub mod qiniu;

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;
use base64::Engine as _;
use sha1::{Digest as _, Sha1};

use crate::config::ExportConfig;
use crate::formats::PendingUpload;

pub use qiniu::QiniuStore;

/// Receives `(bytes_sent, total_bytes)` while a file is uploading.
pub type ProgressFn = Box<dyn FnMut(u64, u64) + Send>;

pub trait ObjectStore {
    /// Fingerprint of the stored object, or `None` when nothing is stored under `key`.
    fn stat(&self, bucket: &str, key: &str) -> anyhow::Result<Option<String>>;

    /// Uploads `path` under `key`, replacing any existing object.
    fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        progress: ProgressFn,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No object store is configured.
    Disabled,
    /// The stored object already has the same fingerprint.
    Skipped,
    Uploaded,
    /// A stored object with a different fingerprint was overwritten.
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub files: String,
    pub videos: String,
}

impl Buckets {
    fn for_path(&self, relative_path: &str) -> &str {
        if relative_path.ends_with(".mp4") {
            &self.videos
        } else {
            &self.files
        }
    }
}

struct Target {
    store: Box<dyn ObjectStore>,
    buckets: Buckets,
    prefix: String,
}

/// Executes pending uploads; a no-op when no object store is configured.
pub struct UploadDispatcher {
    target: Option<Target>,
}

impl UploadDispatcher {
    pub fn disabled() -> Self {
        Self { target: None }
    }

    pub fn new(store: Box<dyn ObjectStore>, buckets: Buckets, prefix: impl Into<String>) -> Self {
        Self {
            target: Some(Target {
                store,
                buckets,
                prefix: prefix.into(),
            }),
        }
    }

    pub fn from_config(config: &ExportConfig) -> anyhow::Result<Self> {
        let Some(qiniu) = &config.qiniu else {
            tracing::debug!("object storage not configured; uploads disabled");
            return Ok(Self::disabled());
        };
        let store = QiniuStore::new(qiniu).context("build qiniu client")?;
        Ok(Self::new(
            Box::new(store),
            Buckets {
                files: qiniu.bucket.clone(),
                videos: qiniu.video_bucket.clone(),
            },
            qiniu.prefix.clone(),
        ))
    }

    pub fn upload_all(&self, pending: &[PendingUpload]) -> anyhow::Result<()> {
        for upload in pending {
            self.upload(upload)?;
        }
        Ok(())
    }

    pub fn upload(&self, pending: &PendingUpload) -> anyhow::Result<UploadOutcome> {
        let Some(target) = &self.target else {
            return Ok(UploadOutcome::Disabled);
        };

        let local_path = &pending.local_path;
        let fingerprint = etag(local_path)
            .with_context(|| format!("fingerprint asset: {}", local_path.display()))?;
        let bucket = target.buckets.for_path(&pending.relative_path);
        let key = if target.prefix.is_empty() {
            pending.relative_path.clone()
        } else {
            format!("{}/{}", target.prefix, pending.relative_path)
        };

        let stored = target
            .store
            .stat(bucket, &key)
            .with_context(|| format!("stat {bucket}/{key}"))?;
        let outcome = match stored {
            Some(stored) if stored == fingerprint => {
                println!("File with hash '{fingerprint}' already exists.");
                tracing::debug!(bucket, key = %key, "upload skipped; fingerprint unchanged");
                return Ok(UploadOutcome::Skipped);
            }
            Some(stored) => {
                println!("File with hash '{stored}' changed, will be overwritten.");
                UploadOutcome::Replaced
            }
            None => UploadOutcome::Uploaded,
        };

        let size = std::fs::metadata(local_path)
            .with_context(|| format!("stat asset: {}", local_path.display()))?
            .len();
        println!(
            "Uploading file with hash {fingerprint} (size: {:.1}M)",
            size as f64 / 1024.0 / 1024.0
        );
        target
            .store
            .put_file(bucket, &key, local_path, progress_logger(key.clone()))
            .with_context(|| format!("upload {} to {bucket}/{key}", local_path.display()))?;
        tracing::info!(bucket, key = %key, ?outcome, "uploaded asset");
        Ok(outcome)
    }
}

fn progress_logger(key: String) -> ProgressFn {
    let mut last_step = 0;
    Box::new(move |sent, total| {
        let step = if total == 0 { 10 } else { sent.saturating_mul(10) / total };
        if step > last_step {
            last_step = step;
            tracing::debug!(key = %key, sent, total, "upload {}%", step * 10);
        }
    })
}

const ETAG_BLOCK_SIZE: u64 = 4 * 1024 * 1024;

/// Qiniu content fingerprint of a file.
///
/// Files of at most one 4 MiB block hash to `0x16 || sha1(data)`; larger files
/// to `0x96 || sha1(sha1(block_1) || .. || sha1(block_n))`. The result is
/// URL-safe base64.
pub fn etag(path: &Path) -> anyhow::Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut block_digests: Vec<u8> = Vec::new();
    let mut blocks = 0usize;
    let mut buf = Vec::with_capacity(ETAG_BLOCK_SIZE as usize);

    loop {
        buf.clear();
        let read = (&mut file)
            .take(ETAG_BLOCK_SIZE)
            .read_to_end(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if read == 0 && blocks > 0 {
            break;
        }
        block_digests.extend_from_slice(&Sha1::digest(&buf));
        blocks += 1;
        if (read as u64) < ETAG_BLOCK_SIZE {
            break;
        }
    }

    let mut tagged = Vec::with_capacity(21);
    if blocks == 1 {
        tagged.push(0x16);
        tagged.extend_from_slice(&block_digests);
    } else {
        tagged.push(0x96);
        tagged.extend_from_slice(&Sha1::digest(&block_digests));
    }
    Ok(base64::engine::general_purpose::URL_SAFE.encode(tagged))
}
