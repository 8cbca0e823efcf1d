use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::blocking::{Client, multipart};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use sha1::Sha1;
use url::Url;

use super::{ObjectStore, ProgressFn};
use crate::config::QiniuConfig;

type HmacSha1 = Hmac<Sha1>;

/// Status the resource service answers with when no object exists under a key.
const STATUS_NO_SUCH_ENTRY: u16 = 612;

const UPLOAD_TOKEN_TTL_SECS: i64 = 3600;

/// Qiniu Kodo client: `stat` against the resource host, form uploads against the upload host.
#[derive(Debug, Clone)]
pub struct QiniuStore {
    access_key: String,
    secret_key: String,
    rs_host: Url,
    up_host: Url,
    client: Client,
}

impl QiniuStore {
    pub fn new(config: &QiniuConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("build http client")?;
        Ok(Self {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            rs_host: config.rs_host.clone(),
            up_host: config.up_host.clone(),
            client,
        })
    }

    fn sign(&self, data: &[u8]) -> anyhow::Result<String> {
        let mut mac =
            HmacSha1::new_from_slice(self.secret_key.as_bytes()).context("init hmac-sha1")?;
        mac.update(data);
        Ok(base64::engine::general_purpose::URL_SAFE.encode(mac.finalize().into_bytes()))
    }

    /// `QBox` credential for a management request on `path_and_query`.
    fn management_authorization(&self, path_and_query: &str) -> anyhow::Result<String> {
        let sign = self.sign(format!("{path_and_query}\n").as_bytes())?;
        Ok(format!("QBox {}:{sign}", self.access_key))
    }

    /// Upload token scoped to exactly `bucket:key`, so existing objects may be overwritten.
    pub fn upload_token(&self, bucket: &str, key: &str, deadline: i64) -> anyhow::Result<String> {
        let policy = serde_json::json!({
            "scope": format!("{bucket}:{key}"),
            "deadline": deadline,
        });
        let encoded_policy =
            base64::engine::general_purpose::URL_SAFE.encode(policy.to_string().as_bytes());
        let sign = self.sign(encoded_policy.as_bytes())?;
        Ok(format!("{}:{sign}:{encoded_policy}", self.access_key))
    }
}

pub fn encoded_entry(bucket: &str, key: &str) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(format!("{bucket}:{key}"))
}

impl ObjectStore for QiniuStore {
    fn stat(&self, bucket: &str, key: &str) -> anyhow::Result<Option<String>> {
        #[derive(Debug, serde::Deserialize)]
        struct StatResponse {
            hash: Option<String>,
        }

        let url = self
            .rs_host
            .join(&format!("stat/{}", encoded_entry(bucket, key)))
            .context("build stat url")?;
        let authorization = self.management_authorization(url.path())?;
        let resp = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, authorization)
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if status.as_u16() == STATUS_NO_SUCH_ENTRY || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            anyhow::bail!("qiniu stat failed ({status}): {body}");
        }
        let stat: StatResponse = resp.json().context("parse qiniu stat json")?;
        Ok(stat.hash)
    }

    fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        progress: ProgressFn,
    ) -> anyhow::Result<()> {
        let deadline = chrono::Utc::now().timestamp() + UPLOAD_TOKEN_TTL_SECS;
        let token = self.upload_token(bucket, key, deadline)?;

        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let total = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| key.to_owned());

        let reader = ProgressReader {
            inner: file,
            sent: 0,
            total,
            progress,
        };
        let form = multipart::Form::new()
            .text("token", token)
            .text("key", key.to_owned())
            .part(
                "file",
                multipart::Part::reader_with_length(reader, total).file_name(file_name),
            );

        let resp = self
            .client
            .post(self.up_host.clone())
            .multipart(form)
            .send()
            .with_context(|| format!("POST {}", self.up_host))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            anyhow::bail!("qiniu upload failed ({status}): {body}");
        }
        Ok(())
    }
}

struct ProgressReader<R> {
    inner: R,
    sent: u64,
    total: u64,
    progress: ProgressFn,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.sent += read as u64;
        (self.progress)(self.sent, self.total);
        Ok(read)
    }
}
