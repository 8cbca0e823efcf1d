use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::DocumentStore;
use crate::config::DropboxConfig;

/// Dropbox content API client writing whole files with overwrite semantics.
#[derive(Debug, Clone)]
pub struct DropboxStore {
    token: String,
    content_url: Url,
    client: Client,
}

impl DropboxStore {
    pub fn new(config: &DropboxConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("build http client")?;
        Ok(Self {
            token: config.token.clone(),
            content_url: config.content_url.clone(),
            client,
        })
    }

    fn upload_endpoint(&self) -> anyhow::Result<Url> {
        self.content_url
            .join("2/files/upload")
            .context("build dropbox upload url")
    }
}

impl DocumentStore for DropboxStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let endpoint = self.upload_endpoint()?;
        let response = self
            .client
            .post(endpoint.clone())
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", api_arg(path))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .with_context(|| format!("POST {endpoint}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Dropbox API error ({status}): {body}");
        }
        Ok(())
    }
}

/// `Dropbox-API-Arg` value. HTTP headers must stay ASCII, so every non-ASCII
/// character is written as a `\uXXXX` escape (surrogate pairs above the BMP).
pub fn api_arg(path: &str) -> String {
    let json = serde_json::json!({ "path": path, "mode": "overwrite" }).to_string();
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }
    escaped
}
