use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::cli::{ExportArgs, ModeArg};

/// Where documents and asset references end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Documents are written to disk; references are stripped of the local root.
    LocalWrite,
    /// Assets are uploaded to object storage and documents to the document store.
    RemotePublish,
}

impl ExecutionMode {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::LocalWrite
        } else {
            Self::RemotePublish
        }
    }
}

#[derive(Debug, Clone)]
pub struct QiniuConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub video_bucket: String,
    pub prefix: String,
    pub rs_host: Url,
    pub up_host: Url,
}

#[derive(Debug, Clone)]
pub struct DropboxConfig {
    pub token: String,
    pub content_url: Url,
}

/// Immutable run configuration, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub mode: ExecutionMode,
    pub root: PathBuf,
    pub database: PathBuf,
    pub out_dir: PathBuf,
    pub qiniu: Option<QiniuConfig>,
    pub dropbox: Option<DropboxConfig>,
}

impl ExportConfig {
    pub fn from_args(args: &ExportArgs) -> anyhow::Result<Self> {
        let root = match &args.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("resolve current directory")?,
        };
        let database = args
            .database
            .clone()
            .map(|database| root.join(database))
            .unwrap_or_else(|| root.join("udemy-dl.db"));
        let out_dir = args.out.clone().unwrap_or_else(|| root.clone());
        let mode = match args.mode {
            Some(ModeArg::Local) => ExecutionMode::LocalWrite,
            Some(ModeArg::Remote) => ExecutionMode::RemotePublish,
            None => ExecutionMode::platform_default(),
        };

        let qiniu = &args.qiniu;
        let qiniu = if mode == ExecutionMode::RemotePublish
            && !qiniu.qiniu_access_key.is_empty()
            && !qiniu.qiniu_secret_key.is_empty()
            && !qiniu.qiniu_bucket.is_empty()
            && !qiniu.qiniu_video_bucket.is_empty()
        {
            Some(QiniuConfig {
                access_key: qiniu.qiniu_access_key.clone(),
                secret_key: qiniu.qiniu_secret_key.clone(),
                bucket: qiniu.qiniu_bucket.clone(),
                video_bucket: qiniu.qiniu_video_bucket.clone(),
                prefix: qiniu.qiniu_prefix.trim_matches('/').to_owned(),
                rs_host: qiniu.qiniu_rs_host.clone(),
                up_host: qiniu.qiniu_up_host.clone(),
            })
        } else {
            None
        };

        let dropbox = if args.dropbox.dropbox_token.is_empty() {
            None
        } else {
            Some(DropboxConfig {
                token: args.dropbox.dropbox_token.clone(),
                content_url: args.dropbox.dropbox_content_url.clone(),
            })
        };

        let config = Self {
            mode,
            root,
            database,
            out_dir,
            qiniu,
            dropbox,
        };
        tracing::debug!(
            mode = ?config.mode,
            root = %config.root.display(),
            database = %config.database.display(),
            uploads = config.qiniu.is_some(),
            documents = config.dropbox.is_some(),
            "loaded export config"
        );
        Ok(config)
    }

    /// Plain local-write configuration rooted at `root`.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            mode: ExecutionMode::LocalWrite,
            database: root.join("udemy-dl.db"),
            out_dir: root.clone(),
            root,
            qiniu: None,
            dropbox: None,
        }
    }

    /// Remote-publish configuration rooted at `root`, with no backends configured.
    pub fn remote(root: impl Into<PathBuf>) -> Self {
        Self {
            mode: ExecutionMode::RemotePublish,
            ..Self::local(root)
        }
    }
}
