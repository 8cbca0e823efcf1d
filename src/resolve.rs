use std::path::{Component, Path, PathBuf};

use crate::config::{ExecutionMode, ExportConfig};
use crate::formats::PendingUpload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// On-disk path after the extension override.
    pub local_path: PathBuf,
    /// Publish-time reference; never starts with `/`.
    pub reference: String,
    pub upload: Option<PendingUpload>,
}

/// Maps local asset paths to the references embedded in rendered pages.
#[derive(Debug, Clone)]
pub struct PathResolver {
    mode: ExecutionMode,
    root: PathBuf,
}

impl PathResolver {
    pub fn new(mode: ExecutionMode, root: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            root: root.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.mode, config.root.clone())
    }

    pub fn resolve(&self, path: &str, ext: Option<&str>) -> anyhow::Result<ResolvedPath> {
        let path = match ext {
            Some(ext) => replace_ext(path, ext),
            None => path.to_owned(),
        };

        let resolved = match self.mode {
            ExecutionMode::LocalWrite => {
                let root = self.root.to_string_lossy();
                let Some(stripped) = strip_root(&path, &root) else {
                    anyhow::bail!(
                        "asset path is outside the local root {}: {path}",
                        self.root.display()
                    );
                };
                ResolvedPath {
                    reference: stripped.replace('\\', "/").trim_start_matches('/').to_owned(),
                    local_path: PathBuf::from(&path),
                    upload: None,
                }
            }
            ExecutionMode::RemotePublish => {
                let local_path = self.root.join(&path);
                if !local_path.is_file() {
                    anyhow::bail!("asset file does not exist: {}", local_path.display());
                }
                let upload = self.upload_for(&local_path)?;
                ResolvedPath {
                    reference: upload.relative_path.clone(),
                    local_path,
                    upload: Some(upload),
                }
            }
        };

        if resolved.reference.starts_with('/') {
            anyhow::bail!("asset reference must be relative: {}", resolved.reference);
        }
        tracing::debug!(path = %path, reference = %resolved.reference, "resolved asset path");
        Ok(resolved)
    }

    /// Queues `path` for upload without resolving a reference for it.
    ///
    /// Returns `None` outside remote-publish mode.
    pub fn pending_upload(&self, path: &str) -> anyhow::Result<Option<PendingUpload>> {
        match self.mode {
            ExecutionMode::LocalWrite => Ok(None),
            ExecutionMode::RemotePublish => self.upload_for(&self.root.join(path)).map(Some),
        }
    }

    fn upload_for(&self, local_path: &Path) -> anyhow::Result<PendingUpload> {
        let relative = local_path.strip_prefix(&self.root).map_err(|_| {
            anyhow::anyhow!(
                "asset path is outside the working root {}: {}",
                self.root.display(),
                local_path.display()
            )
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => anyhow::bail!(
                    "asset path must not leave the working root: {}",
                    local_path.display()
                ),
            }
        }
        if segments.is_empty() {
            anyhow::bail!("asset path names the working root itself: {}", local_path.display());
        }

        Ok(PendingUpload {
            local_path: local_path.to_path_buf(),
            relative_path: segments.join("/"),
        })
    }
}

/// Strips `root` from `path` only at a separator boundary, so `/srv/export`
/// does not claim `/srv/export2/..`.
fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() || rest.starts_with(['/', '\\']) || root.ends_with(['/', '\\']) {
        Some(rest)
    } else {
        None
    }
}

/// Replaces the extension of the final path component.
///
/// `ext` gains a leading `.` when missing. A leading dot in the file name is
/// not treated as an extension separator.
pub fn replace_ext(path: &str, ext: &str) -> String {
    let ext = if ext.is_empty() || ext.starts_with('.') {
        ext.to_owned()
    } else {
        format!(".{ext}")
    };

    let name_start = path.rfind(['/', '\\']).map_or(0, |idx| idx + 1);
    let name = &path[name_start..];
    let stem_len = match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => dot,
        _ => name.len(),
    };

    format!("{}{ext}", &path[..name_start + stem_len])
}
