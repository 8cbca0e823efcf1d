use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export every course in the catalog.
    Export(ExportArgs),
    /// Export a single course and its chapter flows.
    Course(CourseArgs),
    /// Export a single chapter flow.
    Flow(FlowArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Write documents under `--out`; asset references are root-relative.
    Local,
    /// Upload assets and documents to remote storage.
    Remote,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Working root; asset paths are resolved relative to it (default: current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Catalog database (default: `udemy-dl.db` under the root).
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Execution mode (default: `local` on Windows, `remote` elsewhere).
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Output directory for documents in local mode (default: the root).
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub qiniu: QiniuArgs,

    #[command(flatten)]
    pub dropbox: DropboxArgs,
}

#[derive(Debug, Clone, Args)]
pub struct QiniuArgs {
    #[arg(long, env = "QINIU_ACCESS_KEY", default_value = "", hide_env_values = true)]
    pub qiniu_access_key: String,

    #[arg(long, env = "QINIU_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub qiniu_secret_key: String,

    /// Bucket for everything except `.mp4` files.
    #[arg(long, env = "QINIU_BUCKET_NAME", default_value = "")]
    pub qiniu_bucket: String,

    /// Bucket for `.mp4` files.
    #[arg(long, env = "QINIU_BUCKET_VIDEO_NAME", default_value = "")]
    pub qiniu_video_bucket: String,

    /// Key prefix prepended to every uploaded object.
    #[arg(long, env = "QINIU_PREFIX", default_value = "udemy-videos")]
    pub qiniu_prefix: String,

    #[arg(long, env = "QINIU_RS_HOST", default_value = "https://rs.qbox.me")]
    pub qiniu_rs_host: Url,

    #[arg(long, env = "QINIU_UP_HOST", default_value = "https://up.qiniup.com")]
    pub qiniu_up_host: Url,
}

#[derive(Debug, Clone, Args)]
pub struct DropboxArgs {
    #[arg(long, env = "DROPBOX_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub dropbox_token: String,

    #[arg(
        long,
        env = "DROPBOX_CONTENT_URL",
        default_value = "https://content.dropboxapi.com"
    )]
    pub dropbox_content_url: Url,
}

#[derive(Debug, Args)]
pub struct CourseArgs {
    /// Course slug as stored in the catalog.
    #[arg(long)]
    pub slug: String,

    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct FlowArgs {
    /// Chapter id as stored in the catalog.
    #[arg(long)]
    pub chapter: String,

    /// 1-based position of the chapter within its course.
    #[arg(long, default_value_t = 1)]
    pub ordinal: usize,

    #[command(flatten)]
    pub export: ExportArgs,
}
