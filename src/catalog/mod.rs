//! Read-only access to the downloaded course catalog.

use std::fmt;
use std::path::PathBuf;

pub mod model;
pub mod sqlite;

pub use model::{Chapter, Course, Lecture, SupplementAsset, VideoAsset};
pub use sqlite::SqliteCatalog;

/// Queries the exporter needs. Ordered queries return rows by ordinal index.
pub trait Catalog {
    fn courses(&self) -> anyhow::Result<Vec<Course>>;
    fn course(&self, course_slug: &str) -> anyhow::Result<Course>;
    fn chapters(&self, course_slug: &str) -> anyhow::Result<Vec<Chapter>>;
    fn chapter(&self, chapter_id: &str) -> anyhow::Result<Chapter>;
    fn lectures(&self, chapter_id: &str) -> anyhow::Result<Vec<Lecture>>;
    fn video_assets(&self, lecture_id: &str) -> anyhow::Result<Vec<VideoAsset>>;
    fn supplement_assets(&self, lecture_id: &str) -> anyhow::Result<Vec<SupplementAsset>>;
}

/// The catalog database file has not been created yet.
#[derive(Debug)]
pub struct MissingCatalog {
    pub path: PathBuf,
}

impl fmt::Display for MissingCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catalog database does not exist: {}", self.path.display())
    }
}

impl std::error::Error for MissingCatalog {}

/// True when the error chain reports that nothing was ever downloaded: the
/// database file is absent or its tables were never created.
pub fn is_missing_schema(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<MissingCatalog>()
            || cause
                .downcast_ref::<rusqlite::Error>()
                .is_some_and(|err| err.to_string().contains("no such table"))
    })
}
