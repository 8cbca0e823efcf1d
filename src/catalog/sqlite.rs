use std::path::PathBuf;

use anyhow::Context as _;
use rusqlite::{Connection, OpenFlags, OptionalExtension as _, params};

use super::model::{Chapter, Course, Lecture, SupplementAsset, VideoAsset};
use super::{Catalog, MissingCatalog};

/// Catalog backed by the downloader's SQLite file.
///
/// Every query opens its own read-only connection and drops it afterwards,
/// so no transaction spans more than one query.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    path: PathBuf,
}

impl SqliteCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> anyhow::Result<Connection> {
        if !self.path.exists() {
            return Err(MissingCatalog {
                path: self.path.clone(),
            }
            .into());
        }
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("open catalog: {}", self.path.display()))
    }
}

const CHAPTER_COLUMNS: &str =
    "c.chapter_id, c.chapter_index, co.course_slug, c.title, c.description";

fn row_to_course(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        course_id: row.get(0)?,
        course_slug: row.get(1)?,
        course_name_string: text(row, 2)?,
    })
}

fn row_to_chapter(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        chapter_id: row.get(0)?,
        chapter_index: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
        course_slug: row.get(2)?,
        title: text(row, 3)?,
        description: text(row, 4)?,
    })
}

fn row_to_lecture(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lecture> {
    Ok(Lecture {
        lecture_id: row.get(0)?,
        title: text(row, 1)?,
        lecture_index: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        lecture_type: text(row, 3)?,
        content: text(row, 4)?,
    })
}

/// Text columns default to the empty string when NULL.
fn text(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

impl Catalog for SqliteCatalog {
    fn courses(&self) -> anyhow::Result<Vec<Course>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT course_id, course_slug, course_name_string FROM course ORDER BY id")
            .context("prepare course listing")?;
        let courses = stmt
            .query_map([], row_to_course)
            .context("query courses")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read course rows")?;
        Ok(courses)
    }

    fn course(&self, course_slug: &str) -> anyhow::Result<Course> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT course_id, course_slug, course_name_string FROM course WHERE course_slug = ?1",
            params![course_slug],
            row_to_course,
        )
        .optional()
        .with_context(|| format!("query course: {course_slug}"))?
        .ok_or_else(|| anyhow::anyhow!("course not found: {course_slug}"))
    }

    fn chapters(&self, course_slug: &str) -> anyhow::Result<Vec<Chapter>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter c \
             JOIN course co ON c.course_id = co.id \
             WHERE co.course_slug = ?1 \
             ORDER BY c.chapter_index, c.id"
        );
        let mut stmt = conn.prepare(&sql).context("prepare chapter listing")?;
        let chapters = stmt
            .query_map(params![course_slug], row_to_chapter)
            .with_context(|| format!("query chapters of course: {course_slug}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read chapter rows")?;
        Ok(chapters)
    }

    fn chapter(&self, chapter_id: &str) -> anyhow::Result<Chapter> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter c \
             JOIN course co ON c.course_id = co.id \
             WHERE c.chapter_id = ?1"
        );
        conn.query_row(&sql, params![chapter_id], row_to_chapter)
            .optional()
            .with_context(|| format!("query chapter: {chapter_id}"))?
            .ok_or_else(|| anyhow::anyhow!("chapter not found: {chapter_id}"))
    }

    fn lectures(&self, chapter_id: &str) -> anyhow::Result<Vec<Lecture>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT l.lecture_id, l.title, l.lecture_index, l.lecture_type, l.content \
                 FROM lecture l JOIN chapter c ON l.chapter_id = c.id \
                 WHERE c.chapter_id = ?1 \
                 ORDER BY l.lecture_index, l.id",
            )
            .context("prepare lecture listing")?;
        let lectures = stmt
            .query_map(params![chapter_id], row_to_lecture)
            .with_context(|| format!("query lectures of chapter: {chapter_id}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read lecture rows")?;
        Ok(lectures)
    }

    fn video_assets(&self, lecture_id: &str) -> anyhow::Result<Vec<VideoAsset>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT v.subtitles, v.saved_path \
                 FROM lecturevideoasset v JOIN lecture l ON v.lecture_id = l.id \
                 WHERE l.lecture_id = ?1 \
                 ORDER BY v.id",
            )
            .context("prepare video asset lookup")?;
        let assets = stmt
            .query_map(params![lecture_id], |row| {
                Ok(VideoAsset {
                    subtitles: text(row, 0)?,
                    saved_path: text(row, 1)?,
                })
            })
            .with_context(|| format!("query video assets of lecture: {lecture_id}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read video asset rows")?;
        Ok(assets)
    }

    fn supplement_assets(&self, lecture_id: &str) -> anyhow::Result<Vec<SupplementAsset>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT s.asset_id, s.title, s.type_name, s.saved_path \
                 FROM lecturesupplementasset s JOIN lecture l ON s.lecture_id = l.id \
                 WHERE l.lecture_id = ?1 \
                 ORDER BY s.id",
            )
            .context("prepare supplement asset lookup")?;
        let assets = stmt
            .query_map(params![lecture_id], |row| {
                Ok(SupplementAsset {
                    asset_id: text(row, 0)?,
                    title: text(row, 1)?,
                    type_name: text(row, 2)?,
                    saved_path: text(row, 3)?,
                })
            })
            .with_context(|| format!("query supplement assets of lecture: {lecture_id}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read supplement asset rows")?;
        Ok(assets)
    }
}
