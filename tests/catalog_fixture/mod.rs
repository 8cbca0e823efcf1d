#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rusqlite::{Connection, params};

const SCHEMA: &str = r#"
CREATE TABLE course (
    id INTEGER PRIMARY KEY,
    course_id TEXT NOT NULL,
    course_slug TEXT NOT NULL UNIQUE,
    course_name_string TEXT
);
CREATE TABLE chapter (
    id INTEGER PRIMARY KEY,
    chapter_id TEXT NOT NULL UNIQUE,
    chapter_index INTEGER,
    course_id INTEGER NOT NULL REFERENCES course(id),
    title TEXT,
    description TEXT
);
CREATE TABLE lecture (
    id INTEGER PRIMARY KEY,
    lecture_id TEXT NOT NULL UNIQUE,
    chapter_id INTEGER NOT NULL REFERENCES chapter(id),
    title TEXT,
    lecture_index INTEGER,
    lecture_type TEXT,
    content TEXT
);
CREATE TABLE lecturevideoasset (
    id INTEGER PRIMARY KEY,
    lecture_id INTEGER NOT NULL REFERENCES lecture(id),
    subtitles TEXT,
    saved_path TEXT
);
CREATE TABLE lecturesupplementasset (
    id INTEGER PRIMARY KEY,
    lecture_id INTEGER NOT NULL REFERENCES lecture(id),
    asset_id TEXT,
    title TEXT,
    type_name TEXT,
    saved_path TEXT
);
"#;

/// A working root holding a downloader-style catalog at `udemy-dl.db`.
pub struct CatalogFixture {
    conn: Connection,
    root: tempfile::TempDir,
}

impl CatalogFixture {
    pub fn new() -> anyhow::Result<Self> {
        let root = tempfile::TempDir::new().context("create temp root")?;
        let conn = Connection::open(root.path().join("udemy-dl.db")).context("open catalog")?;
        conn.execute_batch(SCHEMA).context("create schema")?;
        Ok(Self { conn, root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.path().join("udemy-dl.db")
    }

    /// Absolute path of `relative` under the root, as the downloader stores it.
    pub fn saved_path(&self, relative: &str) -> String {
        self.root.path().join(relative).to_string_lossy().into_owned()
    }

    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    pub fn add_course(&self, course_id: &str, slug: &str, name: &str) -> anyhow::Result<i64> {
        self.conn.execute(
            "INSERT INTO course (course_id, course_slug, course_name_string) VALUES (?1, ?2, ?3)",
            params![course_id, slug, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_chapter(
        &self,
        course: i64,
        chapter_id: &str,
        index: i64,
        title: &str,
        description: &str,
    ) -> anyhow::Result<i64> {
        self.conn.execute(
            "INSERT INTO chapter (chapter_id, chapter_index, course_id, title, description) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![chapter_id, index, course, title, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_lecture(
        &self,
        chapter: i64,
        lecture_id: &str,
        index: i64,
        title: &str,
        lecture_type: &str,
        content: &str,
    ) -> anyhow::Result<i64> {
        self.conn.execute(
            "INSERT INTO lecture (lecture_id, chapter_id, title, lecture_index, lecture_type, content) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![lecture_id, chapter, title, index, lecture_type, content],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_video(&self, lecture: i64, subtitles: &str, saved_path: &str) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO lecturevideoasset (lecture_id, subtitles, saved_path) VALUES (?1, ?2, ?3)",
            params![lecture, subtitles, saved_path],
        )?;
        Ok(())
    }

    pub fn add_supplement(
        &self,
        lecture: i64,
        asset_id: &str,
        title: &str,
        saved_path: &str,
    ) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO lecturesupplementasset (lecture_id, asset_id, title, type_name, saved_path) \
             VALUES (?1, ?2, ?3, 'File', ?4)",
            params![lecture, asset_id, title, saved_path],
        )?;
        Ok(())
    }
}

/// Seeds two courses:
///
/// `python-basics` has chapter `101` with a captioned video lecture and an
/// HTML lecture titled "Intro", and chapter `102` with a video lecture that
/// was never downloaded followed by a lecture carrying a PDF handout.
/// `empty-course` has no chapters. Asset files exist on disk.
pub fn seed_sample(fixture: &CatalogFixture) -> anyhow::Result<()> {
    let course = fixture.add_course("1001", "python-basics", "Python Basics")?;

    let ch1 = fixture.add_chapter(course, "101", 1, "Getting Started", "First steps.")?;
    let video = fixture.add_lecture(ch1, "9001", 1, "Welcome", "Video", "")?;
    fixture.add_video(
        video,
        "en.vtt,zh-CN.vtt",
        &fixture.saved_path("python-basics/01 Welcome.mp4"),
    )?;
    fixture.add_lecture(ch1, "9002", 2, "Intro", "Article", "<h1>Intro</h1><p>Hi</p>")?;

    let ch2 = fixture.add_chapter(course, "102", 2, "Going Further", "")?;
    fixture.add_lecture(ch2, "9003", 1, "Lost Video", "video", "")?;
    let slides = fixture.add_lecture(
        ch2,
        "9004",
        2,
        "Slides",
        "Article",
        "<h2>Slides</h2><p>Read these\n  : carefully</p>",
    )?;
    fixture.add_supplement(
        slides,
        "a-1",
        "Slides PDF",
        &fixture.saved_path("python-basics/slides.PDF"),
    )?;

    fixture.add_course("1002", "empty-course", "Empty Course")?;

    fixture.write_file("python-basics/01 Welcome.mp4", b"not really an mp4")?;
    fixture.write_file("python-basics/01 Welcome.zh-CN.vtt", b"WEBVTT\n\nzh")?;
    fixture.write_file("python-basics/01 Welcome.en.vtt", b"WEBVTT\n\nen")?;
    fixture.write_file("python-basics/slides.PDF", b"%PDF-1.4")?;
    Ok(())
}
