#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub course_id: String,
    pub course_slug: String,
    pub course_name_string: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub chapter_id: String,
    pub chapter_index: i64,
    pub course_slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecture {
    pub lecture_id: String,
    pub title: String,
    pub lecture_index: i64,
    pub lecture_type: String,
    pub content: String,
}

impl Lecture {
    pub fn is_video(&self) -> bool {
        self.lecture_type.eq_ignore_ascii_case("video")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    /// Comma-joined caption filenames, e.g. `en.vtt,zh-CN.vtt`.
    pub subtitles: String,
    pub saved_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementAsset {
    pub asset_id: String,
    pub title: String,
    pub type_name: String,
    pub saved_path: String,
}
