use std::path::PathBuf;

/// One lecture rendered into a flow page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Page {
    /// `position` is the 1-based index of the lecture within its chapter.
    pub fn new(lecture_id: &str, position: usize, title: &str, content: &str) -> Self {
        Self {
            id: format!("{lecture_id}_{position}").replace('-', "_"),
            title: title.to_owned(),
            content: content.replace('\t', " "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub url: String,
    pub lang: String,
    pub label: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedVideo {
    pub url: String,
    pub tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLink {
    pub url: String,
    pub name: String,
    pub is_pdf: bool,
}

impl AssetLink {
    pub fn new(url: String, name: &str) -> Self {
        let is_pdf = url.to_lowercase().ends_with(".pdf");
        Self {
            url,
            name: name.to_owned(),
            is_pdf,
        }
    }
}

/// What a chapter flow contributes to the course-level documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSummary {
    pub name: String,
    pub flow_id: String,
    pub description: String,
}

/// A local file queued for object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub local_path: PathBuf,
    /// Path relative to the working root, `/`-separated.
    pub relative_path: String,
}

/// An HTML fragment plus the uploads its references depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub uploads: Vec<PendingUpload>,
}

/// Derives the chapter flow id: `{slug}-{ordinal}-{chapter_id}`, lowercase, hyphenated.
pub fn flow_id(course_slug: &str, ordinal: usize, chapter_id: &str) -> String {
    format!("{course_slug}_{ordinal}_{chapter_id}")
        .to_lowercase()
        .replace('_', "-")
}
