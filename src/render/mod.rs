//! Per-lecture HTML rendering.

pub mod document;
pub mod headings;
pub mod video;

use crate::catalog::{Catalog, Lecture};
use crate::formats::Fragment;
use crate::resolve::PathResolver;

pub use document::render_document_lecture;
pub use video::render_video_lecture;

/// Dispatches on the lecture type tag. `None` means there is nothing to show.
pub fn render_lecture(
    catalog: &dyn Catalog,
    resolver: &PathResolver,
    lecture: &Lecture,
) -> anyhow::Result<Option<Fragment>> {
    if lecture.is_video() {
        render_video_lecture(catalog, resolver, lecture)
    } else {
        render_document_lecture(catalog, resolver, lecture).map(Some)
    }
}
