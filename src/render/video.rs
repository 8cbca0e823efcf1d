use crate::catalog::{Catalog, Lecture};
use crate::formats::{Fragment, RenderedVideo};
use crate::resolve::PathResolver;
use crate::subtitles;
use crate::templates;

/// Renders a video lecture, or `None` when no video was downloaded for it.
pub fn render_video_lecture(
    catalog: &dyn Catalog,
    resolver: &PathResolver,
    lecture: &Lecture,
) -> anyhow::Result<Option<Fragment>> {
    let mut assets = catalog.video_assets(&lecture.lecture_id)?;
    if assets.len() > 1 {
        anyhow::bail!(
            "lecture {} has {} video assets; expected at most one",
            lecture.lecture_id,
            assets.len()
        );
    }
    let Some(asset) = assets.pop() else {
        tracing::debug!(lecture_id = %lecture.lecture_id, "video lecture has no video asset; skipping");
        return Ok(None);
    };

    let resolved = resolver.resolve(&asset.saved_path, None)?;
    let tracks = subtitles::build_tracks(
        &asset.subtitles,
        &resolved.reference,
        &asset.saved_path,
        resolver,
    )?;

    let mut uploads = Vec::new();
    uploads.extend(resolved.upload);
    uploads.extend(tracks.uploads);

    let video = RenderedVideo {
        url: resolved.reference,
        tracks: tracks.tracks,
    };
    let html = templates::render_video(&video)?;
    Ok(Some(Fragment { html, uploads }))
}
