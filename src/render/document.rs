use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, Lecture};
use crate::formats::{AssetLink, Fragment};
use crate::resolve::PathResolver;
use crate::templates;

use super::headings;

static COLON_AFTER_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*:").expect("valid colon regex")
});

/// Joins a colon that upstream markup pushed onto its own line back onto the previous one.
pub fn collapse_leading_colons(content: &str) -> String {
    COLON_AFTER_NEWLINE.replace_all(content, ":").into_owned()
}

/// Renders an HTML lecture and, when present, its downloadable resources.
pub fn render_document_lecture(
    catalog: &dyn Catalog,
    resolver: &PathResolver,
    lecture: &Lecture,
) -> anyhow::Result<Fragment> {
    let content = collapse_leading_colons(&lecture.content);
    let body = headings::strip_title_headings(&content, &lecture.title)?;

    let mut uploads = Vec::new();
    let mut assets = Vec::new();
    for supplement in catalog.supplement_assets(&lecture.lecture_id)? {
        if supplement.saved_path.is_empty() {
            continue;
        }
        let resolved = resolver.resolve(&supplement.saved_path, None)?;
        uploads.extend(resolved.upload);
        assets.push(AssetLink::new(resolved.reference, &supplement.title));
    }

    let resources = if assets.is_empty() {
        String::new()
    } else {
        templates::render_resources(&assets)?
    };

    Ok(Fragment {
        html: format!("{body}\n{resources}"),
        uploads,
    })
}
