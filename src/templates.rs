//! Text templates for rendered fragments and YAML documents.
//!
//! Templates only substitute values. Everything that needs a decision
//! (quoting, indentation, which module number a chunk gets) is prepared in
//! the binding structs below.

use anyhow::Context as _;
use askama::Template;

use crate::catalog::Course;
use crate::formats::{AssetLink, FlowSummary, Page, RenderedVideo};

#[derive(Template)]
#[template(path = "video.html", escape = "none")]
struct VideoTemplate<'a> {
    video: &'a RenderedVideo,
}

#[derive(Template)]
#[template(path = "resources.html", escape = "none")]
struct ResourcesTemplate<'a> {
    assets: &'a [AssetLink],
}

struct FlowPage {
    id: String,
    title: String,
    content: String,
}

#[derive(Template)]
#[template(path = "flow.yml", escape = "none")]
struct FlowTemplate {
    title: String,
    description: String,
    pages: Vec<FlowPage>,
}

struct CourseModule {
    name: String,
    module_title: String,
    flow_id: String,
    description: String,
}

#[derive(Template)]
#[template(path = "course_chunks.yml", escape = "none")]
struct CourseChunksTemplate {
    title: String,
    course_slug: String,
    course_name: String,
    flows: Vec<CourseModule>,
}

#[derive(Template)]
#[template(path = "course.yml", escape = "none")]
struct CourseTemplate {
    title: String,
    module_prefix: String,
    flows: Vec<CourseModule>,
}

pub fn render_video(video: &RenderedVideo) -> anyhow::Result<String> {
    VideoTemplate { video }.render().context("render video template")
}

pub fn render_resources(assets: &[AssetLink]) -> anyhow::Result<String> {
    ResourcesTemplate { assets }
        .render()
        .context("render resources template")
}

pub fn render_flow(title: &str, description: &str, pages: &[Page]) -> anyhow::Result<String> {
    FlowTemplate {
        title: yaml_quote(title),
        description: indent(description, 4),
        pages: pages
            .iter()
            .map(|page| FlowPage {
                id: page.id.clone(),
                title: single_line(&page.title),
                content: indent(&page.content, 8),
            })
            .collect(),
    }
    .render()
    .context("render flow template")
}

/// Embedded layout: the whole course as one collapsible chunk.
pub fn render_course_chunks(course: &Course, flows: &[FlowSummary]) -> anyhow::Result<String> {
    CourseChunksTemplate {
        title: yaml_quote(&format!("Course: {}", course.course_name_string)),
        course_slug: course.course_slug.clone(),
        course_name: single_line(&course.course_name_string),
        flows: course_modules(flows),
    }
    .render()
    .context("render course chunks template")
}

/// Standalone layout: a table-of-contents stub followed by one chunk per module.
pub fn render_course(course: &Course, flows: &[FlowSummary]) -> anyhow::Result<String> {
    CourseTemplate {
        title: yaml_quote(&course.course_name_string),
        module_prefix: course.course_slug.replace('-', "_"),
        flows: course_modules(flows),
    }
    .render()
    .context("render course template")
}

fn course_modules(flows: &[FlowSummary]) -> Vec<CourseModule> {
    flows
        .iter()
        .enumerate()
        .map(|(idx, flow)| CourseModule {
            name: single_line(&flow.name),
            module_title: yaml_quote(&format!("Module {}: {}", idx + 1, flow.name)),
            flow_id: flow.flow_id.clone(),
            description: indent(&flow.description, 8),
        })
        .collect()
}

/// Indents every line but the first by `width` spaces; empty lines stay empty.
///
/// Whitespace-only lines are padded too, so a stray tab never lands at
/// column 0 of a YAML block scalar.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

/// Folds line breaks into spaces for text placed on one line of a block scalar.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Double-quoted YAML scalar.
pub fn yaml_quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}
