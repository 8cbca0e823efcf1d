//! Chapter flows and course aggregates, from catalog rows to emitted documents.

use std::path::PathBuf;

use anyhow::Context as _;

use crate::catalog::{self, Catalog, SqliteCatalog};
use crate::config::{ExecutionMode, ExportConfig};
use crate::formats::{self, FlowSummary, Page};
use crate::publish::Publisher;
use crate::render;
use crate::resolve::PathResolver;
use crate::templates;
use crate::upload::UploadDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Number of courses exported.
    Exported(usize),
    /// The catalog has no schema yet: nothing was ever downloaded.
    NothingToExport,
}

pub struct Exporter {
    mode: ExecutionMode,
    out_dir: PathBuf,
    catalog: Box<dyn Catalog>,
    resolver: PathResolver,
    uploads: UploadDispatcher,
    publisher: Publisher,
}

impl Exporter {
    pub fn new(
        config: &ExportConfig,
        catalog: Box<dyn Catalog>,
        uploads: UploadDispatcher,
        publisher: Publisher,
    ) -> Self {
        Self {
            mode: config.mode,
            out_dir: config.out_dir.clone(),
            catalog,
            resolver: PathResolver::from_config(config),
            uploads,
            publisher,
        }
    }

    pub fn from_config(config: &ExportConfig) -> anyhow::Result<Self> {
        let uploads = UploadDispatcher::from_config(config).context("configure uploads")?;
        let publisher = Publisher::from_config(config).context("configure publisher")?;
        Ok(Self::new(
            config,
            Box::new(SqliteCatalog::new(&config.database)),
            uploads,
            publisher,
        ))
    }

    /// Builds and emits the flow for one chapter. `ordinal` is the 1-based
    /// position of the chapter within its course.
    pub fn build_flow(&self, chapter_id: &str, ordinal: usize) -> anyhow::Result<FlowSummary> {
        let chapter = self
            .catalog
            .chapter(chapter_id)
            .with_context(|| format!("load chapter {chapter_id}"))?;
        let lectures = self
            .catalog
            .lectures(chapter_id)
            .with_context(|| format!("load lectures of chapter {chapter_id}"))?;
        let flow_id = formats::flow_id(&chapter.course_slug, ordinal, &chapter.chapter_id);

        let mut pages = Vec::with_capacity(lectures.len());
        for (idx, lecture) in lectures.iter().enumerate() {
            let fragment =
                render::render_lecture(self.catalog.as_ref(), &self.resolver, lecture)
                    .with_context(|| format!("render lecture {}", lecture.lecture_id))?;
            let Some(fragment) = fragment else {
                continue;
            };
            self.uploads
                .upload_all(&fragment.uploads)
                .with_context(|| format!("upload assets of lecture {}", lecture.lecture_id))?;
            pages.push(Page::new(
                &lecture.lecture_id,
                idx + 1,
                &lecture.title,
                &fragment.html,
            ));
        }

        let document = templates::render_flow(&chapter.title, &chapter.description, &pages)?;
        self.emit(
            &format!("{}/flows/{flow_id}.yml", chapter.course_slug),
            &document,
        )?;
        println!("---{flow_id} published---");
        tracing::info!(flow_id = %flow_id, pages = pages.len(), "built flow");

        Ok(FlowSummary {
            name: chapter.title,
            flow_id,
            description: chapter.description,
        })
    }

    /// Builds every chapter flow of a course, then both course-level documents.
    pub fn build_course_documents(&self, course_slug: &str) -> anyhow::Result<Vec<FlowSummary>> {
        let course = self
            .catalog
            .course(course_slug)
            .with_context(|| format!("load course {course_slug}"))?;
        let chapters = self
            .catalog
            .chapters(course_slug)
            .with_context(|| format!("load chapters of course {course_slug}"))?;

        let mut flows = Vec::with_capacity(chapters.len());
        for (idx, chapter) in chapters.iter().enumerate() {
            flows.push(self.build_flow(&chapter.chapter_id, idx + 1)?);
        }

        let chunks = templates::render_course_chunks(&course, &flows)?;
        self.emit(
            &format!("{course_slug}/{course_slug}-course-chunks.yml"),
            &chunks,
        )?;
        let standalone = templates::render_course(&course, &flows)?;
        self.emit(&format!("{course_slug}/course.yml"), &standalone)?;

        println!("--------------Done!-----------------");
        tracing::info!(course_slug, flows = flows.len(), "built course documents");
        Ok(flows)
    }

    pub fn export_all(&self) -> anyhow::Result<ExportOutcome> {
        match self.export_courses() {
            Ok(count) => Ok(ExportOutcome::Exported(count)),
            Err(err) if catalog::is_missing_schema(&err) => {
                let message = format!("{err:#}");
                tracing::warn!(error = %message, "catalog has no tables");
                println!("Warning: No Course was downloaded.");
                Ok(ExportOutcome::NothingToExport)
            }
            Err(err) => Err(err),
        }
    }

    fn export_courses(&self) -> anyhow::Result<usize> {
        let courses = self.catalog.courses().context("list courses")?;
        for course in &courses {
            self.build_course_documents(&course.course_slug)
                .with_context(|| format!("export course {}", course.course_slug))?;
        }
        Ok(courses.len())
    }

    /// Writes `content` under the output directory in local mode, then hands it to the publisher.
    fn emit(&self, relative_path: &str, content: &str) -> anyhow::Result<()> {
        serde_yaml::from_str::<serde_yaml::Value>(content)
            .with_context(|| format!("generated document is not valid YAML: {relative_path}"))?;
        if self.mode == ExecutionMode::LocalWrite {
            let path = self.out_dir.join(relative_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir: {}", parent.display()))?;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("write document: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote document");
        }
        self.publisher
            .publish(relative_path, content)
            .with_context(|| format!("publish {relative_path}"))?;
        Ok(())
    }
}
