use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::docx::document::{read_document_bytes, read_document_path};
use crate::fetch::DocFetcher;
use crate::html::convert_paragraphs;
use crate::ir::Document;
use crate::output::OutputWriter;
use crate::pipeline::config::PublishConfig;
use crate::progress::ConsoleProgress;
use crate::template::Template;

pub struct Publisher {
    cfg: PublishConfig,
    progress: ConsoleProgress,
}

impl Publisher {
    pub fn new(cfg: PublishConfig, progress: ConsoleProgress) -> Self {
        Self { cfg, progress }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.cfg
    }

    fn template(&self) -> anyhow::Result<Template> {
        match self.cfg.template_path.as_deref() {
            Some(p) => Template::load(p),
            None => Ok(Template::default()),
        }
    }

    /// Body fragments substituted into the page template.
    pub fn render_page(&self, doc: &Document, title: &str) -> anyhow::Result<String> {
        let body = convert_paragraphs(&doc.paragraphs, self.cfg.escape);
        Ok(self.template()?.render(&body, title))
    }

    /// Fetches a shared document and writes its page; returns the written file.
    pub fn publish_link(&self, share_link: &str, title: Option<&str>) -> anyhow::Result<PathBuf> {
        let fetcher = DocFetcher::new(
            &self.cfg.export_url,
            self.cfg.timeout,
            &self.cfg.user_agent,
            self.cfg.use_proxy,
        )?;

        let stages = self.progress.stages(5);

        let export_url = fetcher.export_link(share_link)?;
        stages.advance("export link");

        let docx = fetcher.download(&export_url)?;
        self.progress.info(format!("downloaded {} bytes", docx.len()));
        stages.advance("download");

        let title = match title {
            Some(t) => t.to_string(),
            None => fetcher
                .fetch_title(share_link)?
                .unwrap_or_else(|| self.cfg.fallback_title.clone()),
        };
        self.progress.info(format!("title: {title}"));
        stages.advance("title");

        let doc = read_document_bytes(&docx)?;
        self.progress.info(format!("paragraphs: {}", doc.paragraphs.len()));
        stages.advance("parse");

        let writer = OutputWriter::for_title(&self.cfg.output_root, &title, &self.cfg.file_name);
        if self.cfg.keep_docx {
            writer.write_source(&docx)?;
        }
        let page = self.render_page(&doc, &title).context("render page")?;
        let path = writer.write_page(&page)?;
        stages.advance("write");
        Ok(path)
    }

    /// Converts a local `.docx`. Title precedence: argument, document core
    /// properties, configured fallback.
    pub fn publish_docx(&self, input: &Path, title: Option<&str>) -> anyhow::Result<PathBuf> {
        let stages = self.progress.stages(2);
        let doc = read_document_path(input)?;
        self.progress.info(format!(
            "read {} ({} paragraphs)",
            input.display(),
            doc.paragraphs.len()
        ));
        stages.advance("parse");
        let title = title
            .map(str::to_string)
            .or_else(|| doc.core_title.clone())
            .unwrap_or_else(|| self.cfg.fallback_title.clone());

        let writer = OutputWriter::for_title(&self.cfg.output_root, &title, &self.cfg.file_name);
        if self.cfg.keep_docx {
            let bytes = std::fs::read(input)
                .with_context(|| format!("read docx: {}", input.display()))?;
            writer.write_source(&bytes)?;
        }
        let page = self.render_page(&doc, &title).context("render page")?;
        let path = writer.write_page(&page)?;
        stages.advance("write");
        Ok(path)
    }
}
