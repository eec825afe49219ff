use std::path::{Path, PathBuf};

use anyhow::Context;

pub const DEFAULT_OUTPUT_ROOT: &str = "output";
pub const DEFAULT_FILE_NAME: &str = "index.html";
pub const SOURCE_DOCX_NAME: &str = "source.docx";

/// Directory name for a document title: whitespace and filesystem-reserved characters become `_`.
pub fn dir_name_for_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for ch in title.chars() {
        match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            c if c.is_whitespace() || c.is_control() => out.push('_'),
            _ => out.push(ch),
        }
    }
    match out.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => out,
    }
}

pub struct OutputWriter {
    dir: PathBuf,
    file_name: String,
}

impl OutputWriter {
    pub fn for_title(root: &Path, title: &str, file_name: &str) -> Self {
        Self {
            dir: root.join(dir_name_for_title(title)),
            file_name: file_name.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn page_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn ensure_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir: {}", self.dir.display()))
    }

    pub fn write_page(&self, html: &str) -> anyhow::Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.page_path();
        std::fs::write(&path, html).with_context(|| format!("write page: {}", path.display()))?;
        Ok(path)
    }

    pub fn write_source(&self, docx: &[u8]) -> anyhow::Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.dir.join(SOURCE_DOCX_NAME);
        std::fs::write(&path, docx).with_context(|| format!("write docx: {}", path.display()))?;
        Ok(path)
    }
}
