use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::Context;
use zip::ZipArchive;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const CORE_PROPS_PART: &str = "docProps/core.xml";

/// In-memory view of a `.docx` zip package.
pub struct DocxPackage {
    pub entries: Vec<DocxEntry>,
}

pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl DocxPackage {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let f = File::open(path).with_context(|| format!("open docx: {}", path.display()))?;
        Self::from_reader(f).with_context(|| format!("read docx: {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> anyhow::Result<Self> {
        let mut zip = ZipArchive::new(reader).context("read zip")?;
        let mut entries = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).context("zip entry")?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .with_context(|| format!("read zip entry: {}", file.name()))?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&DocxEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}
