use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};

use crate::docx::package::{DocxPackage, CORE_PROPS_PART, DOCUMENT_PART, STYLES_PART};
use crate::docx::styles::StyleSheet;
use crate::docx::xml::{find_attr, parse_xml_part, XmlEvent, XmlPart};
use crate::ir::{Alignment, Document, Paragraph, Run};

#[derive(Default)]
struct ParaCapture {
    /// Stack depth of the `w:p` element itself.
    p_depth: usize,
    style_id: Option<String>,
    alignment: Alignment,
    runs: Vec<Run>,
}

struct RunCapture {
    r_depth: usize,
    run: Run,
    in_text: bool,
}

pub fn read_document(pkg: &DocxPackage) -> anyhow::Result<Document> {
    let doc_entry = pkg
        .part(DOCUMENT_PART)
        .ok_or_else(|| anyhow!("docx has no {DOCUMENT_PART}"))?;
    let doc_part = parse_xml_part(&doc_entry.name, &doc_entry.data)?;

    let styles = match pkg.part(STYLES_PART) {
        Some(ent) => StyleSheet::from_part(&parse_xml_part(&ent.name, &ent.data)?),
        None => StyleSheet::default(),
    };

    let core_title = match pkg.part(CORE_PROPS_PART) {
        Some(ent) => core_title(&parse_xml_part(&ent.name, &ent.data)?),
        None => None,
    };

    Ok(Document {
        core_title,
        paragraphs: body_paragraphs(&doc_part, &styles),
    })
}

pub fn read_document_bytes(bytes: &[u8]) -> anyhow::Result<Document> {
    let pkg = DocxPackage::from_bytes(bytes).context("open downloaded docx")?;
    read_document(&pkg)
}

pub fn read_document_path(path: &Path) -> anyhow::Result<Document> {
    let pkg = DocxPackage::read(path)?;
    read_document(&pkg).with_context(|| format!("read document: {}", path.display()))
}

/// Writes the parsed paragraph model as pretty JSON.
pub fn extract_document_json(doc: &Document, output_json: &Path) -> anyhow::Result<()> {
    fs::write(
        output_json,
        serde_json::to_vec_pretty(doc).context("serialize document json")?,
    )
    .with_context(|| format!("write document json: {}", output_json.display()))?;
    Ok(())
}

/// Collects the direct `w:p` children of `w:body`. Tables, text boxes and
/// other nested containers are skipped.
///
/// Runs inside a paragraph-level `w:hyperlink` count as paragraph runs. The
/// source converter read only the direct `w:r` children and so dropped link
/// text; this reader keeps it.
fn body_paragraphs(part: &XmlPart, styles: &StyleSheet) -> Vec<Paragraph> {
    let mut out: Vec<Paragraph> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut para: Option<ParaCapture> = None;
    let mut run: Option<RunCapture> = None;

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, attrs } => {
                open_element(name, attrs, &stack, &mut para, &mut run);
                if let Some(r) = run.as_mut() {
                    if name == "w:t" && stack.len() == r.r_depth + 1 {
                        r.in_text = true;
                    }
                }
                stack.push(name.clone());
            }
            XmlEvent::Empty { name, attrs } => {
                open_element(name, attrs, &stack, &mut para, &mut run);
                // Self-closing runs and paragraphs have no end event.
                let depth = stack.len();
                if name == "w:r" && run.as_ref().is_some_and(|r| r.r_depth == depth) {
                    if let (Some(p), Some(r)) = (para.as_mut(), run.take()) {
                        p.runs.push(r.run);
                    }
                }
                if name == "w:p" && para.as_ref().is_some_and(|p| p.p_depth == depth) {
                    if let Some(p) = para.take() {
                        out.push(finish_paragraph(p, styles));
                    }
                }
            }
            XmlEvent::Text { text } => {
                if let Some(r) = run.as_mut() {
                    if r.in_text {
                        r.run.text.push_str(text);
                    }
                }
            }
            XmlEvent::End { name } => {
                let depth = stack.len().saturating_sub(1);
                match name.as_str() {
                    "w:t" => {
                        if let Some(r) = run.as_mut() {
                            r.in_text = false;
                        }
                    }
                    "w:r" => {
                        if run.as_ref().is_some_and(|r| r.r_depth == depth) {
                            if let (Some(p), Some(r)) = (para.as_mut(), run.take()) {
                                p.runs.push(r.run);
                            }
                        }
                    }
                    "w:p" => {
                        if para.as_ref().is_some_and(|p| p.p_depth == depth) {
                            run = None;
                            if let Some(p) = para.take() {
                                out.push(finish_paragraph(p, styles));
                            }
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
        }
    }
    out
}

fn open_element(
    name: &str,
    attrs: &[(String, String)],
    stack: &[String],
    para: &mut Option<ParaCapture>,
    run: &mut Option<RunCapture>,
) {
    let parent = stack.last().map(|s| s.as_str()).unwrap_or("");
    let depth = stack.len();

    if name == "w:p" && parent == "w:body" && para.is_none() {
        *para = Some(ParaCapture {
            p_depth: depth,
            ..Default::default()
        });
        return;
    }

    let Some(p) = para.as_mut() else {
        return;
    };

    if let Some(r) = run.as_mut() {
        if parent == "w:rPr" && depth == r.r_depth + 2 {
            apply_run_property(&mut r.run, name, attrs);
        } else if parent == "w:r" && depth == r.r_depth + 1 {
            control_append(&mut r.run.text, name, attrs);
        }
        return;
    }

    match name {
        "w:r" => {
            let direct = parent == "w:p" && depth == p.p_depth + 1;
            let in_link = parent == "w:hyperlink" && depth == p.p_depth + 2;
            if direct || in_link {
                *run = Some(RunCapture {
                    r_depth: depth,
                    run: Run::default(),
                    in_text: false,
                });
            }
        }
        "w:pStyle" if parent == "w:pPr" && depth == p.p_depth + 2 => {
            p.style_id = find_attr(attrs, "w:val")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        }
        "w:jc" if parent == "w:pPr" && depth == p.p_depth + 2 => {
            p.alignment = find_attr(attrs, "w:val")
                .map(Alignment::from_jc)
                .unwrap_or_default();
        }
        _ => {}
    }
}

fn finish_paragraph(cap: ParaCapture, styles: &StyleSheet) -> Paragraph {
    Paragraph {
        style_name: styles.resolve(cap.style_id.as_deref()).to_string(),
        runs: cap.runs,
        alignment: cap.alignment,
    }
}

fn apply_run_property(run: &mut Run, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:b" => run.bold = parse_w_bool(attrs),
        "w:i" => run.italic = parse_w_bool(attrs),
        "w:u" => {
            run.underline = find_attr(attrs, "w:val").is_some_and(|v| v.trim() != "none");
        }
        "w:sz" => {
            run.font_size = find_attr(attrs, "w:val")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .map(|half_points| half_points as f32 / 2.0);
        }
        _ => {}
    }
}

fn parse_w_bool(attrs: &[(String, String)]) -> bool {
    if let Some(v) = find_attr(attrs, "w:val") {
        let s = v.trim().to_ascii_lowercase();
        return !(s == "0" || s == "false" || s == "off" || s == "none");
    }
    true
}

fn control_append(buf: &mut String, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:tab" | "w:ptab" => buf.push('\t'),
        "w:cr" => buf.push('\n'),
        "w:br" => {
            if find_attr(attrs, "w:type").unwrap_or("textWrapping") == "textWrapping" {
                buf.push('\n');
            }
        }
        "w:noBreakHyphen" => buf.push('-'),
        _ => {}
    }
}

fn core_title(part: &XmlPart) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();
    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, .. } if name == "dc:title" => in_title = true,
            XmlEvent::End { name } if name == "dc:title" => in_title = false,
            XmlEvent::Text { text } if in_title => title.push_str(text),
            _ => {}
        }
    }
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
