use crate::html::run::{style_run, TextEscape};
use crate::html::tags::{alignment_style, pt_to_tag};
use crate::ir::Paragraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParagraphKind {
    /// `h1`..`h3`, taken from the style name.
    Heading(u8),
    ListItem(ListKind),
    Body,
}

impl ParagraphKind {
    /// Headings win over lists; anything unrecognised is body text.
    pub fn classify(style_name: &str) -> Self {
        let lower = style_name.to_lowercase();
        if lower.contains("heading 1") {
            Self::Heading(1)
        } else if lower.contains("heading 2") {
            Self::Heading(2)
        } else if lower.contains("heading 3") {
            Self::Heading(3)
        } else if lower.contains("list") || style_name.starts_with("List") {
            let kind = if lower.contains("number") {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            Self::ListItem(kind)
        } else {
            Self::Body
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    NoList,
    InList(ListKind),
}

/// Accumulates body fragments while tracking the single open list.
///
/// Headings leave an open list untouched; only body paragraphs and
/// [`HtmlBody::finish`] close it.
#[derive(Debug, Default)]
pub struct HtmlBody {
    escape: TextEscape,
    state: ListState,
    fragments: Vec<String>,
}

impl HtmlBody {
    pub fn new(escape: TextEscape) -> Self {
        Self {
            escape,
            ..Default::default()
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn push(&mut self, para: &Paragraph) {
        let text: String = para.runs.iter().map(|r| style_run(r, self.escape)).collect();
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let align = alignment_style(para.alignment);

        match ParagraphKind::classify(&para.style_name) {
            ParagraphKind::Heading(level) => {
                self.fragments
                    .push(format!("<h{level}{align}>{text}</h{level}>"));
            }
            ParagraphKind::ListItem(kind) => {
                if self.state == ListState::NoList {
                    self.fragments.push(format!("<{}>", kind.tag()));
                    self.state = ListState::InList(kind);
                }
                self.fragments.push(format!("<li>{text}</li>"));
            }
            ParagraphKind::Body => {
                self.close_list();
                let max_pt = para.max_font_size();
                let tag = if max_pt > 0.0 { pt_to_tag(max_pt) } else { "p" };
                self.fragments.push(format!("<{tag}{align}>{text}</{tag}>"));
            }
        }
    }

    fn close_list(&mut self) {
        if let ListState::InList(kind) = self.state {
            self.fragments.push(format!("</{}>", kind.tag()));
            self.state = ListState::NoList;
        }
    }

    pub fn finish(mut self) -> Vec<String> {
        self.close_list();
        self.fragments
    }
}

/// Converts paragraphs to the HTML body, fragments joined by `\n`.
pub fn convert_paragraphs(paragraphs: &[Paragraph], escape: TextEscape) -> String {
    let mut body = HtmlBody::new(escape);
    for para in paragraphs {
        body.push(para);
    }
    body.finish().join("\n")
}
