//! Paragraph model → HTML body fragments.

mod run;
mod tags;
mod transform;

pub use run::{style_run, TextEscape};
pub use tags::{alignment_style, pt_to_tag};
pub use transform::{convert_paragraphs, HtmlBody, ListKind, ListState, ParagraphKind};
