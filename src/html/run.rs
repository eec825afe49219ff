use std::borrow::Cow;

use crate::ir::Run;

/// How raw run text is written into the HTML body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEscape {
    /// Text is copied as-is, markup characters included.
    #[default]
    Verbatim,
    /// `&`, `<`, `>` and `"` are replaced with entities.
    Html,
}

impl TextEscape {
    pub fn from_flag(escape: bool) -> Self {
        if escape {
            Self::Html
        } else {
            Self::Verbatim
        }
    }

    pub fn apply<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(text),
            Self::Html => {
                if !text.contains(['&', '<', '>', '"']) {
                    return Cow::Borrowed(text);
                }
                let mut out = String::with_capacity(text.len() + 8);
                for ch in text.chars() {
                    match ch {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        '"' => out.push_str("&quot;"),
                        _ => out.push(ch),
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

/// Wraps run text in `<strong>`, then `<em>`, then `<u>`; empty runs yield nothing.
pub fn style_run(run: &Run, escape: TextEscape) -> String {
    if run.text.is_empty() {
        return String::new();
    }
    let mut text = escape.apply(&run.text).into_owned();
    if run.bold {
        text = format!("<strong>{text}</strong>");
    }
    if run.italic {
        text = format!("<em>{text}</em>");
    }
    if run.underline {
        text = format!("<u>{text}</u>");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::{style_run, TextEscape};
    use crate::ir::Run;

    fn run(text: &str, bold: bool, italic: bool, underline: bool) -> Run {
        Run {
            text: text.to_string(),
            bold,
            italic,
            underline,
            font_size: None,
        }
    }

    #[test]
    fn empty_run_ignores_flags() {
        for flags in [(false, false, false), (true, true, true), (true, false, true)] {
            let r = run("", flags.0, flags.1, flags.2);
            assert_eq!(style_run(&r, TextEscape::Verbatim), "");
        }
    }

    #[test]
    fn single_flag_wraps_once() {
        assert_eq!(style_run(&run("x", true, false, false), TextEscape::Verbatim), "<strong>x</strong>");
        assert_eq!(style_run(&run("x", false, true, false), TextEscape::Verbatim), "<em>x</em>");
        assert_eq!(style_run(&run("x", false, false, true), TextEscape::Verbatim), "<u>x</u>");
        assert_eq!(style_run(&run("x", false, false, false), TextEscape::Verbatim), "x");
    }

    #[test]
    fn all_flags_nest_strong_em_u() {
        assert_eq!(
            style_run(&run("TEXT", true, true, true), TextEscape::Verbatim),
            "<u><em><strong>TEXT</strong></em></u>"
        );
    }

    #[test]
    fn whitespace_only_run_is_still_emitted() {
        assert_eq!(style_run(&run(" ", true, false, false), TextEscape::Verbatim), "<strong> </strong>");
    }

    // Markup in run text passes straight through unless escaping is selected.
    #[test]
    fn verbatim_does_not_escape_markup() {
        let r = run("a < b & <i>c</i>", false, false, false);
        assert_eq!(style_run(&r, TextEscape::Verbatim), "a < b & <i>c</i>");
    }

    #[test]
    fn html_escape_encodes_markup_inside_tags() {
        let r = run("\"a\" < b & c", true, false, false);
        assert_eq!(
            style_run(&r, TextEscape::Html),
            "<strong>&quot;a&quot; &lt; b &amp; c</strong>"
        );
        assert_eq!(TextEscape::from_flag(false), TextEscape::Verbatim);
    }
}
