use crate::ir::Alignment;

/// Guesses a heading level from a point size.
pub fn pt_to_tag(pt: f32) -> &'static str {
    if pt >= 32.0 {
        "h1"
    } else if pt >= 24.0 {
        "h2"
    } else if pt >= 18.0 {
        "h3"
    } else if pt >= 14.0 {
        "h4"
    } else {
        "p"
    }
}

/// Style attribute (with leading space) placed right after the tag name.
pub fn alignment_style(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Center => r#" style="text-align:center;""#,
        Alignment::End => r#" style="text-align:right;""#,
        Alignment::Justify => r#" style="text-align:justify;""#,
        Alignment::Start | Alignment::Unset => "",
    }
}
