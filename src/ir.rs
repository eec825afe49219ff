use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Start,
    Center,
    End,
    Justify,
    #[default]
    Unset,
}

impl Alignment {
    /// Maps a WordprocessingML `w:jc` value.
    pub fn from_jc(val: &str) -> Self {
        match val.trim() {
            "left" | "start" => Self::Start,
            "center" => Self::Center,
            "right" | "end" => Self::End,
            "both" => Self::Justify,
            _ => Self::Unset,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    /// Point size from direct run formatting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub style_name: String,
    pub runs: Vec<Run>,
    #[serde(default)]
    pub alignment: Alignment,
}

impl Paragraph {
    pub fn new(style_name: impl Into<String>, runs: Vec<Run>) -> Self {
        Self {
            style_name: style_name.into(),
            runs,
            alignment: Alignment::Unset,
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Largest explicit run size, 0.0 when no run carries one.
    pub fn max_font_size(&self) -> f32 {
        self.runs
            .iter()
            .filter_map(|r| r.font_size)
            .fold(0.0, f32::max)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_title: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

#[cfg(test)]
mod tests {
    use super::{Alignment, Paragraph, Run};

    #[test]
    fn jc_values_map_to_alignment() {
        assert_eq!(Alignment::from_jc("center"), Alignment::Center);
        assert_eq!(Alignment::from_jc("right"), Alignment::End);
        assert_eq!(Alignment::from_jc("end"), Alignment::End);
        assert_eq!(Alignment::from_jc("both"), Alignment::Justify);
        assert_eq!(Alignment::from_jc("left"), Alignment::Start);
        assert_eq!(Alignment::from_jc("distribute"), Alignment::Unset);
    }

    #[test]
    fn max_font_size_ignores_unsized_runs() {
        let mut big = Run::plain("b");
        big.font_size = Some(20.0);
        let mut small = Run::plain("s");
        small.font_size = Some(11.5);
        let p = Paragraph::new("Normal", vec![Run::plain("a"), small, big]);
        assert_eq!(p.max_font_size(), 20.0);
        assert_eq!(Paragraph::new("Normal", vec![Run::plain("a")]).max_font_size(), 0.0);
    }
}
