use std::collections::HashMap;

use super::xml::{find_attr, XmlEvent, XmlPart};

pub const FALLBACK_STYLE_NAME: &str = "Normal";

/// Built-in style names stored lowercase in `styles.xml` but shown capitalised in Word's UI.
const UI_STYLE_ALIASES: &[(&str, &str)] = &[
    ("caption", "Caption"),
    ("footer", "Footer"),
    ("header", "Header"),
    ("heading 1", "Heading 1"),
    ("heading 2", "Heading 2"),
    ("heading 3", "Heading 3"),
    ("heading 4", "Heading 4"),
    ("heading 5", "Heading 5"),
    ("heading 6", "Heading 6"),
    ("heading 7", "Heading 7"),
    ("heading 8", "Heading 8"),
    ("heading 9", "Heading 9"),
];

/// Paragraph style id → display name table.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_id: Option<String>,
}

impl StyleSheet {
    pub fn from_part(part: &XmlPart) -> Self {
        let mut sheet = StyleSheet::default();
        // (style id, is default) of the paragraph style currently open
        let mut current: Option<(String, bool)> = None;

        for ev in &part.events {
            match ev {
                XmlEvent::Start { name, attrs } if name == "w:style" => {
                    if find_attr(attrs, "w:type") != Some("paragraph") {
                        continue;
                    }
                    if let Some(id) = find_attr(attrs, "w:styleId") {
                        let is_default = matches!(find_attr(attrs, "w:default"), Some("1" | "true" | "on"));
                        current = Some((id.to_string(), is_default));
                    }
                }
                XmlEvent::Start { name, attrs } | XmlEvent::Empty { name, attrs }
                    if name == "w:name" =>
                {
                    if let (Some((id, _)), Some(val)) = (current.as_ref(), find_attr(attrs, "w:val")) {
                        sheet.names.insert(id.clone(), ui_style_name(val));
                    }
                }
                XmlEvent::End { name } if name == "w:style" => {
                    if let Some((id, is_default)) = current.take() {
                        sheet.names.entry(id.clone()).or_insert_with(|| id.clone());
                        if is_default && sheet.default_id.is_none() {
                            sheet.default_id = Some(id);
                        }
                    }
                }
                _ => {}
            }
        }
        sheet
    }

    pub fn default_name(&self) -> &str {
        self.default_id
            .as_ref()
            .and_then(|id| self.names.get(id))
            .map(String::as_str)
            .unwrap_or(FALLBACK_STYLE_NAME)
    }

    /// Resolves a `w:pStyle` id; absent or unknown ids fall back to the default paragraph style.
    pub fn resolve(&self, style_id: Option<&str>) -> &str {
        style_id
            .and_then(|id| self.names.get(id))
            .map(String::as_str)
            .unwrap_or_else(|| self.default_name())
    }
}

pub fn ui_style_name(internal: &str) -> String {
    UI_STYLE_ALIASES
        .iter()
        .find(|(k, _)| *k == internal)
        .map(|(_, ui)| ui.to_string())
        .unwrap_or_else(|| internal.to_string())
}
