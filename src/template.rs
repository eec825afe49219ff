use std::path::Path;

use anyhow::Context;

pub const CONTENT_TOKEN: &str = "{{ content }}";
pub const TITLE_TOKEN: &str = "{{ title }}";
pub const DEFAULT_TEMPLATE_FILE: &str = "template.html";

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>
    body { max-width: 46rem; margin: 2rem auto; padding: 0 1rem; font-family: Georgia, serif; line-height: 1.6; color: #222; }
    h1, h2, h3, h4 { font-family: "Helvetica Neue", Arial, sans-serif; line-height: 1.25; }
    li { margin: 0.25rem 0; }
  </style>
</head>
<body>
<main>
{{ content }}
</main>
</body>
</html>
"#;

pub struct Template {
    text: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read template: {}", path.display()))?;
        Ok(Self { text })
    }

    /// Content is substituted before the title, so a title token inside the
    /// body is filled in as well.
    pub fn render(&self, body: &str, title: &str) -> String {
        self.text
            .replace(CONTENT_TOKEN, body)
            .replace(TITLE_TOKEN, title)
    }
}

#[cfg(test)]
mod tests {
    use super::Template;

    #[test]
    fn fills_both_tokens_everywhere() {
        let t = Template::new("<title>{{ title }}</title><h1>{{ title }}</h1>{{ content }}");
        assert_eq!(
            t.render("<p>x</p>", "Doc"),
            "<title>Doc</title><h1>Doc</h1><p>x</p>"
        );
    }

    #[test]
    fn title_token_in_body_is_replaced() {
        let t = Template::new("{{ content }}");
        assert_eq!(t.render("<p>{{ title }}</p>", "T"), "<p>T</p>");
    }

    #[test]
    fn body_is_not_encoded() {
        let t = Template::new("[{{ content }}]");
        assert_eq!(t.render("<b>&</b>", "x"), "[<b>&</b>]");
    }

    #[test]
    fn default_template_has_both_tokens() {
        let page = Template::default().render("BODY", "TITLE");
        assert!(page.contains("<title>TITLE</title>"));
        assert!(page.contains("BODY"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Template::load(&dir.path().join("nope.html")).is_err());
    }
}
