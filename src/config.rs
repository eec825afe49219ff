use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "gdoc-publisher.toml";
pub const CONFIG_ENV_VAR: &str = "GDOC_PUBLISHER_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FetchSection {
    /// Export URL with an `{id}` placeholder for the document id.
    #[serde(default)]
    pub export_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment (default: on).
    #[serde(default)]
    pub use_proxy: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct RenderSection {
    /// Template path; relative paths are resolved against the config file directory.
    #[serde(default)]
    pub template: Option<String>,

    /// HTML-escape run text before wrapping it in tags (default: off).
    #[serde(default)]
    pub escape_text: Option<bool>,

    #[serde(default)]
    pub fallback_title: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct OutputSection {
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub keep_docx: Option<bool>,
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 4) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parse config: {}", path.display()))
}

pub fn parse_config(text: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(text).context("parse config toml")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::{find_file_upwards, parse_config};

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg = parse_config("").expect("parse");
        assert!(cfg.fetch.export_url.is_none());
        assert!(cfg.render.escape_text.is_none());
        assert!(cfg.output.root_dir.is_none());
    }

    #[test]
    fn sections_are_read() {
        let cfg = parse_config(
            r#"
[fetch]
timeout_secs = 5
use_proxy = false

[render]
template = "page.html"
escape_text = true

[output]
root_dir = "site"
keep_docx = true
"#,
        )
        .expect("parse");
        assert_eq!(cfg.fetch.timeout_secs, Some(5));
        assert_eq!(cfg.fetch.use_proxy, Some(false));
        assert_eq!(cfg.render.template.as_deref(), Some("page.html"));
        assert_eq!(cfg.render.escape_text, Some(true));
        assert_eq!(cfg.output.root_dir.as_deref(), Some("site"));
        assert_eq!(cfg.output.keep_docx, Some(true));
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        assert!(parse_config("[fetch]\ntimeout_secs = \"soon\"\n").is_err());
    }

    #[test]
    fn finds_file_in_parent_dir() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(root.path().join("marker.toml"), "").expect("write");

        let found = find_file_upwards(&nested, "marker.toml", 4).expect("found");
        assert_eq!(found, root.path().join("marker.toml"));
        assert!(find_file_upwards(&nested, "marker.toml", 1).is_none());
    }
}
