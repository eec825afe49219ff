use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::config::{find_default_config, load_config, AppConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::fetch::{DEFAULT_EXPORT_URL, DEFAULT_FALLBACK_TITLE, DEFAULT_USER_AGENT};
use crate::html::TextEscape;
use crate::output::{DEFAULT_FILE_NAME, DEFAULT_OUTPUT_ROOT};
use crate::template::{DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_FILE};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub escape_text: bool,
    pub keep_docx: bool,
}

#[derive(Clone, Debug)]
pub struct PublishConfig {
    pub config_path: Option<PathBuf>,

    pub export_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub use_proxy: bool,

    /// `None` renders with the built-in template.
    pub template_path: Option<PathBuf>,
    pub escape: TextEscape,
    pub fallback_title: String,

    pub output_root: PathBuf,
    pub file_name: String,
    pub keep_docx: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self::resolve(None, &AppConfig::default(), CliOverrides::default())
    }
}

impl PublishConfig {
    pub fn from_args(overrides: CliOverrides) -> anyhow::Result<Self> {
        let cfg_file = overrides
            .config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(|| find_default_config(CONFIG_FILE_NAME));

        let mut file_cfg = AppConfig::default();
        let mut loaded_from = None;
        if let Some(p) = cfg_file {
            if p.exists() {
                file_cfg = load_config(&p)?;
                loaded_from = Some(p);
            } else if overrides.config.is_some() {
                return Err(anyhow::anyhow!("config not found: {}", p.display()));
            }
        }
        Ok(Self::resolve(loaded_from, &file_cfg, overrides))
    }

    pub fn resolve(config_path: Option<PathBuf>, file_cfg: &AppConfig, cli: CliOverrides) -> Self {
        let config_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let relative_to_config = |p: PathBuf| {
            if p.is_relative() {
                config_dir.join(p)
            } else {
                p
            }
        };

        let export_url = non_empty(file_cfg.fetch.export_url.as_deref())
            .unwrap_or_else(|| DEFAULT_EXPORT_URL.to_string());
        let timeout = Duration::from_secs(
            file_cfg
                .fetch
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
        );
        let user_agent = non_empty(file_cfg.fetch.user_agent.as_deref())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let use_proxy = file_cfg.fetch.use_proxy.unwrap_or(true);

        let template_path = cli.template.or_else(|| {
            non_empty(file_cfg.render.template.as_deref())
                .map(PathBuf::from)
                .map(relative_to_config)
        });
        let escape = TextEscape::from_flag(cli.escape_text || file_cfg.render.escape_text.unwrap_or(false));
        let fallback_title = non_empty(file_cfg.render.fallback_title.as_deref())
            .unwrap_or_else(|| DEFAULT_FALLBACK_TITLE.to_string());

        let output_root = cli.output_root.unwrap_or_else(|| {
            non_empty(file_cfg.output.root_dir.as_deref())
                .map(PathBuf::from)
                .map(relative_to_config)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT))
        });
        let file_name = non_empty(file_cfg.output.file_name.as_deref())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let keep_docx = cli.keep_docx || file_cfg.output.keep_docx.unwrap_or(false);

        Self {
            config_path,
            export_url,
            timeout,
            user_agent,
            use_proxy,
            template_path,
            escape,
            fallback_title,
            output_root,
            file_name,
            keep_docx,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Writes `gdoc-publisher.toml` and `template.html` into `dir`. Existing files
/// are kept unless `force` is set.
pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;

    let template_path = dir.join(DEFAULT_TEMPLATE_FILE);
    if !template_path.exists() || force {
        std::fs::write(&template_path, DEFAULT_TEMPLATE)
            .with_context(|| format!("write template: {}", template_path.display()))?;
    }

    let cfg_path = dir.join(CONFIG_FILE_NAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

const DEFAULT_CONFIG_TOML: &str = r#"[fetch]
# {id} is replaced with the id taken from the share link.
export_url = "https://docs.google.com/document/d/{id}/export?format=docx"
timeout_secs = 60
# user_agent = "gdoc-publisher"
use_proxy = true

[render]
# Relative to this file. Must contain {{ content }} and {{ title }}.
template = "template.html"
# Escape &, <, >, " in document text. Off keeps text exactly as written.
escape_text = false
fallback_title = "Untitled_Document"

[output]
# Pages go to <root_dir>/<Title_With_Underscores>/<file_name>.
root_dir = "output"
file_name = "index.html"
keep_docx = false
"#;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{init_default_config, CliOverrides, PublishConfig};
    use crate::config::{load_config, parse_config};
    use crate::html::TextEscape;

    #[test]
    fn defaults_without_config() {
        let cfg = PublishConfig::default();
        assert!(cfg.export_url.contains("{id}"));
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert!(cfg.use_proxy);
        assert_eq!(cfg.template_path, None);
        assert_eq!(cfg.escape, TextEscape::Verbatim);
        assert_eq!(cfg.fallback_title, "Untitled_Document");
        assert_eq!(cfg.output_root, PathBuf::from("output"));
        assert_eq!(cfg.file_name, "index.html");
        assert!(!cfg.keep_docx);
    }

    #[test]
    fn file_paths_resolve_against_config_dir() {
        let file_cfg = parse_config(
            "[render]\ntemplate = \"page.html\"\n[output]\nroot_dir = \"site\"\nfile_name = \" \"\n",
        )
        .expect("parse");
        let cfg = PublishConfig::resolve(
            Some(PathBuf::from("/srv/pub/gdoc-publisher.toml")),
            &file_cfg,
            CliOverrides::default(),
        );
        assert_eq!(cfg.template_path, Some(PathBuf::from("/srv/pub/page.html")));
        assert_eq!(cfg.output_root, PathBuf::from("/srv/pub/site"));
        assert_eq!(cfg.file_name, "index.html");
    }

    #[test]
    fn cli_overrides_win() {
        let file_cfg = parse_config(
            "[render]\ntemplate = \"page.html\"\nescape_text = false\n[output]\nroot_dir = \"site\"\n",
        )
        .expect("parse");
        let cli = CliOverrides {
            template: Some(PathBuf::from("mine.html")),
            output_root: Some(PathBuf::from("out")),
            escape_text: true,
            keep_docx: true,
            ..Default::default()
        };
        let cfg = PublishConfig::resolve(None, &file_cfg, cli);
        assert_eq!(cfg.template_path, Some(PathBuf::from("mine.html")));
        assert_eq!(cfg.output_root, PathBuf::from("out"));
        assert_eq!(cfg.escape, TextEscape::Html);
        assert!(cfg.keep_docx);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cli = CliOverrides {
            config: Some(dir.path().join("absent.toml")),
            ..Default::default()
        };
        assert!(PublishConfig::from_args(cli).is_err());
    }

    #[test]
    fn init_writes_loadable_config_and_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = init_default_config(dir.path(), false).expect("init");
        assert!(dir.path().join("template.html").exists());

        let file_cfg = load_config(&cfg_path).expect("load");
        let cfg = PublishConfig::resolve(Some(cfg_path.clone()), &file_cfg, CliOverrides::default());
        assert_eq!(cfg.template_path, Some(dir.path().join("template.html")));
        assert_eq!(cfg.output_root, dir.path().join("output"));

        std::fs::write(&cfg_path, "# edited\n").expect("edit");
        init_default_config(dir.path(), false).expect("init again");
        assert_eq!(std::fs::read_to_string(&cfg_path).expect("read"), "# edited\n");
        init_default_config(dir.path(), true).expect("force");
        assert!(std::fs::read_to_string(&cfg_path).expect("read").contains("[fetch]"));
    }

    #[test]
    fn from_args_reads_explicit_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 0\n[render]\nfallback_title = \"Draft\"\n")
            .expect("write");
        let cfg = PublishConfig::from_args(CliOverrides {
            config: Some(path.clone()),
            ..Default::default()
        })
        .expect("config");
        assert_eq!(cfg.config_path, Some(path));
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.fallback_title, "Draft");
    }
}
