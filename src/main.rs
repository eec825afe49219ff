use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gdoc_publisher::docx::document::{extract_document_json, read_document_bytes, read_document_path};
use gdoc_publisher::fetch::DocFetcher;
use gdoc_publisher::pipeline::{init_default_config, CliOverrides, PublishConfig, Publisher};
use gdoc_publisher::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "gdoc-publisher")]
#[command(about = "Publish a shared Google Doc as a styled HTML page", long_about = None)]
struct Args {
    /// Google Docs share link (prompted for when omitted)
    #[arg(value_name = "LINK")]
    link: Option<String>,

    /// Convert a local .docx instead of fetching a link
    #[arg(long, value_name = "DOCX", conflicts_with = "link")]
    input_docx: Option<PathBuf>,

    /// Page title (default: share page title, or the document's own title for --input-docx)
    #[arg(long)]
    title: Option<String>,

    /// Root directory for published pages (default: output)
    #[arg(short, long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// HTML template with {{ content }} and {{ title }} placeholders
    #[arg(long, value_name = "HTML")]
    template: Option<PathBuf>,

    /// Escape &, <, >, " in document text
    #[arg(long)]
    escape_text: bool,

    /// Keep the downloaded .docx next to the page
    #[arg(long)]
    keep_docx: bool,

    /// Write the parsed paragraph model as JSON, then exit
    #[arg(long, value_name = "JSON")]
    extract_doc_json: Option<PathBuf>,

    /// Config file path (default: search for gdoc-publisher.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Generate default config + template, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write config/template files (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite existing files when used with --init-config
    #[arg(long)]
    force: bool,
}

enum Source {
    Link(String),
    Docx(PathBuf),
}

fn prompt_for_link() -> anyhow::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "Paste your Google Docs share link: ").context("write prompt")?;
    stdout.flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("read link")?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let cfg = PublishConfig::from_args(CliOverrides {
        config: args.config.clone(),
        template: args.template.clone(),
        output_root: args.output_root.clone(),
        escape_text: args.escape_text,
        keep_docx: args.keep_docx,
    })
    .context("build config")?;
    if let Some(p) = cfg.config_path.as_ref() {
        progress.info(format!("config: {}", p.display()));
    }

    let source = match (args.input_docx.clone(), args.link.clone()) {
        (Some(input), _) => Source::Docx(input),
        (None, Some(link)) => Source::Link(link),
        (None, None) => Source::Link(prompt_for_link()?),
    };

    if let Some(json_path) = args.extract_doc_json.as_ref() {
        let doc = match &source {
            Source::Docx(input) => read_document_path(input)?,
            Source::Link(link) => {
                let fetcher =
                    DocFetcher::new(&cfg.export_url, cfg.timeout, &cfg.user_agent, cfg.use_proxy)?;
                read_document_bytes(&fetcher.download(&fetcher.export_link(link)?)?)?
            }
        };
        extract_document_json(&doc, json_path)?;
        progress.info(format!("Wrote document model: {}", json_path.display()));
        return Ok(());
    }

    let publisher = Publisher::new(cfg, progress);
    let page = match &source {
        Source::Docx(input) => publisher.publish_docx(input, args.title.as_deref())?,
        Source::Link(link) => publisher.publish_link(link, args.title.as_deref())?,
    };
    println!("Completed: Document compiled to: {}", page.display());
    Ok(())
}
