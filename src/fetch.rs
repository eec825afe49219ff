use std::time::Duration;

use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;

pub const DEFAULT_EXPORT_URL: &str = "https://docs.google.com/document/d/{id}/export?format=docx";
pub const DEFAULT_FALLBACK_TITLE: &str = "Untitled_Document";
pub const DEFAULT_USER_AGENT: &str = concat!("gdoc-publisher/", env!("CARGO_PKG_VERSION"));

const TITLE_SUFFIX: &str = " - Google Docs";

static DOC_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/document/d/([^/]+)").expect("doc id"));
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<title>(.*?)</title>").expect("title"));

/// Document id from a share link such as `https://docs.google.com/document/d/<id>/edit`.
pub fn document_id(share_link: &str) -> anyhow::Result<&str> {
    DOC_ID_RE
        .captures(share_link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| anyhow!("invalid Google Docs link: {share_link}"))
}

pub fn export_link(share_link: &str, export_url: &str) -> anyhow::Result<String> {
    let id = document_id(share_link)?;
    Ok(export_url.replace("{id}", id))
}

/// First `<title>` on the page with the editor suffix removed.
pub fn title_from_html(html: &str) -> Option<String> {
    let caps = TITLE_RE.captures(html)?;
    let title = caps[1].replace(TITLE_SUFFIX, "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

pub struct DocFetcher {
    client: Client,
    export_url: String,
}

impl DocFetcher {
    pub fn new(
        export_url: &str,
        timeout: Duration,
        user_agent: &str,
        use_proxy: bool,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().timeout(timeout).user_agent(user_agent);
        if !use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("build http client")?;
        Ok(Self {
            client,
            export_url: export_url.to_string(),
        })
    }

    pub fn export_link(&self, share_link: &str) -> anyhow::Result<String> {
        export_link(share_link, &self.export_url)
    }

    pub fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("download: {url}"))?
            .error_for_status()
            .with_context(|| format!("download: {url}"))?;
        let bytes = resp.bytes().with_context(|| format!("read body: {url}"))?;
        Ok(bytes.to_vec())
    }

    /// Scrapes the share page title; `None` when the page has no usable `<title>`.
    pub fn fetch_title(&self, share_link: &str) -> anyhow::Result<Option<String>> {
        let html = self
            .client
            .get(share_link)
            .send()
            .with_context(|| format!("fetch page: {share_link}"))?
            .error_for_status()
            .with_context(|| format!("fetch page: {share_link}"))?
            .text()
            .with_context(|| format!("read page: {share_link}"))?;
        Ok(title_from_html(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::{document_id, export_link, title_from_html, DEFAULT_EXPORT_URL};

    #[test]
    fn extracts_document_id() {
        let link = "https://docs.google.com/document/d/1AbC-xyz_9/edit?usp=sharing";
        assert_eq!(document_id(link).expect("id"), "1AbC-xyz_9");
        assert_eq!(
            export_link(link, DEFAULT_EXPORT_URL).expect("export"),
            "https://docs.google.com/document/d/1AbC-xyz_9/export?format=docx"
        );
    }

    #[test]
    fn id_may_end_the_link() {
        assert_eq!(document_id("https://docs.google.com/document/d/abc").expect("id"), "abc");
    }

    #[test]
    fn rejects_links_without_document_path() {
        let err = document_id("https://docs.google.com/spreadsheets/d/abc/edit").unwrap_err();
        assert!(err.to_string().contains("invalid Google Docs link"));
        assert!(export_link("not a link", DEFAULT_EXPORT_URL).is_err());
    }

    #[test]
    fn custom_export_template() {
        let url = export_link("/document/d/ID/", "http://mirror/{id}.docx").expect("export");
        assert_eq!(url, "http://mirror/ID.docx");
    }

    #[test]
    fn title_suffix_is_stripped() {
        let html = "<html><head><title>My Notes - Google Docs</title></head></html>";
        assert_eq!(title_from_html(html).as_deref(), Some("My Notes"));
    }

    #[test]
    fn missing_or_blank_title_is_none() {
        assert_eq!(title_from_html("<html></html>"), None);
        assert_eq!(title_from_html("<title> - Google Docs</title>"), None);
        // a title split across lines does not match
        assert_eq!(title_from_html("<title>a\nb</title>"), None);
    }

    #[test]
    fn first_title_wins() {
        let html = "<title>One</title><svg><title>Two</title></svg>";
        assert_eq!(title_from_html(html).as_deref(), Some("One"));
    }
}
