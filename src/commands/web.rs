//! google / wikidata / get_text_summary / get_hyperlinks / browse_website

use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;
use crate::web::{PageFetcher, Summarizer, WebSearch};

fn links_json(links: &[String]) -> String {
    serde_json::to_string_pretty(links).unwrap_or_else(|_| "[]".to_string())
}

pub struct Google {
    search: Arc<dyn WebSearch>,
    num_results: usize,
}

impl Google {
    pub fn new(search: Arc<dyn WebSearch>, num_results: usize) -> Self {
        Self { search, num_results }
    }
}

#[async_trait]
impl Command for Google {
    fn name(&self) -> &'static str {
        "google"
    }

    fn description(&self) -> &'static str {
        "Google Search"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["input"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let query = args.str("input")?;
        let links = self
            .search
            .search(query, self.num_results)
            .await
            .map_err(|e| CommandError::collaborator("web search", e))?;
        Ok(CommandOutput::Text(links_json(&links)))
    }
}

pub struct Wikidata {
    search: Arc<dyn WebSearch>,
    num_results: usize,
}

impl Wikidata {
    pub fn new(search: Arc<dyn WebSearch>, num_results: usize) -> Self {
        Self { search, num_results }
    }
}

#[async_trait]
impl Command for Wikidata {
    fn name(&self) -> &'static str {
        "wikidata"
    }

    fn description(&self) -> &'static str {
        "Wikidata Search"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["input"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let query = args.str("input")?;
        let links = self
            .search
            .search(query, self.num_results)
            .await
            .map_err(|e| CommandError::collaborator("wikidata search", e))?;
        Ok(CommandOutput::Text(links_json(&links)))
    }
}

/// 抓取与摘要，三条浏览命令共用
#[derive(Clone)]
pub struct Browsing {
    pub browser: Arc<dyn PageFetcher>,
    pub summarizer: Arc<dyn Summarizer>,
    pub max_links: usize,
}

impl Browsing {
    async fn text_summary(&self, url: &str) -> Result<String, CommandError> {
        let text = self
            .browser
            .scrape_text(url)
            .await
            .map_err(|e| CommandError::collaborator("page fetcher", e))?;
        let summary = self
            .summarizer
            .summarize(&text)
            .await
            .map_err(|e| CommandError::collaborator("summarizer", e))?;
        Ok(format!(" \"Result\" : {summary}"))
    }

    async fn hyperlinks(&self, url: &str) -> Result<Vec<String>, CommandError> {
        self.browser
            .scrape_links(url)
            .await
            .map_err(|e| CommandError::collaborator("page fetcher", e))
    }
}

pub struct GetTextSummary(pub Browsing);

#[async_trait]
impl Command for GetTextSummary {
    fn name(&self) -> &'static str {
        "get_text_summary"
    }

    fn description(&self) -> &'static str {
        "Get text summary"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["url"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let url = args.str("url")?;
        Ok(CommandOutput::Text(self.0.text_summary(url).await?))
    }
}

pub struct GetHyperlinks(pub Browsing);

#[async_trait]
impl Command for GetHyperlinks {
    fn name(&self) -> &'static str {
        "get_hyperlinks"
    }

    fn description(&self) -> &'static str {
        "Get hyperlinks"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["url"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let url = args.str("url")?;
        let links = self.0.hyperlinks(url).await?;
        Ok(CommandOutput::Text(links_json(&links)))
    }
}

pub struct BrowseWebsite(pub Browsing);

#[async_trait]
impl Command for BrowseWebsite {
    fn name(&self) -> &'static str {
        "browse_website"
    }

    fn description(&self) -> &'static str {
        "Browse Website"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["url"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let url = args.str("url")?;
        let summary = self.0.text_summary(url).await?;
        let mut links = self.0.hyperlinks(url).await?;
        links.truncate(self.0.max_links);
        let links = serde_json::to_string(&links).unwrap_or_else(|_| "[]".to_string());
        Ok(CommandOutput::Text(format!(
            "Website Content Summary: {summary}\n\nLinks: {links}"
        )))
    }
}
