//! 网页抓取协作者：正文提取与超链接抽取
//!
//! 可选域名白名单（为空则不限）；GET 请求带超时与 User-Agent；
//! 对 HTML 响应使用 html2text 提取可读文本，超过 max_result_chars 时截断并追加 ...[truncated]。

use std::collections::HashSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use html2text::from_read;
use regex::Regex;
use reqwest::{Client, Url};

use crate::web::search::http_client;

/// 页面抓取协作者
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面可读文本
    async fn scrape_text(&self, url: &str) -> Result<String, String>;

    /// 抓取页面超链接，格式为 "text (url)"
    async fn scrape_links(&self, url: &str) -> Result<Vec<String>, String>;
}

/// 基于 reqwest 的抓取实现
pub struct HttpBrowser {
    client: Client,
    allowed_domains: HashSet<String>,
    max_result_chars: usize,
}

/// 简易去除 HTML 标签（html2text 失败时的回退）
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 判断内容是否像 HTML（需提取可读文本）
fn looks_like_html(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("<!")
        || s.starts_with("<html")
        || s.starts_with("<HTML")
        || (s.len() > 20
            && s.contains('<')
            && (s.contains("</") || s.contains("<meta") || s.contains("<head")))
}

fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
            .expect("anchor regex is valid")
    })
}

/// 从 HTML 中抽取 (文本, 绝对地址)；相对地址按 base 解析，锚点与 javascript: 链接丢弃
pub fn extract_hyperlinks(html: &str, base: &str) -> Vec<(String, String)> {
    let base = Url::parse(base).ok();
    anchor_regex()
        .captures_iter(html)
        .filter_map(|caps| {
            let href = caps[1].trim().replace("&amp;", "&");
            if href.starts_with('#') || href.to_lowercase().starts_with("javascript:") {
                return None;
            }
            let url = match &base {
                Some(b) => b.join(&href).ok()?.to_string(),
                None => Url::parse(&href).ok()?.to_string(),
            };
            Some((strip_html_tags(&caps[2]), url))
        })
        .collect()
}

/// 格式化为 "text (url)"
pub fn format_hyperlinks(links: &[(String, String)]) -> Vec<String> {
    links
        .iter()
        .map(|(text, url)| format!("{} ({})", text, url))
        .collect()
}

impl HttpBrowser {
    pub fn new(allowed_domains: Vec<String>, timeout_secs: u64, max_result_chars: usize) -> Self {
        let allowed_domains = allowed_domains
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self {
            client: http_client(timeout_secs),
            allowed_domains,
            max_result_chars,
        }
    }

    fn is_allowed(&self, url: &str) -> Result<(), String> {
        let domain = extract_domain(url).ok_or_else(|| format!("Invalid URL: {}", url))?;
        if self.allowed_domains.is_empty() || self.allowed_domains.contains(&domain) {
            return Ok(());
        }
        Err(format!("Domain not in allowlist: {}", domain))
    }

    /// 将 HTML 转为可读文本（去除 script/style 等）
    fn html_to_text(&self, html: &str) -> String {
        match from_read(html.as_bytes(), 120) {
            Ok(text) if !text.trim().is_empty() => text,
            _ => strip_html_tags(html),
        }
    }

    async fn fetch_raw(&self, url: &str) -> Result<String, String> {
        self.is_allowed(url)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("Read body: {}", e))?;
        Ok(body.trim_start_matches('\u{FEFF}').to_string())
    }

    fn truncate(&self, body: String) -> String {
        if body.chars().count() > self.max_result_chars {
            body.chars().take(self.max_result_chars).collect::<String>() + "\n...[truncated]"
        } else {
            body
        }
    }
}

#[async_trait]
impl PageFetcher for HttpBrowser {
    async fn scrape_text(&self, url: &str) -> Result<String, String> {
        tracing::info!(url = %url, "scrape text");
        let body = self.fetch_raw(url).await?;
        let text = if looks_like_html(&body) {
            self.html_to_text(&body)
        } else {
            body
        };
        Ok(self.truncate(text))
    }

    async fn scrape_links(&self, url: &str) -> Result<Vec<String>, String> {
        tracing::info!(url = %url, "scrape links");
        let body = self.fetch_raw(url).await?;
        Ok(format_hyperlinks(&extract_hyperlinks(&body, url)))
    }
}
