//! 网页搜索协作者：DuckDuckGo HTML 端点与 Wikidata 实体搜索
//!
//! 两者都只返回有序的链接列表，格式化（JSON）由 google / wikidata 命令负责。

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use serde_json::Value;

/// 搜索协作者：search(query, n) -> 有序链接
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>, String>;
}

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// DuckDuckGo HTML 搜索（无需 API Key）
pub struct DuckDuckGoSearch {
    client: Client,
    engine_url: String,
}

impl DuckDuckGoSearch {
    pub fn new(engine_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            engine_url: engine_url.into(),
        }
    }
}

fn result_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<a[^>]*class="result__a"[^>]*href="([^"]+)""#)
            .expect("result link regex is valid")
    })
}

/// 从搜索结果页中提取目标链接；DuckDuckGo 的跳转链接（/l/?uddg=...）会被还原成真实地址
pub fn parse_result_links(html: &str, num_results: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for caps in result_link_regex().captures_iter(html) {
        let Some(link) = decode_result_link(&caps[1]) else {
            continue;
        };
        if !links.contains(&link) {
            links.push(link);
        }
        if links.len() >= num_results {
            break;
        }
    }
    links
}

fn decode_result_link(raw: &str) -> Option<String> {
    let raw = raw.replace("&amp;", "&");
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw
    };
    let url = Url::parse(&absolute).ok()?;
    if url.path().starts_with("/l/") {
        return url
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }
    Some(url.to_string())
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>, String> {
        tracing::info!(query = %query, "web search");
        let resp = self
            .client
            .get(&self.engine_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("Read body: {}", e))?;
        Ok(parse_result_links(&body, num_results))
    }
}

/// Wikidata 实体搜索（wbsearchentities）
pub struct WikidataSearch {
    client: Client,
    api_url: String,
}

impl WikidataSearch {
    pub fn new(api_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_url: api_url.into(),
        }
    }
}

/// 把 wbsearchentities 的响应转换为实体页面链接
pub fn wikidata_links(response: &Value, num_results: usize) -> Vec<String> {
    response
        .get("search")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(|id| id.as_str()))
                .take(num_results)
                .map(|id| format!("https://www.wikidata.org/wiki/{id}"))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl WebSearch for WikidataSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>, String> {
        tracing::info!(query = %query, "wikidata search");
        let limit = num_results.to_string();
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbsearchentities"),
                ("format", "json"),
                ("language", "en"),
                ("search", query),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let data: Value = resp.json().await.map_err(|e| format!("Invalid response: {}", e))?;
        tracing::debug!(response = %data, "wikidata raw response");
        Ok(wikidata_links(&data, num_results))
    }
}
