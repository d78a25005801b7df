//! Web 协作者：搜索、页面抓取、摘要

pub mod browse;
pub mod search;
pub mod summarize;

pub use browse::{extract_hyperlinks, format_hyperlinks, HttpBrowser, PageFetcher};
pub use search::{DuckDuckGoSearch, WebSearch, WikidataSearch};
pub use summarize::{split_text, LlmSummarizer, Summarizer};
