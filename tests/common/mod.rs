//! 集成测试共用的假协作者

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conductor::code::{CodeAssistant, PythonRunner};
use conductor::config::AppConfig;
use conductor::core::{CommandError, ShutdownManager};
use conductor::files::SafeFs;
use conductor::llm::MockLlmClient;
use conductor::voice::VoiceNotifier;
use conductor::web::{PageFetcher, Summarizer, WebSearch};
use conductor::{Collaborators, Interpreter};
use serde_json::{Map, Value};

pub struct FakeSearch {
    pub prefix: &'static str,
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>, String> {
        if query == "fail" {
            return Err("HTTP 503".to_string());
        }
        Ok((0..num_results.min(3))
            .map(|i| format!("{}/{}/{}", self.prefix, query, i))
            .collect())
    }
}

pub struct FakeBrowser;

#[async_trait]
impl PageFetcher for FakeBrowser {
    async fn scrape_text(&self, url: &str) -> Result<String, String> {
        if url.contains("broken") {
            return Err("HTTP 404 Not Found".to_string());
        }
        Ok(format!("Body of {url}"))
    }

    async fn scrape_links(&self, url: &str) -> Result<Vec<String>, String> {
        Ok((0..8).map(|i| format!("link{i} ({url}/{i})")).collect())
    }
}

pub struct FakeSummarizer;

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, String> {
        Ok(format!("summary of [{text}]"))
    }
}

pub struct FakeCode;

#[async_trait]
impl CodeAssistant for FakeCode {
    async fn evaluate_code(&self, code: &str) -> Result<String, String> {
        Ok(format!("[\"review {code}\"]"))
    }

    async fn improve_code(&self, suggestions: &[String], code: &str) -> Result<String, String> {
        Ok(format!("{code} # {}", suggestions.join("; ")))
    }

    async fn write_tests(&self, code: &str, focus: &[String]) -> Result<String, String> {
        Ok(format!("tests for {code} focusing on {:?}", focus))
    }
}

pub struct FakePython;

#[async_trait]
impl PythonRunner for FakePython {
    async fn execute_file(&self, file: &str) -> Result<String, CommandError> {
        Ok(format!("ran {file}"))
    }
}

#[derive(Default)]
pub struct RecordingVoice {
    pub said: Mutex<Vec<String>>,
}

impl VoiceNotifier for RecordingVoice {
    fn say(&self, text: &str) {
        self.said.lock().unwrap().push(text.to_string());
    }
}

pub struct Harness {
    pub interpreter: Interpreter,
    pub voice: Arc<RecordingVoice>,
    pub shutdown: Arc<ShutdownManager>,
    pub workspace: tempfile::TempDir,
}

pub fn harness() -> Harness {
    let workspace = tempfile::tempdir().unwrap();
    let voice = Arc::new(RecordingVoice::default());
    let collaborators = Collaborators {
        llm: Arc::new(MockLlmClient),
        search: Arc::new(FakeSearch { prefix: "https://search" }),
        wikidata: Arc::new(FakeSearch { prefix: "https://www.wikidata.org/wiki" }),
        browser: Arc::new(FakeBrowser),
        summarizer: Arc::new(FakeSummarizer),
        files: Arc::new(SafeFs::new(workspace.path())),
        code: Arc::new(FakeCode),
        python: Arc::new(FakePython),
        voice: voice.clone(),
    };
    let shutdown = Arc::new(ShutdownManager::new());
    let interpreter =
        Interpreter::new(&AppConfig::default(), collaborators, shutdown.clone()).unwrap();
    Harness {
        interpreter,
        voice,
        shutdown,
        workspace,
    }
}

pub fn args(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}
