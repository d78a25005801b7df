//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `CONDUCTOR__*` 覆盖（双下划线表示嵌套，如 `CONDUCTOR__LLM__PROVIDER=openai`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub tools: ToolsSection,
    pub voice: VoiceSection,
}

/// [app] 段：应用名、工作目录
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 文件命令与 Python 执行的沙箱根目录，未设置时用 ./workspace
    pub workspace_root: Option<PathBuf>,
}

impl AppSection {
    pub fn workspace(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("workspace"))
    }
}

/// [llm] 段：后端选择、模型与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：deepseek / openai / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 摘要与代码工具使用的模型
    #[serde(default = "default_model")]
    pub model: String,
    /// 子 Agent 使用的快速模型
    #[serde(default = "default_fast_model")]
    pub fast_model: String,
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            fast_model: default_fast_model(),
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "deepseek".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_fast_model() -> String {
    "deepseek-chat".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// [tools] 段：命令超时、搜索、浏览、Python 执行
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// 单条命令的总超时（秒），覆盖协作者调用
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub browse: BrowseSection,
    #[serde(default)]
    pub python: PythonSection,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            search: SearchSection::default(),
            browse: BrowseSection::default(),
            python: PythonSection::default(),
        }
    }
}

fn default_command_timeout_secs() -> u64 {
    120
}

/// [tools.search] 段：搜索引擎地址、结果条数、HTTP 超时
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_search_url")]
    pub engine_url: String,
    #[serde(default = "default_wikidata_url")]
    pub wikidata_url: String,
    #[serde(default = "default_num_results")]
    pub num_results: usize,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            engine_url: default_search_url(),
            wikidata_url: default_wikidata_url(),
            num_results: default_num_results(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}

fn default_wikidata_url() -> String {
    "https://www.wikidata.org/w/api.php".to_string()
}

fn default_num_results() -> usize {
    8
}

fn default_http_timeout_secs() -> u64 {
    15
}

/// [tools.browse] 段：抓取超时、最大字符数、域名白名单（空表示不限）、链接条数、摘要分块
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseSection {
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_result_chars")]
    pub max_result_chars: usize,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    #[serde(default = "default_summary_chunk_chars")]
    pub summary_chunk_chars: usize,
}

impl Default for BrowseSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            max_result_chars: default_max_result_chars(),
            allowed_domains: Vec::new(),
            max_links: default_max_links(),
            summary_chunk_chars: default_summary_chunk_chars(),
        }
    }
}

fn default_max_result_chars() -> usize {
    20_000
}

fn default_max_links() -> usize {
    5
}

fn default_summary_chunk_chars() -> usize {
    8000
}

/// [tools.python] 段：解释器与执行超时
#[derive(Debug, Clone, Deserialize)]
pub struct PythonSection {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_python_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PythonSection {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_secs: default_python_timeout_secs(),
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_python_timeout_secs() -> u64 {
    60
}

/// [voice] 段：朗读模式（speak mode）与 TTS 程序
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_voice_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for VoiceSection {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_voice_command(),
            args: Vec::new(),
        }
    }
}

fn default_voice_command() -> String {
    if cfg!(target_os = "macos") {
        "say".to_string()
    } else {
        "espeak".to_string()
    }
}

/// 从 config 目录加载配置，环境变量 CONDUCTOR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 CONDUCTOR__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CONDUCTOR")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
