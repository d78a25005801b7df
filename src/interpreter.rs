//! 解释器装配
//!
//! 进程启动时构建一次：协作者（LLM、搜索、抓取、文件、代码工具、朗读）、永久记忆与子 Agent 注册表，
//! 注册全部命令并校验命令表完整，得到一个 Router。记忆与注册表显式注入，便于测试与多实例。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::agents::AgentRegistry;
use crate::code::{AiCodeTools, CodeAssistant, LocalPython, PythonRunner};
use crate::commands::agents::{
    AgentCommands, DeleteAgent, ListAgents, MessageAgent, SharedAgents, StartAgent,
};
use crate::commands::code::{EvaluateCode, ExecutePythonFile, ImproveCode, WriteTests};
use crate::commands::files::{AppendToFile, DeleteFile, ReadFile, WriteToFile};
use crate::commands::lifecycle::TaskComplete;
use crate::commands::memory::{MemoryAdd, MemoryDel, MemoryOvr, SharedMemory};
use crate::commands::web::{BrowseWebsite, Browsing, GetHyperlinks, GetTextSummary, Google, Wikidata};
use crate::commands::{CommandTable, Router};
use crate::config::AppConfig;
use crate::core::{CommandError, ShutdownManager};
use crate::files::{FileStore, SafeFs};
use crate::llm::{create_llm_from_config, LlmClient};
use crate::memory::MemoryStore;
use crate::voice::{CommandVoice, NoopVoice, VoiceNotifier};
use crate::web::{
    DuckDuckGoSearch, HttpBrowser, LlmSummarizer, PageFetcher, Summarizer, WebSearch,
    WikidataSearch,
};

/// 外部协作者集合；测试可逐项替换为假实现
#[derive(Clone)]
pub struct Collaborators {
    pub llm: Arc<dyn LlmClient>,
    pub search: Arc<dyn WebSearch>,
    pub wikidata: Arc<dyn WebSearch>,
    pub browser: Arc<dyn PageFetcher>,
    pub summarizer: Arc<dyn Summarizer>,
    pub files: Arc<dyn FileStore>,
    pub code: Arc<dyn CodeAssistant>,
    pub python: Arc<dyn PythonRunner>,
    pub voice: Arc<dyn VoiceNotifier>,
}

impl Collaborators {
    /// 按配置构建真实协作者；工作区目录不存在时创建
    pub fn from_config(cfg: &AppConfig) -> Self {
        let llm = create_llm_from_config(cfg);
        let workspace = cfg.app.workspace();
        if let Err(e) = std::fs::create_dir_all(&workspace) {
            tracing::warn!(path = %workspace.display(), error = %e, "cannot create workspace");
        }
        let fs = SafeFs::new(&workspace);
        let search = &cfg.tools.search;
        let browse = &cfg.tools.browse;

        let voice: Arc<dyn VoiceNotifier> = if cfg.voice.enabled {
            Arc::new(CommandVoice::new(&cfg.voice.command, cfg.voice.args.clone()))
        } else {
            Arc::new(NoopVoice)
        };

        Self {
            search: Arc::new(DuckDuckGoSearch::new(&search.engine_url, search.timeout_secs)),
            wikidata: Arc::new(WikidataSearch::new(&search.wikidata_url, search.timeout_secs)),
            browser: Arc::new(HttpBrowser::new(
                browse.allowed_domains.clone(),
                browse.timeout_secs,
                browse.max_result_chars,
            )),
            summarizer: Arc::new(LlmSummarizer::new(
                llm.clone(),
                &cfg.llm.model,
                browse.summary_chunk_chars,
            )),
            code: Arc::new(AiCodeTools::new(llm.clone(), &cfg.llm.model)),
            python: Arc::new(LocalPython::new(
                fs.clone(),
                &cfg.tools.python.interpreter,
                cfg.tools.python.timeout_secs,
            )),
            files: Arc::new(fs),
            voice,
            llm,
        }
    }
}

/// 装配好的解释器：Router 加上它独占的两份状态
pub struct Interpreter {
    router: Router,
    memory: SharedMemory,
    agents: SharedAgents,
}

impl Interpreter {
    pub fn new(
        cfg: &AppConfig,
        collaborators: Collaborators,
        shutdown: Arc<ShutdownManager>,
    ) -> Result<Self, CommandError> {
        let memory: SharedMemory = Arc::new(Mutex::new(MemoryStore::new()));
        let agents: SharedAgents =
            Arc::new(Mutex::new(AgentRegistry::new(collaborators.llm.clone())));

        let agent_commands = AgentCommands::new(
            agents.clone(),
            collaborators.voice.clone(),
            &cfg.llm.fast_model,
        );
        let browsing = Browsing {
            browser: collaborators.browser.clone(),
            summarizer: collaborators.summarizer.clone(),
            max_links: cfg.tools.browse.max_links,
        };
        let num_results = cfg.tools.search.num_results;

        let mut table = CommandTable::new();
        table.register(Google::new(collaborators.search.clone(), num_results));
        table.register(Wikidata::new(collaborators.wikidata.clone(), num_results));
        table.register(MemoryAdd::new(memory.clone()));
        table.register(MemoryDel::new(memory.clone()));
        table.register(MemoryOvr::new(memory.clone()));
        table.register(StartAgent(agent_commands.clone()));
        table.register(MessageAgent(agent_commands.clone()));
        table.register(ListAgents(agent_commands.clone()));
        table.register(DeleteAgent(agent_commands));
        table.register(GetTextSummary(browsing.clone()));
        table.register(GetHyperlinks(browsing.clone()));
        table.register(BrowseWebsite(browsing));
        table.register(ReadFile(collaborators.files.clone()));
        table.register(WriteToFile(collaborators.files.clone()));
        table.register(AppendToFile(collaborators.files.clone()));
        table.register(DeleteFile(collaborators.files.clone()));
        table.register(EvaluateCode(collaborators.code.clone()));
        table.register(ImproveCode(collaborators.code.clone()));
        table.register(WriteTests(collaborators.code.clone()));
        table.register(ExecutePythonFile(collaborators.python.clone()));
        table.register(TaskComplete);
        table.verify()?;

        tracing::info!(commands = table.len(), "command table ready");

        Ok(Self {
            router: Router::new(table, cfg.tools.command_timeout_secs, shutdown),
            memory,
            agents,
        })
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn agents(&self) -> &SharedAgents {
        &self.agents
    }
}
