//! 通过完整命令表分发命令的集成测试

mod common;

use common::{args, harness};
use conductor::core::CommandError;
use conductor::CommandOutput;
use serde_json::{json, Map};

fn text(s: &str) -> CommandOutput {
    CommandOutput::text(s)
}

#[tokio::test]
async fn test_memory_scenario() {
    let h = harness();
    let router = h.interpreter.router();

    assert_eq!(
        router.dispatch("memory_add", args(json!({"string": "A"}))).await,
        text("Committing memory with string \"A\" ")
    );
    router.dispatch("memory_add", args(json!({"string": "B"}))).await;
    assert_eq!(h.interpreter.memory().lock().await.entries(), ["A", "B"]);

    assert_eq!(
        router.dispatch("memory_del", args(json!({"key": 0}))).await,
        text("Deleting memory with key 0")
    );
    assert_eq!(h.interpreter.memory().lock().await.entries(), ["B"]);

    assert_eq!(
        router.dispatch("memory_ovr", args(json!({"key": "0", "string": "C"}))).await,
        text("Overwriting memory with key 0 and string C")
    );
    assert_eq!(h.interpreter.memory().lock().await.entries(), ["C"]);
}

#[tokio::test]
async fn test_memory_invalid_key_is_reported_not_raised() {
    let h = harness();
    let router = h.interpreter.router();
    router.dispatch("memory_add", args(json!({"string": "keep"}))).await;

    for key in [
        json!(-1),
        json!(1),
        json!(99),
        json!(u64::MAX),
        json!("18446744073709551615"),
    ] {
        assert_eq!(
            router.execute("memory_del", args(json!({"key": key}))).await.unwrap(),
            CommandOutput::NoResult
        );
        assert_eq!(
            router
                .execute("memory_ovr", args(json!({"key": key, "string": "x"})))
                .await
                .unwrap(),
            CommandOutput::NoResult
        );
    }
    assert_eq!(h.interpreter.memory().lock().await.entries(), ["keep"]);
    assert_eq!(CommandOutput::NoResult.to_string(), "None");
}

#[tokio::test]
async fn test_memory_add_without_string_is_argument_error() {
    let h = harness();
    let router = h.interpreter.router();

    let err = router.execute("memory_add", Map::new()).await.unwrap_err();
    assert!(matches!(
        err,
        CommandError::MissingArgument { ref command, ref field } if command == "memory_add" && field == "string"
    ));

    let CommandOutput::Text(out) = router.dispatch("memory_add", Map::new()).await else {
        panic!("expected text");
    };
    assert!(out.starts_with("Error: "), "{out}");
    assert!(h.interpreter.memory().lock().await.is_empty());
}

#[tokio::test]
async fn test_unknown_command() {
    let h = harness();
    assert_eq!(
        h.interpreter.router().dispatch("make_coffee", Map::new()).await,
        text("Unknown command make_coffee")
    );
}

#[tokio::test]
async fn test_agent_lifecycle() {
    let h = harness();
    let router = h.interpreter.router();

    let CommandOutput::Text(started) = router
        .dispatch(
            "start_agent",
            args(json!({"name": "Bob", "task": "summarize", "prompt": "go"})),
        )
        .await
    else {
        panic!("expected text");
    };
    assert_eq!(
        started,
        "Agent Bob created with key 0. First response: Agent 0 responded: Echo from Mock (3 messages): go"
    );

    assert_eq!(
        router.dispatch("list_agents", Map::new()).await,
        text("[(0, 'summarize')]")
    );

    assert_eq!(
        router
            .dispatch("message_agent", args(json!({"key": 0, "message": "more"})))
            .await,
        text("Agent 0 responded: Echo from Mock (5 messages): more")
    );

    assert_eq!(
        router.dispatch("delete_agent", args(json!({"key": 0}))).await,
        text("Agent 0 deleted.")
    );
    assert_eq!(
        router.dispatch("delete_agent", args(json!({"key": 0}))).await,
        text("Agent 0 does not exist.")
    );
    assert_eq!(router.dispatch("list_agents", Map::new()).await, text("[]"));
}

#[tokio::test]
async fn test_agent_keys_not_reused_and_stale_keys_fail() {
    let h = harness();
    let router = h.interpreter.router();
    let start = |name: &'static str| {
        args(json!({"name": name, "task": "t", "prompt": "p"}))
    };

    router.dispatch("start_agent", start("a")).await;
    router.dispatch("delete_agent", args(json!({"key": 0}))).await;
    let CommandOutput::Text(second) = router.dispatch("start_agent", start("b")).await else {
        panic!("expected text");
    };
    assert!(second.starts_with("Agent b created with key 1."), "{second}");

    let err = router
        .execute("message_agent", args(json!({"key": 0, "message": "hello?"})))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::AgentNotFound(0)));
    assert_eq!(
        router
            .dispatch("message_agent", args(json!({"key": 0, "message": "hello?"})))
            .await,
        text("Error: Agent 0 not found")
    );
    assert_eq!(
        router.dispatch("delete_agent", args(json!({"key": -3}))).await,
        text("Agent -3 does not exist.")
    );
}

#[tokio::test]
async fn test_start_agent_speaks() {
    let h = harness();
    h.interpreter
        .router()
        .dispatch(
            "start_agent",
            args(json!({"name": "Code_Reviewer", "task": "review", "prompt": "go"})),
        )
        .await;
    let said = h.voice.said.lock().unwrap().clone();
    assert_eq!(said[0], "Code Reviewer here, Reporting for duty!");
    assert_eq!(said[1], "Hello Code Reviewer. Your task is as follows. review.");
    assert_eq!(said[2], "Echo from Mock (3 messages): go");
}

#[tokio::test]
async fn test_search_commands() {
    let h = harness();
    let router = h.interpreter.router();

    let CommandOutput::Text(out) = router.dispatch("google", args(json!({"input": "rust"}))).await
    else {
        panic!("expected text");
    };
    let links: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(links[0], "https://search/rust/0");
    assert_eq!(links.len(), 3);

    let CommandOutput::Text(out) = router.dispatch("wikidata", args(json!({"input": "Q"}))).await
    else {
        panic!("expected text");
    };
    assert!(out.contains("https://www.wikidata.org/wiki/Q/0"));

    assert_eq!(
        router.dispatch("google", args(json!({"input": "fail"}))).await,
        text("Error: web search failed: HTTP 503")
    );
}

#[tokio::test]
async fn test_browse_commands() {
    let h = harness();
    let router = h.interpreter.router();

    assert_eq!(
        router
            .dispatch("get_text_summary", args(json!({"url": "https://a.test"})))
            .await,
        text(" \"Result\" : summary of [Body of https://a.test]")
    );

    let CommandOutput::Text(out) = router
        .dispatch("browse_website", args(json!({"url": "https://a.test"})))
        .await
    else {
        panic!("expected text");
    };
    assert!(out.starts_with(
        "Website Content Summary:  \"Result\" : summary of [Body of https://a.test]\n\nLinks: ["
    ));
    assert!(out.contains("link4"));
    assert!(!out.contains("link5"));

    let CommandOutput::Text(out) = router
        .dispatch("get_hyperlinks", args(json!({"url": "https://a.test"})))
        .await
    else {
        panic!("expected text");
    };
    let links: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(links.len(), 8);

    assert_eq!(
        router
            .dispatch("browse_website", args(json!({"url": "https://broken.test"})))
            .await,
        text("Error: page fetcher failed: HTTP 404 Not Found")
    );
}

#[tokio::test]
async fn test_file_commands() {
    let h = harness();
    let router = h.interpreter.router();

    assert_eq!(
        router
            .dispatch("write_to_file", args(json!({"file": "out/a.txt", "text": "one"})))
            .await,
        text("File written to successfully.")
    );
    assert_eq!(
        router
            .dispatch("append_to_file", args(json!({"file": "out/a.txt", "text": " two"})))
            .await,
        text("Text appended successfully.")
    );
    assert_eq!(
        router.dispatch("read_file", args(json!({"file": "out/a.txt"}))).await,
        text("one two")
    );
    assert!(h.workspace.path().join("out/a.txt").exists());
    assert_eq!(
        router.dispatch("delete_file", args(json!({"file": "out/a.txt"}))).await,
        text("File deleted successfully.")
    );

    assert_eq!(
        router
            .dispatch("read_file", args(json!({"file": "../../etc/passwd"})))
            .await,
        text("Error: Path escape attempt: ../../etc/passwd")
    );
    let CommandOutput::Text(out) = router
        .dispatch("write_to_file", args(json!({"file": "x.txt"})))
        .await
    else {
        panic!("expected text");
    };
    assert_eq!(
        out,
        "Error: Missing required argument 'text' for command 'write_to_file'"
    );
}

#[tokio::test]
async fn test_code_commands() {
    let h = harness();
    let router = h.interpreter.router();

    assert_eq!(
        router.dispatch("evaluate_code", args(json!({"code": "x=1"}))).await,
        text("[\"review x=1\"]")
    );
    assert_eq!(
        router
            .dispatch(
                "improve_code",
                args(json!({"suggestions": ["rename x", "add docs"], "code": "x=1"}))
            )
            .await,
        text("x=1 # rename x; add docs")
    );
    assert_eq!(
        router
            .dispatch("write_tests", args(json!({"code": "x=1", "focus": "edge cases"})))
            .await,
        text("tests for x=1 focusing on [\"edge cases\"]")
    );
    assert_eq!(
        router
            .dispatch("execute_python_file", args(json!({"file": "main.py"})))
            .await,
        text("ran main.py")
    );
}

#[tokio::test]
async fn test_task_complete_is_terminal() {
    let h = harness();
    let router = h.interpreter.router();

    assert_eq!(
        router.dispatch("task_complete", args(json!({"reason": "done"}))).await,
        CommandOutput::Shutdown
    );
    assert!(h.shutdown.is_shutdown());
    assert!(matches!(
        router.execute("list_agents", Map::new()).await,
        Err(CommandError::ShutDown)
    ));
}

#[test]
fn test_prompt_section_lists_every_command() {
    let h = harness();
    let section = h.interpreter.router().table().to_prompt_section();
    for name in conductor::commands::BUILTIN_COMMANDS {
        assert!(section.contains(&format!("\"{name}\"")), "{name}");
    }
    assert!(section.starts_with("Commands:\n1. Google Search: \"google\", args: \"input\": \"<input>\""));
}
