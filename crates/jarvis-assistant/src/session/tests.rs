use std::sync::Arc;
use std::time::Duration;

use jarvis_common::LanguageModel;

use super::*;
use crate::error::{AssistantError, ErrorKind};
use crate::gateway::*;
use crate::mock::{run, text_message, MockGateway};
use crate::stream::{ConsoleHandler, StreamHandler};
use crate::vector_store::{VectorStore, VectorStoreSettings};

async fn session(gateway: &Arc<MockGateway>) -> AssistantSession {
    AssistantSession::connect(gateway.clone(), None, AssistantConfig::default())
        .await
        .unwrap()
        .with_poll_interval(Duration::ZERO)
}

fn function_tool(name: &str) -> Tool {
    Tool::Function {
        function: FunctionDefinition {
            name: name.into(),
            description: None,
            parameters: serde_json::json!({"type": "object"}),
        },
    }
}

// ---------------------------------------------------------------------------
// Construction and configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_creates_assistant_with_file_search() {
    let gateway = MockGateway::new();
    let config = AssistantConfig::default()
        .with_name("Jarvis")
        .with_tools(vec![function_tool("open_webpage"), Tool::FileSearch]);
    let session = AssistantSession::connect(gateway.clone(), None, config)
        .await
        .unwrap();

    assert_eq!(session.id(), Some("asst_1"));
    assert_eq!(session.name(), "Jarvis");
    assert_eq!(
        session.config().tools,
        vec![function_tool("open_webpage"), Tool::FileSearch]
    );
    let remote_tools = gateway.inspect(|s| s.assistants["asst_1"].tools.clone());
    assert_eq!(remote_tools, session.config().tools);
}

#[tokio::test]
async fn connect_adds_file_search_when_missing() {
    let gateway = MockGateway::new();
    let config = AssistantConfig {
        tools: Vec::new(),
        ..Default::default()
    };
    let session = AssistantSession::connect(gateway.clone(), None, config)
        .await
        .unwrap();
    assert_eq!(session.config().tools, vec![Tool::FileSearch]);
}

#[tokio::test]
async fn connect_mirrors_existing_assistant() {
    let gateway = MockGateway::new();
    gateway.script(|s| {
        s.assistants.insert(
            "asst_remote".into(),
            AssistantObject {
                id: "asst_remote".into(),
                name: Some("Friday".into()),
                instructions: Some("Be brief.".into()),
                model: "gpt-4o-mini".into(),
                tools: vec![Tool::FileSearch, Tool::CodeInterpreter],
                tool_resources: None,
            },
        );
    });

    let session =
        AssistantSession::connect(gateway.clone(), Some("asst_remote"), Default::default())
            .await
            .unwrap();

    assert_eq!(session.id(), Some("asst_remote"));
    assert_eq!(session.name(), "Friday");
    assert_eq!(session.config().instructions, "Be brief.");
    assert_eq!(session.config().model, LanguageModel::Gpt4oMini);
    assert_eq!(gateway.calls(), vec!["retrieve_assistant"]);
}

#[tokio::test]
async fn connect_keeps_file_search_when_remote_lacks_it() {
    let gateway = MockGateway::new();
    gateway.script(|s| {
        s.assistants.insert(
            "asst_remote".into(),
            AssistantObject {
                id: "asst_remote".into(),
                name: Some("Friday".into()),
                instructions: None,
                model: "gpt-4o".into(),
                tools: vec![Tool::CodeInterpreter, function_tool("open_webpage")],
                tool_resources: None,
            },
        );
    });

    let session =
        AssistantSession::connect(gateway.clone(), Some("asst_remote"), Default::default())
            .await
            .unwrap();

    let tools = &session.config().tools;
    assert_eq!(tools.iter().filter(|t| t.is_file_search()).count(), 1);
    assert_eq!(
        *tools,
        vec![
            Tool::CodeInterpreter,
            function_tool("open_webpage"),
            Tool::FileSearch
        ]
    );
    assert_eq!(gateway.count("update_assistant"), 0);
}

#[tokio::test]
async fn connect_keeps_configured_model_for_unknown_remote_model() {
    let gateway = MockGateway::new();
    gateway.script(|s| {
        s.assistants.insert(
            "asst_remote".into(),
            AssistantObject {
                id: "asst_remote".into(),
                name: None,
                instructions: None,
                model: "gpt-4o-2024-08-06".into(),
                tools: vec![Tool::FileSearch],
                tool_resources: None,
            },
        );
    });
    let config = AssistantConfig::default().with_model(LanguageModel::Gpt4o);
    let session = AssistantSession::connect(gateway.clone(), Some("asst_remote"), config)
        .await
        .unwrap();
    assert_eq!(session.config().model, LanguageModel::Gpt4o);
    assert_eq!(session.name(), DEFAULT_NAME);
}

#[tokio::test]
async fn connect_to_missing_assistant_is_resource_error() {
    let gateway = MockGateway::new();
    let err = AssistantSession::connect(gateway.clone(), Some("asst_gone"), Default::default())
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Resource);
}

#[tokio::test]
async fn updates_mirror_remote_on_success() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;

    session.update_name("Edith").await.unwrap();
    session.update_instructions("Answer in French.").await.unwrap();
    session.update_model(LanguageModel::Gpt4Turbo).await.unwrap();

    assert_eq!(session.name(), "Edith");
    assert_eq!(session.config().instructions, "Answer in French.");
    assert_eq!(session.config().model, LanguageModel::Gpt4Turbo);

    let updates = gateway.inspect(|s| s.assistant_updates.clone());
    assert_eq!(updates.len(), 3);
    assert_eq!(
        updates[0],
        AssistantUpdate {
            name: Some("Edith".into()),
            ..Default::default()
        }
    );
    assert_eq!(updates[2].model.as_deref(), Some("gpt-4-turbo"));
}

#[tokio::test]
async fn failed_update_leaves_local_state() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    gateway.script(|s| {
        s.failing.insert("update_assistant");
    });

    let err = session.update_name("Edith").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(session.name(), DEFAULT_NAME);
}

#[tokio::test]
async fn update_tools_keeps_single_file_search() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;

    session
        .update_tools(vec![
            Tool::FileSearch,
            function_tool("write_code_snippet"),
            Tool::FileSearch,
        ])
        .await
        .unwrap();

    let expected = vec![function_tool("write_code_snippet"), Tool::FileSearch];
    assert_eq!(session.config().tools, expected);
    let updates = gateway.inspect(|s| s.assistant_updates.clone());
    assert_eq!(updates[0].tools.as_ref(), Some(&expected));
}

#[tokio::test]
async fn delete_assistant_clears_threads_and_id() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();

    session.delete_assistant().await.unwrap();
    assert_eq!(session.id(), None);
    assert!(session.thread_aliases().is_empty());

    // Second call is a no-op
    session.delete_assistant().await.unwrap();
    assert_eq!(gateway.count("delete_assistant"), 1);

    let err = session.update_name("x").await.unwrap_err();
    assert!(matches!(err, AssistantError::Unbound { .. }));
}

#[tokio::test]
async fn refused_assistant_deletion_keeps_state() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.refuse_delete.insert("asst_1".into());
    });

    let err = session.delete_assistant().await.unwrap_err();
    assert!(matches!(err, AssistantError::DeletionRefused { .. }));
    assert_eq!(session.id(), Some("asst_1"));
    assert_eq!(session.thread_id("main"), Some("thr_1"));
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_thread_alias_is_rejected() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();

    let err = session.create_thread("main").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(session.thread_aliases(), vec!["main"]);
    assert_eq!(session.thread_id("main"), Some("thr_1"));
    assert_eq!(gateway.count("create_thread"), 1);
}

#[tokio::test]
async fn delete_unknown_thread_makes_no_remote_call() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    let before = gateway.call_count();

    let err = session.delete_thread("ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(gateway.call_count(), before);
}

#[tokio::test]
async fn delete_thread_releases_alias_on_confirmation() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();

    session.delete_thread("main").await.unwrap();
    assert!(session.thread_id("main").is_none());
}

#[tokio::test]
async fn refused_thread_deletion_keeps_alias() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.refuse_delete.insert("thr_1".into());
    });

    let err = session.delete_thread("main").await.unwrap_err();
    assert!(matches!(err, AssistantError::DeletionRefused { .. }));
    assert_eq!(session.thread_id("main"), Some("thr_1"));
}

#[tokio::test]
async fn rename_onto_taken_alias_fails() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("a").await.unwrap();
    session.create_thread("b").await.unwrap();

    let err = session.rename_thread("a", "b").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(session.thread_id("a"), Some("thr_1"));
    assert_eq!(session.thread_id("b"), Some("thr_2"));
}

#[tokio::test]
async fn rename_onto_itself_is_duplicate() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("a").await.unwrap();

    let err = session.rename_thread("a", "a").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(session.thread_aliases(), vec!["a"]);
    assert_eq!(session.thread_id("a"), Some("thr_1"));
}

#[tokio::test]
async fn rename_moves_remote_id() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("a").await.unwrap();
    let before = gateway.call_count();

    session.rename_thread("a", "c").unwrap();
    assert!(session.thread_id("a").is_none());
    assert_eq!(session.thread_id("c"), Some("thr_1"));
    assert_eq!(gateway.call_count(), before);

    let err = session.rename_thread("a", "d").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn retrieve_thread_fetches_remote() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();

    let thread = session.retrieve_thread("main").await.unwrap();
    assert_eq!(thread.id, "thr_1");
    assert_eq!(
        session.retrieve_thread("ghost").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn link_store_to_thread_replaces_resources() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    let store = VectorStore::connect(gateway.clone(), None, VectorStoreSettings::default())
        .await
        .unwrap();

    session
        .link_vector_store(&store, LinkScope::Thread("main"))
        .await
        .unwrap();

    let updates = gateway.inspect(|s| s.thread_updates.clone());
    assert_eq!(
        updates,
        vec![("thr_1".to_string(), ToolResources::single_vector_store("vs_1"))]
    );
}

#[tokio::test]
async fn link_store_to_assistant() {
    let gateway = MockGateway::new();
    let session = session(&gateway).await;
    let store = VectorStore::connect(gateway.clone(), None, VectorStoreSettings::default())
        .await
        .unwrap();

    session
        .link_vector_store(&store, LinkScope::Assistant)
        .await
        .unwrap();

    let resources = gateway.inspect(|s| s.assistants["asst_1"].tool_resources.clone());
    assert_eq!(resources, Some(ToolResources::single_vector_store("vs_1")));
}

#[tokio::test]
async fn link_unbound_store_fails_without_remote_update() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    let mut store = VectorStore::connect(gateway.clone(), None, VectorStoreSettings::default())
        .await
        .unwrap();
    store.delete_store(false).await.unwrap();

    for scope in [LinkScope::Assistant, LinkScope::Thread("main")] {
        let err = session.link_vector_store(&store, scope).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Link);
    }
    assert_eq!(gateway.count("update_assistant"), 0);
    assert_eq!(gateway.count("update_thread"), 0);
}

#[tokio::test]
async fn link_to_unknown_thread_is_not_found() {
    let gateway = MockGateway::new();
    let session = session(&gateway).await;
    let store = VectorStore::connect(gateway.clone(), None, VectorStoreSettings::default())
        .await
        .unwrap();

    let err = session
        .link_vector_store(&store, LinkScope::Thread("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(gateway.count("update_thread"), 0);
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn polled_run_returns_latest_assistant_texts() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    assert_eq!(session.id(), Some("asst_1"));
    assert_eq!(session.create_thread("main").await.unwrap(), "thr_1");

    session.post_message("main", "hello").await.unwrap();
    gateway.script(|s| {
        s.run_statuses.extend([
            RunStatus::InProgress,
            RunStatus::InProgress,
            RunStatus::Completed,
        ]);
        s.messages = vec![
            text_message("msg_2", Role::Assistant, "hi there"),
            text_message("msg_1", Role::User, "hello"),
        ];
    });

    let texts = session.run_to_completion("main").await.unwrap();
    assert_eq!(texts, vec!["hi there"]);
    assert_eq!(gateway.count("retrieve_run"), 2);
}

#[tokio::test]
async fn polled_run_returns_texts_oldest_first() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.messages = vec![
            text_message("msg_4", Role::Assistant, "second"),
            text_message("msg_3", Role::Assistant, "first"),
            text_message("msg_2", Role::User, "question"),
            text_message("msg_1", Role::Assistant, "old answer"),
        ];
    });

    let texts = session.run_to_completion("main").await.unwrap();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn failed_run_reports_status() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.run_statuses
            .extend([RunStatus::Queued, RunStatus::Failed]);
    });

    let err = session.run_to_completion("main").await.unwrap_err();
    assert!(matches!(
        err,
        AssistantError::Run {
            status: RunStatus::Failed
        }
    ));
    assert_eq!(gateway.count("list_messages"), 0);
}

#[tokio::test]
async fn completed_run_usage_is_tracked() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.run_statuses
            .extend([RunStatus::InProgress, RunStatus::Completed]);
        s.run_usage = Some(RunUsage {
            prompt_tokens: 12,
            completion_tokens: 8,
        });
    });

    session.run_to_completion("main").await.unwrap();
    assert_eq!(session.usage().total_tokens(), 20);
    assert!(session.usage().for_thread("main").is_some());
}

#[tokio::test]
async fn messages_need_a_known_thread() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;

    let err = session.post_message("ghost", "hi").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = session.run_to_completion("ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(gateway.count("create_message"), 0);
    assert_eq!(gateway.count("create_run"), 0);
}

#[tokio::test]
async fn streamed_response_goes_through_handler() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        let mut completed = run("run_1", RunStatus::Completed);
        completed.usage = Some(RunUsage {
            prompt_tokens: 3,
            completion_tokens: 4,
        });
        s.streams.push_back(vec![
            Ok(RunEvent::MessageCreated(text_message("msg_1", Role::Assistant, ""))),
            Ok(RunEvent::TextDelta("Done.".into())),
            Ok(RunEvent::MessageCompleted(text_message(
                "msg_1",
                Role::Assistant,
                "Done.",
            ))),
            Ok(RunEvent::RunCompleted(completed)),
            Ok(RunEvent::Done),
        ]);
    });

    let mut console =
        ConsoleHandler::with_writer(session.name().to_string(), Box::new(std::io::sink()));
    let summary = session
        .stream_response("main", &mut console)
        .await
        .unwrap();

    assert_eq!(summary.text(), "Done.");
    assert!(console.transcript().starts_with("\nAssistant > Done."));
    assert_eq!(session.usage().total_tokens(), 7);
}

#[tokio::test]
async fn stream_failures_surface_as_stream_errors() {
    let gateway = MockGateway::new();
    let mut session = session(&gateway).await;
    session.create_thread("main").await.unwrap();
    gateway.script(|s| {
        s.streams
            .push_back(vec![Ok(RunEvent::Error("rate limit reached".into()))]);
    });

    struct Silent;
    impl StreamHandler for Silent {}

    let err = session
        .stream_response("main", &mut Silent)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Stream);
    assert!(err.to_string().contains("rate limit reached"));
}
