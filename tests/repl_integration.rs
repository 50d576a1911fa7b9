//! End-to-end runs of the terminal front-end.

use std::sync::Arc;
use std::time::Duration;

use assistant_chat::api::{
    AskRequest, AssistantBackend, AssistantSummary, SimulatedBackend, VectorStoreSummary,
    error::Result as ApiResult,
};
use assistant_chat::config::ViewConfig;
use assistant_chat::repl::Repl;
use assistant_chat::session::{ChatSession, MessageRole, ThreadState};
use assistant_chat::view::{ChatView, PENDING_INDICATOR};
use async_trait::async_trait;

fn view() -> ChatView {
    ChatView::new(&ViewConfig {
        width: 60,
        viewport_rows: 30,
        input_min_rows: 1,
        input_max_rows: 4,
    })
}

fn session() -> ChatSession {
    ChatSession::new(Arc::new(
        SimulatedBackend::new()
            .with_reply("Respuesta")
            .with_delay(Duration::ZERO),
    ))
}

async fn run(input: &str) -> (ChatSession, String) {
    run_with(session(), input).await
}

async fn run_with(session: ChatSession, input: &str) -> (ChatSession, String) {
    let mut repl = Repl::new(session, view(), input.as_bytes(), Vec::new());
    repl.run().await.unwrap();
    let (session, output) = repl.into_parts();
    (session, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_send_and_quit() {
    let (session, output) = run("Hola\n/quit\nnunca\n").await;

    assert!(output.starts_with("Loading..."));
    assert!(output.contains(PENDING_INDICATOR));
    assert!(output.contains("Respuesta"));

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content, "Hola");
    assert_eq!(messages[2].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_multiline_draft() {
    let (session, output) = run("primera\\\nsegunda\n").await;

    assert!(output.contains("> primera"));
    assert_eq!(session.messages()[1].content, "primera\nsegunda");
}

#[tokio::test]
async fn test_blank_lines_do_nothing() {
    let (session, _) = run("\n   \n").await;
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn test_selection_commands() {
    let (session, output) = run("/assistants\n/assistant asst_9\n/store vs_2\n/store\n").await;

    // The simulated backend has an empty catalog.
    assert!(output.contains("No assistant found."));
    assert!(output.contains("[asst_9] [Select vectorStore...]"));
    assert_eq!(
        session
            .selection()
            .selected(assistant_chat::session::SelectionKind::Assistant),
        "asst_9"
    );
    assert_eq!(
        session
            .selection()
            .selected(assistant_chat::session::SelectionKind::VectorStore),
        ""
    );
}

#[tokio::test]
async fn test_attach_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notas.txt");
    std::fs::write(&path, "hola").unwrap();

    let input = format!("/attach {}\n\n/back\n", path.display());
    let (session, output) = run(&input).await;

    assert!(output.contains("attached notas.txt (text/plain, 4 bytes)"));
    assert!(output.contains("[archivo: notas.txt]"));
    assert_eq!(session.messages().len(), 3);
    assert_eq!(
        session.messages()[1]
            .attachment
            .as_ref()
            .map(|a| a.file_name.as_str()),
        Some("notas.txt")
    );
    assert!(session.thread_id().unwrap().starts_with("local-"));
}

#[tokio::test]
async fn test_unknown_command() {
    let (_, output) = run("/bogus\n").await;
    assert!(output.contains("unknown command: /bogus"));
}

#[tokio::test]
async fn test_double_slash_sends_literal_text() {
    let (session, output) = run("//etc/hosts no existe\n").await;

    assert!(!output.contains("unknown command"));
    assert_eq!(session.messages()[1].content, "/etc/hosts no existe");
    assert_eq!(session.messages().len(), 3);
}

#[derive(Debug)]
struct SlowThreads;

#[async_trait]
impl AssistantBackend for SlowThreads {
    async fn list_assistants(&self) -> ApiResult<Vec<AssistantSummary>> {
        Ok(vec![AssistantSummary {
            id: "asst_1".into(),
            name: Some("Soporte".into()),
        }])
    }

    async fn list_vector_stores(&self) -> ApiResult<Vec<VectorStoreSummary>> {
        Ok(Vec::new())
    }

    async fn create_thread(&self) -> ApiResult<String> {
        std::future::pending().await
    }

    async fn ask(&self, _request: &AskRequest) -> ApiResult<String> {
        Ok(String::new())
    }

    fn backend_name(&self) -> &'static str {
        "slow-threads"
    }
}

#[tokio::test]
async fn test_prompt_is_usable_while_thread_is_created() {
    let (session, output) =
        run_with(ChatSession::new(Arc::new(SlowThreads)), "/assistants\n/quit\n").await;

    assert!(output.contains("asst_1  Soporte"));
    assert!(!session.is_data_loading());
    assert_eq!(session.thread(), &ThreadState::Creating);
}
