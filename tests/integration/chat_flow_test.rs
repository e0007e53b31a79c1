//! Chat Flow Integration Tests
//!
//! Drives complete exchanges through the session registry and command
//! handlers with a scripted provider standing in for the hosted model.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scratchpad_chat::commands::{
    add_scratchpad_item, clear_all, get_history, list_scratchpad, reset_chat, send_message,
    set_api_key, upload_file, AddItemRequest, SendMessageRequest,
};
use scratchpad_chat::services::chat::ProviderFactory;
use scratchpad_chat::{AppError, ChatOrchestrator, ChatPhase, SessionRegistry};
use scratchpad_chat_core::{ItemContent, ItemKind};
use scratchpad_chat_llm::{
    LlmError, LlmProvider, LlmResponse, LlmResult, Message, MessageContent, ProviderConfig,
    StopReason, UsageStats,
};

// ============================================================================
// Scripted provider
// ============================================================================

type Script = Arc<Mutex<VecDeque<LlmResult<String>>>>;
type Requests = Arc<Mutex<Vec<Vec<Message>>>>;

struct ScriptedProvider {
    config: ProviderConfig,
    script: Script,
    requests: Requests,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        self.requests.lock().unwrap().push(messages);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Other {
                message: "script exhausted".to_string(),
            }));
        next.map(|text| LlmResponse {
            content: Some(text),
            stop_reason: StopReason::EndTurn,
            usage: UsageStats::default(),
            model: self.config.model.clone(),
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn scripted(replies: Vec<LlmResult<String>>) -> (ChatOrchestrator, Requests) {
    let script: Script = Arc::new(Mutex::new(replies.into()));
    let requests: Requests = Arc::default();
    let captured = requests.clone();
    let factory: ProviderFactory = Arc::new(move |config: ProviderConfig| {
        Ok::<_, AppError>(Arc::new(ScriptedProvider {
            config,
            script: script.clone(),
            requests: captured.clone(),
        }) as Arc<dyn LlmProvider>)
    });
    (ChatOrchestrator::new(factory), requests)
}

fn say(text: &str) -> SendMessageRequest {
    SendMessageRequest {
        text: text.to_string(),
        attachment_ids: Vec::new(),
    }
}

const MIXED_REPLY: &str = "Here is the code:\n\
```python\n\
print(1)\n\
```\n\
And the numbers:\n\
| A | B |\n\
| - | - |\n\
| 1 | 2 |\n\
Hope that helps.";

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_reply_with_code_table_and_prose_creates_three_records() {
    let registry = SessionRegistry::new();
    let id = registry.create().await;
    let session = registry.get(&id).await.unwrap();
    let mut session = session.lock().await;
    let (orchestrator, _) = scripted(vec![Ok(MIXED_REPLY.to_string())]);

    set_api_key(&mut session, Some("sk-test".to_string()));
    let turn = send_message(&orchestrator, &mut session, say("help"))
        .await
        .data
        .unwrap();

    assert_eq!(turn.saved.len(), 3);
    assert_eq!(session.scratchpad.len(), 3);

    let sections = list_scratchpad(&session).data.unwrap();
    assert_eq!(
        sections.code[0].content,
        ItemContent::code("python", "print(1)")
    );
    assert_eq!(
        sections.tables[0].content,
        ItemContent::table("| A | B |\n| - | - |\n| 1 | 2 |")
    );
    assert_eq!(sections.notes[0].content, ItemContent::text(MIXED_REPLY));

    let mut names = turn.saved.clone();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 3);
    assert!(turn.saved[0].starts_with("code_snippet_"));
    assert!(turn.saved[1].starts_with("table_"));
    assert!(turn.saved[2].starts_with("note_"));
}

#[tokio::test]
async fn test_history_is_resent_each_turn() {
    let mut session = scratchpad_chat::SessionState::new();
    session.set_api_key(Some("sk-test".to_string()));
    let (orchestrator, requests) =
        scripted(vec![Ok("first".to_string()), Ok("second".to_string())]);

    send_message(&orchestrator, &mut session, say("one")).await;
    send_message(&orchestrator, &mut session, say("two")).await;

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].len(), 1);
    assert_eq!(requests[1].len(), 3);
    assert_eq!(requests[1][1].as_plain_text(), Some("first"));
    assert_eq!(get_history(&session).data.unwrap().len(), 4);
}

#[tokio::test]
async fn test_failed_call_keeps_user_turn_and_store() {
    let mut session = scratchpad_chat::SessionState::new();
    session.set_api_key(Some("sk-test".to_string()));
    let (orchestrator, _) = scripted(vec![Err(LlmError::NetworkError {
        message: "connection reset".to_string(),
    })]);

    add_scratchpad_item(
        &mut session,
        AddItemRequest {
            name: "keep".to_string(),
            kind: ItemKind::Text,
            content: "existing".to_string(),
            language: None,
        },
    );

    let response = send_message(&orchestrator, &mut session, say("hello")).await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("Network error"));
    assert_eq!(session.scratchpad.names(), vec!["keep"]);
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.phase(), ChatPhase::Idle);
}

#[tokio::test]
async fn test_missing_key_reports_credential_error() {
    let mut session = scratchpad_chat::SessionState::new();
    let (orchestrator, requests) = scripted(vec![Ok("unused".to_string())]);

    let response = send_message(&orchestrator, &mut session, say("hello")).await;
    assert!(response.error.unwrap().starts_with("Missing credential"));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_attachments_reach_the_model() {
    let mut session = scratchpad_chat::SessionState::new();
    session.set_api_key(Some("sk-test".to_string()));
    let (orchestrator, requests) = scripted(vec![Ok("Looks like a PNG".to_string())]);

    let image = upload_file(&mut session, "shot.png", &[0x89, b'P', b'N', b'G'])
        .data
        .unwrap();
    let notes = upload_file(&mut session, "readme.txt", b"read me").data.unwrap();

    let request = SendMessageRequest {
        text: "what are these?".to_string(),
        attachment_ids: vec![image.id, notes.id],
    };
    assert!(send_message(&orchestrator, &mut session, request).await.success);

    let requests = requests.lock().unwrap();
    let parts = &requests[0][0].content;
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], MessageContent::text("what are these?"));
    assert!(matches!(&parts[1], MessageContent::Image { media_type, .. } if media_type == "image/png"));
    assert_eq!(
        parts[2],
        MessageContent::text("Content of file readme.txt:\n\nread me")
    );
}

#[tokio::test]
async fn test_reset_and_clear_controls() {
    let mut session = scratchpad_chat::SessionState::new();
    session.set_api_key(Some("sk-test".to_string()));
    let (orchestrator, _) = scripted(vec![Ok("just prose".to_string())]);
    send_message(&orchestrator, &mut session, say("hi")).await;

    reset_chat(&mut session);
    assert!(session.history.is_empty());
    assert_eq!(session.scratchpad.list_by_kind(ItemKind::Text).len(), 1);

    clear_all(&mut session);
    assert!(session.scratchpad.is_empty());
}

#[tokio::test]
async fn test_sessions_do_not_share_scratchpads() {
    let registry = SessionRegistry::new();
    let a = registry.create().await;
    let b = registry.create().await;
    let (orchestrator, _) = scripted(vec![Ok("for a only".to_string())]);

    {
        let session = registry.get(&a).await.unwrap();
        let mut session = session.lock().await;
        session.set_api_key(Some("sk-test".to_string()));
        send_message(&orchestrator, &mut session, say("hi")).await;
        assert_eq!(session.scratchpad.len(), 1);
    }

    let other = registry.get(&b).await.unwrap();
    assert!(other.lock().await.scratchpad.is_empty());
}
