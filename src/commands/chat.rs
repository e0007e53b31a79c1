//! Chat Commands
//!
//! Sending messages, reading the transcript, and the reset controls.

use serde::{Deserialize, Serialize};

use crate::models::chat::{ChatMessage, ChatTurn};
use crate::models::response::CommandResponse;
use crate::services::chat::ChatOrchestrator;
use crate::state::SessionState;

/// Message send request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    /// Ids of uploaded files to attach, in order
    #[serde(default)]
    pub attachment_ids: Vec<String>,
}

/// Send a message and harvest the reply into the scratchpad
pub async fn send_message(
    orchestrator: &ChatOrchestrator,
    session: &mut SessionState,
    request: SendMessageRequest,
) -> CommandResponse<ChatTurn> {
    orchestrator
        .send(session, &request.text, &request.attachment_ids)
        .await
        .into()
}

/// Transcript, oldest first
pub fn get_history(session: &SessionState) -> CommandResponse<Vec<ChatMessage>> {
    CommandResponse::ok(session.history.clone())
}

/// Clear the transcript, keeping the scratchpad
pub fn reset_chat(session: &mut SessionState) -> CommandResponse<()> {
    session.reset_chat();
    CommandResponse::ok(())
}

/// Clear the transcript and the scratchpad
pub fn clear_all(session: &mut SessionState) -> CommandResponse<()> {
    session.clear_all();
    CommandResponse::ok(())
}

/// Verify the session's API key against the hosted model
pub async fn check_connection(
    orchestrator: &ChatOrchestrator,
    session: &SessionState,
) -> CommandResponse<bool> {
    orchestrator.health_check(session).await.map(|_| true).into()
}
