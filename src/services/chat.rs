//! Chat Orchestrator
//!
//! Runs one chat exchange against the hosted model and files what the reply
//! contains into the session scratchpad.
//!
//! ## Phases
//!
//! ```text
//! Idle -> Sending -> Succeeded -> Idle
//!                 -> Failed    -> Idle
//! ```
//!
//! The user turn is recorded when the exchange enters `Sending`. A failed
//! exchange writes nothing else. An exchange whose future is dropped mid-call
//! returns the session to `Idle` like a failure.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use scratchpad_chat_core::{
    compact_timestamp, extract_code_blocks, extract_tables, ItemContent, ScratchpadStore,
};
use scratchpad_chat_llm::{AnthropicProvider, LlmProvider, ProviderConfig};

use crate::models::chat::{ChatMessage, ChatTurn};
use crate::services::attachments::build_user_message;
use crate::state::SessionState;
use crate::utils::error::{AppError, AppResult};

/// Builds the provider used for one model call.
pub type ProviderFactory =
    Arc<dyn Fn(ProviderConfig) -> AppResult<Arc<dyn LlmProvider>> + Send + Sync>;

/// Factory for the Anthropic Messages API provider.
pub fn anthropic_factory() -> ProviderFactory {
    Arc::new(|config: ProviderConfig| -> AppResult<Arc<dyn LlmProvider>> {
        let provider = AnthropicProvider::new(config)?;
        Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
    })
}

/// Orchestrator phase of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl ChatPhase {
    pub fn can_transition_to(self, next: ChatPhase) -> bool {
        matches!(
            (self, next),
            (ChatPhase::Idle, ChatPhase::Sending)
                | (ChatPhase::Sending, ChatPhase::Succeeded)
                | (ChatPhase::Sending, ChatPhase::Failed)
                | (ChatPhase::Succeeded, ChatPhase::Idle)
                | (ChatPhase::Failed, ChatPhase::Idle)
        )
    }
}

fn transition(session: &mut SessionState, next: ChatPhase) -> AppResult<()> {
    let current = session.phase;
    if !current.can_transition_to(next) {
        return Err(AppError::internal(format!(
            "illegal chat transition {:?} -> {:?}",
            current, next
        )));
    }
    debug!(from = ?current, to = ?next, "Chat phase");
    session.phase = next;
    Ok(())
}

/// Holds a session for one exchange and returns it to `Idle` when released,
/// including when the exchange future is dropped before completing.
struct ExchangeGuard<'a> {
    session: &'a mut SessionState,
}

impl Deref for ExchangeGuard<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        self.session
    }
}

impl DerefMut for ExchangeGuard<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        self.session
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if self.session.phase != ChatPhase::Idle {
            warn!(phase = ?self.session.phase, "Chat exchange abandoned");
            self.session.phase = ChatPhase::Idle;
        }
    }
}

/// Write every code block, every table and the whole reply into `store`.
///
/// Names share one timestamp: `code_snippet_{ts}_{i}`, `table_{ts}_{i}` and
/// `note_{ts}`. An empty reply adds nothing. Returns the accepted names.
pub fn harvest_reply(store: &mut ScratchpadStore, reply: &str, now: DateTime<Local>) -> Vec<String> {
    let ts = compact_timestamp(&now);
    let mut saved = Vec::new();

    for (i, block) in extract_code_blocks(reply).into_iter().enumerate() {
        let name = format!("code_snippet_{}_{}", ts, i);
        saved.extend(store.insert_at(&name, ItemContent::code(block.language, block.code), now));
    }

    for (i, table) in extract_tables(reply).into_iter().enumerate() {
        let name = format!("table_{}_{}", ts, i);
        saved.extend(store.insert_at(&name, ItemContent::table(table), now));
    }

    saved.extend(store.insert_at(&format!("note_{}", ts), ItemContent::text(reply), now));
    saved
}

/// Drives chat exchanges for sessions.
#[derive(Clone)]
pub struct ChatOrchestrator {
    factory: ProviderFactory,
}

impl ChatOrchestrator {
    pub fn new(factory: ProviderFactory) -> Self {
        Self { factory }
    }

    /// Orchestrator backed by the Anthropic Messages API.
    pub fn anthropic() -> Self {
        Self::new(anthropic_factory())
    }

    fn provider_for(&self, session: &SessionState) -> AppResult<Arc<dyn LlmProvider>> {
        let api_key = session
            .api_key()
            .ok_or_else(|| AppError::missing_credential("Please enter your Anthropic API key"))?;
        (self.factory)(session.settings.provider_config(Some(api_key.to_string())))
    }

    /// Send `text` with the given uploads attached and harvest the reply.
    pub async fn send(
        &self,
        session: &mut SessionState,
        text: &str,
        attachment_ids: &[String],
    ) -> AppResult<ChatTurn> {
        if text.trim().is_empty() {
            return Err(AppError::validation("Message is empty"));
        }
        let outgoing = {
            let files = session.files.resolve(attachment_ids)?;
            build_user_message(text, &files)
        };

        let mut session = ExchangeGuard { session };
        transition(&mut session, ChatPhase::Sending)?;
        session.history.push(ChatMessage::user(text));

        match self.call_model(&mut session, outgoing).await {
            Ok(turn) => Ok(turn),
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                transition(&mut session, ChatPhase::Failed)?;
                transition(&mut session, ChatPhase::Idle)?;
                Err(e)
            }
        }
    }

    async fn call_model(
        &self,
        session: &mut SessionState,
        outgoing: scratchpad_chat_llm::Message,
    ) -> AppResult<ChatTurn> {
        let provider = self.provider_for(session)?;

        let mut messages: Vec<_> = session.history.iter().map(ChatMessage::to_message).collect();
        if let Some(last) = messages.last_mut() {
            *last = outgoing;
        }
        let system = Some(session.settings.system_prompt.clone()).filter(|s| !s.is_empty());

        info!(model = %provider.model(), turns = messages.len(), "Querying model");
        let response = provider.send_message(messages, system).await?;

        let reply = response.text().to_string();
        // The Messages API rejects blank text turns, so they are not resent.
        if reply.trim().is_empty() {
            warn!("Model returned an empty reply");
        } else {
            session.history.push(ChatMessage::assistant(reply.clone()));
        }
        transition(session, ChatPhase::Succeeded)?;

        let saved = harvest_reply(&mut session.scratchpad, &reply, Local::now());
        info!(saved = saved.len(), "Reply harvested");
        transition(session, ChatPhase::Idle)?;

        Ok(ChatTurn {
            reply,
            saved,
            model: response.model,
            usage: response.usage,
        })
    }

    /// Verify the session's API key with a minimal request.
    pub async fn health_check(&self, session: &SessionState) -> AppResult<()> {
        let provider = self.provider_for(session)?;
        provider.health_check().await?;
        Ok(())
    }
}
