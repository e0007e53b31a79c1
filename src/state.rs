//! Session State
//!
//! Per-session state (settings, credential, transcript, scratchpad, uploads,
//! chart data) and the registry that hands sessions out to command handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use scratchpad_chat_core::ScratchpadStore;

use crate::models::chat::ChatMessage;
use crate::models::settings::{ChatSettings, SettingsUpdate};
use crate::services::attachments::FileBuffer;
use crate::services::chart::DataTable;
use crate::services::chat::ChatPhase;
use crate::utils::error::{AppError, AppResult};

/// State owned by one chat session
#[derive(Debug, Default)]
pub struct SessionState {
    /// Chat settings used for every model call
    pub settings: ChatSettings,
    /// Recorded transcript, oldest first
    pub history: Vec<ChatMessage>,
    /// Saved items
    pub scratchpad: ScratchpadStore,
    /// Uploaded files
    pub files: FileBuffer,
    /// Data used by chart commands
    pub chart_data: Option<DataTable>,
    /// API key, held in memory only
    api_key: Option<String>,
    /// Orchestrator phase
    pub(crate) phase: ChatPhase,
}

impl SessionState {
    /// Create a fresh session with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ChatSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Set or clear the API key; a blank key clears it.
    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Apply a settings update, keeping the old settings if the result is invalid.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> AppResult<&ChatSettings> {
        let mut next = self.settings.clone();
        next.apply_update(update);
        next.validate().map_err(AppError::config)?;
        self.settings = next;
        Ok(&self.settings)
    }

    /// Clear the transcript; the scratchpad is kept.
    pub fn reset_chat(&mut self) {
        self.history.clear();
        self.phase = ChatPhase::Idle;
        info!("Chat history reset");
    }

    /// Clear the transcript and the scratchpad.
    pub fn clear_all(&mut self) {
        self.history.clear();
        self.scratchpad.clear();
        self.phase = ChatPhase::Idle;
        info!("Chat history and scratchpad cleared");
    }
}

/// Shared handle to one session
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Maps session ids to their state. Each session is behind its own mutex so
/// requests within a session are serialized while sessions stay independent.
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    defaults: ChatSettings,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new sessions start from `defaults`.
    pub fn with_defaults(defaults: ChatSettings) -> AppResult<Self> {
        defaults.validate().map_err(AppError::config)?;
        Ok(Self {
            sessions: Arc::default(),
            defaults,
        })
    }

    /// Open a new session and return its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SessionState::with_settings(self.defaults.clone())));
        self.sessions.write().await.insert(id, session);
        info!(session_id = %id, "Session created");
        id
    }

    pub async fn get(&self, id: &Uuid) -> AppResult<SharedSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Session {}", id)))
    }

    /// End a session, dropping its scratchpad and uploads.
    pub async fn remove(&self, id: &Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| info!(session_id = %id, "Session closed"))
            .ok_or_else(|| AppError::not_found(format!("Session {}", id)))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
