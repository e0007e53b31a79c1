//! Settings Commands
//!
//! Commands for reading and updating chat settings and the API key.

use scratchpad_chat_llm::KNOWN_MODELS;

use crate::models::response::CommandResponse;
use crate::models::settings::{ChatSettings, SettingsUpdate};
use crate::state::SessionState;

/// Get current chat settings
pub fn get_settings(session: &SessionState) -> CommandResponse<ChatSettings> {
    CommandResponse::ok(session.settings.clone())
}

/// Update chat settings with a partial update
pub fn update_settings(
    session: &mut SessionState,
    update: SettingsUpdate,
) -> CommandResponse<ChatSettings> {
    match session.update_settings(update) {
        Ok(settings) => CommandResponse::ok(settings.clone()),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Set or clear the session's API key; returns whether a key is now set
pub fn set_api_key(session: &mut SessionState, api_key: Option<String>) -> CommandResponse<bool> {
    session.set_api_key(api_key);
    CommandResponse::ok(session.has_api_key())
}

/// Model identifiers accepted by the settings
pub fn list_models() -> CommandResponse<Vec<String>> {
    CommandResponse::ok(KNOWN_MODELS.iter().map(|m| m.to_string()).collect())
}
