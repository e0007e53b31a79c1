//! Scratchpad Commands
//!
//! Manual add, edit, delete and listing of scratchpad items.

use serde::{Deserialize, Serialize};

use scratchpad_chat_core::{
    normalize_language, ItemContent, ItemKind, ScratchpadItem, ScratchpadSections,
};

use crate::models::response::CommandResponse;
use crate::state::SessionState;
use crate::utils::error::{AppError, AppResult};

/// Manual add request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub kind: ItemKind,
    pub content: String,
    /// Language for code items; normalized like fence tags
    #[serde(default)]
    pub language: Option<String>,
}

/// Edit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditItemRequest {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
}

fn add_item(session: &mut SessionState, request: AddItemRequest) -> AppResult<String> {
    if request.name.trim().is_empty() {
        return Err(AppError::validation("Item name is required"));
    }

    let content = match request.kind {
        ItemKind::Text => ItemContent::text(request.content),
        ItemKind::Table => ItemContent::table(request.content),
        ItemKind::Code => ItemContent::code(
            normalize_language(request.language.as_deref().unwrap_or_default()),
            request.content,
        ),
        ItemKind::Chart => {
            return Err(AppError::validation(
                "Charts are created from chart data, not added manually",
            ))
        }
    };

    session
        .scratchpad
        .insert(&request.name, content)
        .ok_or_else(|| AppError::validation("Item content is empty"))
}

/// Add an item by hand; returns the accepted name
pub fn add_scratchpad_item(
    session: &mut SessionState,
    request: AddItemRequest,
) -> CommandResponse<String> {
    add_item(session, request).into()
}

/// Replace an item's content (and a code item's language)
pub fn edit_scratchpad_item(
    session: &mut SessionState,
    request: EditItemRequest,
) -> CommandResponse<ScratchpadItem> {
    let language = request.language.as_deref().map(normalize_language);
    session
        .scratchpad
        .update(&request.name, request.content, language.as_deref())
        .map(ScratchpadItem::clone)
        .map_err(AppError::from)
        .into()
}

/// Delete an item; returns the removed item
pub fn delete_scratchpad_item(
    session: &mut SessionState,
    name: &str,
) -> CommandResponse<ScratchpadItem> {
    session
        .scratchpad
        .delete(name)
        .map_err(AppError::from)
        .into()
}

/// Fetch one item
pub fn get_scratchpad_item(session: &SessionState, name: &str) -> CommandResponse<ScratchpadItem> {
    match session.scratchpad.get(name) {
        Some(item) => CommandResponse::ok(item.clone()),
        None => CommandResponse::err(AppError::not_found(format!("Scratchpad item '{}'", name))),
    }
}

/// All items grouped for display
pub fn list_scratchpad(session: &SessionState) -> CommandResponse<ScratchpadSections> {
    CommandResponse::ok(session.scratchpad.sections())
}

/// Items of one kind, in insertion order
pub fn list_scratchpad_by_kind(
    session: &SessionState,
    kind: ItemKind,
) -> CommandResponse<Vec<ScratchpadItem>> {
    CommandResponse::ok(
        session
            .scratchpad
            .list_by_kind(kind)
            .into_iter()
            .cloned()
            .collect(),
    )
}
