//! Session Commands
//!
//! Opening and closing chat sessions in the registry.

use uuid::Uuid;

use crate::models::response::CommandResponse;
use crate::state::SessionRegistry;

/// Open a new session with default settings and an empty scratchpad
pub async fn create_session(registry: &SessionRegistry) -> CommandResponse<Uuid> {
    CommandResponse::ok(registry.create().await)
}

/// Close a session, discarding its scratchpad and uploads
pub async fn close_session(registry: &SessionRegistry, id: Uuid) -> CommandResponse<()> {
    registry.remove(&id).await.into()
}
