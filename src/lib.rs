//! Scratchpad Chat - Backend Library
//!
//! Chat back-end that proxies conversations to the Anthropic Messages API and
//! mines every reply for code blocks, markdown tables and notes, filing them
//! into a per-session scratchpad.
//! It includes:
//! - Command handlers a UI calls
//! - Chat orchestration, file attachments and chart data services
//! - Session state and the session registry
//! - Data models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used items from commands
pub use commands::{
    // Session commands
    close_session, create_session,
    // Settings commands
    get_settings, list_models, set_api_key, update_settings,
    // Chat commands
    check_connection, clear_all, get_history, reset_chat, send_message,
    // File commands
    list_files, remove_file, upload_file, upload_file_from_path,
    // Scratchpad commands
    add_scratchpad_item, delete_scratchpad_item, edit_scratchpad_item, get_scratchpad_item,
    list_scratchpad, list_scratchpad_by_kind,
    // Chart commands
    create_chart, load_chart_csv, load_sample_chart_data, preview_chart,
};
pub use models::response::*;
pub use models::settings::{ChatSettings, SettingsUpdate};
pub use services::{ChatOrchestrator, ChatPhase};
pub use state::{SessionRegistry, SessionState};
pub use utils::error::{AppError, AppResult};
