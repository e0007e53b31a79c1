//! Commands
//!
//! Request/response handlers a UI calls. Every handler takes the session it
//! acts on explicitly and reports failures through `CommandResponse`.

pub mod charts;
pub mod chat;
pub mod files;
pub mod scratchpad;
pub mod sessions;
pub mod settings;

pub use charts::*;
pub use chat::*;
pub use files::*;
pub use scratchpad::*;
pub use sessions::*;
pub use settings::*;
