//! Data Models
//!
//! Contains the data structures shared by services and command handlers.

pub mod attachment;
pub mod chat;
pub mod response;
pub mod settings;

pub use attachment::*;
pub use chat::*;
pub use response::*;
pub use settings::*;
