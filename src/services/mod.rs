//! Services
//!
//! Business logic for the application.
//! Services handle the core functionality and are called by commands.

pub mod attachments;
pub mod chart;
pub mod chat;

pub use attachments::FileBuffer;
pub use chart::{ChartKind, ChartRenderer, ChartSpec, DataTable};
pub use chat::{ChatOrchestrator, ChatPhase, ProviderFactory};
