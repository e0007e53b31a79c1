//! Scratchpad Chat Core
//!
//! Scratchpad store, naming rules, and reply content extraction for the
//! Scratchpad Chat workspace. This crate has zero dependencies on
//! application-level code (HTTP, LLM providers, session state, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `scratchpad` - Named item store (`ScratchpadStore`, `ScratchpadItem`, `ItemContent`)
//! - `extract` - Code block and markdown table extraction
//!
//! ## Design Principles
//!
//! 1. **Synchronous and pure** - no I/O, no locking; callers own the store
//! 2. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod extract;
pub mod scratchpad;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Scratchpad ─────────────────────────────────────────────────────────
pub use scratchpad::{
    compact_timestamp, sanitize_name, ItemContent, ItemKind, ScratchpadItem, ScratchpadSections,
    ScratchpadStore, COMPACT_TIMESTAMP_FORMAT, DISPLAY_TIMESTAMP_FORMAT,
};

// ── Extraction ─────────────────────────────────────────────────────────
pub use extract::{extract_code_blocks, extract_tables, normalize_language, CodeBlock};
