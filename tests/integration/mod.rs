//! Integration Tests Module
//!
//! End-to-end tests for the scratchpad chat back-end.
//! Tests cover chat orchestration with reply harvesting, manual scratchpad
//! editing, and chart data loading and creation.

// Chat exchanges through sessions, commands and a scripted provider
mod chat_flow_test;

// Manual scratchpad commands and content extraction
mod scratchpad_test;

// Chart data, previews and stored charts
mod charts_test;
