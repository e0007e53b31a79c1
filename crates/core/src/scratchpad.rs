//! Scratchpad Store
//!
//! Session-scoped collection of saved content items (text notes, code
//! snippets, markdown tables, charts) keyed by a unique, sanitized name.
//!
//! ## Naming rules
//!
//! - Names are stripped to `[A-Za-z0-9_ -]` and trimmed.
//! - An empty sanitized name becomes `{kind}_{YYYYmmddHHMMSS}`.
//! - A name already in use gets the first free `_1`, `_2`, ... suffix.
//!
//! Items keep insertion order. The store has no internal locking; callers
//! serialize access per session.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::extract::normalize_language;

/// `strftime` format used in generated names (`20240301142500`).
pub const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `strftime` format used for human-readable timestamps.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// ItemKind
// ============================================================================

/// The kind of a scratchpad item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    Code,
    Table,
    Chart,
}

impl ItemKind {
    /// All kinds, in display order of the grouped view.
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Chart,
        ItemKind::Code,
        ItemKind::Table,
        ItemKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Code => "code",
            ItemKind::Table => "table",
            ItemKind::Chart => "chart",
        }
    }

    /// Whether items of this kind land in the notes bucket of the grouped view.
    pub fn is_note(&self) -> bool {
        !matches!(self, ItemKind::Code | ItemKind::Table | ItemKind::Chart)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ItemKind::Text),
            "code" => Ok(ItemKind::Code),
            "table" => Ok(ItemKind::Table),
            "chart" => Ok(ItemKind::Chart),
            other => Err(CoreError::parse(format!("unknown item kind: {}", other))),
        }
    }
}

// ============================================================================
// ItemContent
// ============================================================================

/// Content of a scratchpad item. The variant determines the item's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemContent {
    Text {
        text: String,
    },
    Code {
        language: String,
        code: String,
    },
    /// Markdown table source
    Table {
        markdown: String,
    },
    Chart {
        /// Chart kind label, e.g. "Bar Chart"
        chart_type: String,
        /// Base64-encoded PNG bytes
        image_data: String,
        description: String,
    },
}

impl ItemContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn code(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Code {
            language: language.into(),
            code: code.into(),
        }
    }

    pub fn table(markdown: impl Into<String>) -> Self {
        Self::Table {
            markdown: markdown.into(),
        }
    }

    pub fn chart(
        chart_type: impl Into<String>,
        image_data: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::Chart {
            chart_type: chart_type.into(),
            image_data: image_data.into(),
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemContent::Text { .. } => ItemKind::Text,
            ItemContent::Code { .. } => ItemKind::Code,
            ItemContent::Table { .. } => ItemKind::Table,
            ItemContent::Chart { .. } => ItemKind::Chart,
        }
    }

    /// Empty content is never stored: a code item without code, a chart
    /// without image data, or an empty text/table string.
    pub fn is_empty(&self) -> bool {
        match self {
            ItemContent::Text { text } => text.is_empty(),
            ItemContent::Code { code, .. } => code.is_empty(),
            ItemContent::Table { markdown } => markdown.is_empty(),
            ItemContent::Chart { image_data, .. } => image_data.is_empty(),
        }
    }
}

// ============================================================================
// ScratchpadItem
// ============================================================================

/// A named record in the scratchpad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchpadItem {
    pub name: String,
    pub content: ItemContent,
    /// Captured at insertion; never changed by edits.
    pub created_at: DateTime<Local>,
}

impl ScratchpadItem {
    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }

    /// Creation time as `YYYY-mm-dd HH:MM:SS`.
    pub fn created_label(&self) -> String {
        self.created_at.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
    }
}

/// Scratchpad items grouped the way they are displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScratchpadSections {
    pub charts: Vec<ScratchpadItem>,
    pub code: Vec<ScratchpadItem>,
    pub tables: Vec<ScratchpadItem>,
    pub notes: Vec<ScratchpadItem>,
}

impl ScratchpadSections {
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty() && self.code.is_empty() && self.tables.is_empty() && self.notes.is_empty()
    }
}

// ============================================================================
// ScratchpadStore
// ============================================================================

/// Insertion-ordered map from item name to scratchpad item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScratchpadStore {
    items: Vec<ScratchpadItem>,
}

impl ScratchpadStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert content under `name`, stamped with the current local time.
    ///
    /// Returns the accepted (sanitized, de-duplicated) name, or `None` when
    /// the content is absent or empty, in which case nothing changes.
    pub fn insert(&mut self, name: &str, content: impl Into<Option<ItemContent>>) -> Option<String> {
        self.insert_at(name, content, Local::now())
    }

    /// Same as [`insert`](Self::insert) with an explicit timestamp.
    pub fn insert_at(
        &mut self,
        name: &str,
        content: impl Into<Option<ItemContent>>,
        now: DateTime<Local>,
    ) -> Option<String> {
        let content = content.into()?;
        if content.is_empty() {
            debug!(name, kind = %content.kind(), "Skipping empty scratchpad content");
            return None;
        }

        let mut base = sanitize_name(name);
        if base.is_empty() {
            base = format!("{}_{}", content.kind(), compact_timestamp(&now));
        }
        let accepted = self.unique_name(&base);

        info!(name = %accepted, kind = %content.kind(), "Added to scratchpad");
        self.items.push(ScratchpadItem {
            name: accepted.clone(),
            content,
            created_at: now,
        });
        Some(accepted)
    }

    /// Replace the content of an existing item in place.
    ///
    /// Text and table items take `new_content` as their new string. Code items
    /// take it as the new code and switch language when `new_language` is
    /// given. Charts cannot be edited.
    pub fn update(
        &mut self,
        name: &str,
        new_content: impl Into<String>,
        new_language: Option<&str>,
    ) -> CoreResult<&ScratchpadItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| CoreError::not_found(format!("Scratchpad item '{}'", name)))?;

        let new_content = new_content.into();
        match &mut item.content {
            ItemContent::Text { text } => *text = new_content,
            ItemContent::Table { markdown } => *markdown = new_content,
            ItemContent::Code { language, code } => {
                *code = new_content;
                if let Some(lang) = new_language {
                    *language = normalize_language(lang);
                }
            }
            ItemContent::Chart { .. } => {
                return Err(CoreError::validation(format!(
                    "Chart '{}' cannot be edited",
                    name
                )));
            }
        }

        debug!(name, "Updated scratchpad item");
        Ok(item)
    }

    /// Remove an item entirely, returning it.
    pub fn delete(&mut self, name: &str) -> CoreResult<ScratchpadItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.name == name)
            .ok_or_else(|| CoreError::not_found(format!("Scratchpad item '{}'", name)))?;
        let removed = self.items.remove(index);
        info!(name, kind = %removed.kind(), "Deleted from scratchpad");
        Ok(removed)
    }

    /// Items of one kind, in insertion order.
    pub fn list_by_kind(&self, kind: ItemKind) -> Vec<&ScratchpadItem> {
        self.items.iter().filter(|item| item.kind() == kind).collect()
    }

    /// The notes bucket: every item that is not code, a table or a chart.
    pub fn notes(&self) -> Vec<&ScratchpadItem> {
        self.items.iter().filter(|item| item.kind().is_note()).collect()
    }

    /// Snapshot of all items grouped for display.
    pub fn sections(&self) -> ScratchpadSections {
        let mut sections = ScratchpadSections::default();
        for item in &self.items {
            let bucket = match item.kind() {
                ItemKind::Chart => &mut sections.charts,
                ItemKind::Code => &mut sections.code,
                ItemKind::Table => &mut sections.tables,
                ItemKind::Text => &mut sections.notes,
            };
            bucket.push(item.clone());
        }
        sections
    }

    pub fn get(&self, name: &str) -> Option<&ScratchpadItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScratchpadItem> {
        self.items.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            info!(count = self.items.len(), "Cleared scratchpad");
        }
        self.items.clear();
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{}_{}", base, suffix);
            if !self.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Strip a requested name down to ASCII letters, digits, `_`, space and `-`,
/// then trim surrounding whitespace.
pub fn sanitize_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '-'))
        .collect();
    kept.trim().to_string()
}

/// Format a timestamp as `YYYYmmddHHMMSS` for generated names.
pub fn compact_timestamp(now: &DateTime<Local>) -> String {
    now.format(COMPACT_TIMESTAMP_FORMAT).to_string()
}
