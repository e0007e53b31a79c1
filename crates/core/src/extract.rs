//! Reply Content Extraction
//!
//! Pure functions that pull fenced code blocks and markdown tables out of an
//! assistant reply so they can be filed into the scratchpad.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Language used when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Opening fence, optional tag, optional whitespace, newline, then the body up
/// to the next triple backtick.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([\w+#.\-]*)\s*\n(.*?)```").expect("code fence pattern is valid")
});

/// Header row, separator row, then one or more body rows. Each row starts and
/// ends with `|` on a single line; the last body row may end the text.
static MARKDOWN_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\|[^\n]*\|[ \t]*\n\|[-:| ]+\|[ \t]*\n(?:\|[^\n]*\|[ \t]*(?:\n|\z))+",
    )
    .expect("markdown table pattern is valid")
});

/// A fenced code block found in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Normalized language tag
    pub language: String,
    /// Body with surrounding whitespace trimmed
    pub code: String,
}

/// Normalize a fence tag: trim, lower-case, map common aliases, default to
/// `text` when empty.
pub fn normalize_language(tag: &str) -> String {
    let lowered = tag.trim().to_lowercase();
    match lowered.as_str() {
        "" => DEFAULT_LANGUAGE.to_string(),
        "py" | "python3" => "python".to_string(),
        "js" | "jsx" => "javascript".to_string(),
        "ts" | "typescript" => "typescript".to_string(),
        _ => lowered,
    }
}

/// Every terminated fenced code block in `text`, in order of appearance.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    CODE_FENCE
        .captures_iter(text)
        .map(|caps| CodeBlock {
            language: normalize_language(caps.get(1).map_or("", |m| m.as_str())),
            code: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        })
        .collect()
}

/// Every markdown table in `text`, trimmed, in order of appearance.
pub fn extract_tables(text: &str) -> Vec<String> {
    MARKDOWN_TABLE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
