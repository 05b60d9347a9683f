//! Rendered cell content.

use serde_json::Value;

use super::column::Variant;

/// A clickable control inside an action cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    /// Identifier the UI dispatches on (e.g. `edit`, `delete`).
    pub action: String,
    pub label: String,
    pub variant: Variant,
}

impl ActionButton {
    pub fn new(action: impl Into<String>, label: impl Into<String>, variant: Variant) -> Self {
        Self {
            action: action.into(),
            label: label.into(),
            variant,
        }
    }
}

/// Content of one rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// Heading plus detail line.
    Lines { top: String, bottom: String },
    Badge { text: String, variant: Variant },
    Actions(Vec<ActionButton>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Flatten to terminal text.
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines { top, bottom } if bottom.is_empty() => top.clone(),
            Self::Lines { top, bottom } => format!("{top}\n{bottom}"),
            Self::Badge { text, .. } => format!("[{text}]"),
            Self::Actions(buttons) => buttons
                .iter()
                .map(|button| format!("[{}]", button.label))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// String form of a JSON value; `null` becomes the empty string.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
