//! Declarative column definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::cell::Cell;

/// Caller-supplied cell logic, given the full row.
pub type CellRenderer<T> = Arc<dyn Fn(&T) -> Cell + Send + Sync>;

/// Visual variant for badges and action buttons.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    Default,
    #[default]
    Secondary,
    Destructive,
    Outline,
}

/// Rendering strategy of a column.
pub enum ColumnKind<T> {
    /// Field value as text.
    Plain,
    /// Small mapping summarized on two lines; `keys` restricts which entries are considered.
    NestedObject { keys: Option<Vec<String>> },
    /// Field value as a tagged label.
    Badge { variant: Option<Variant> },
    /// Cell built entirely by the caller (typically buttons).
    Action(CellRenderer<T>),
}

impl<T> Clone for ColumnKind<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain => Self::Plain,
            Self::NestedObject { keys } => Self::NestedObject { keys: keys.clone() },
            Self::Badge { variant } => Self::Badge { variant: *variant },
            Self::Action(renderer) => Self::Action(renderer.clone()),
        }
    }
}

impl<T> fmt::Debug for ColumnKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::NestedObject { keys } => f.debug_struct("NestedObject").field("keys", keys).finish(),
            Self::Badge { variant } => f.debug_struct("Badge").field("variant", variant).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
        }
    }
}

/// One column of a table: which field to read, how to label it and how to draw it.
///
/// `key` names a field of the serialized row; dotted keys (`endereco.cidade`)
/// reach into nested objects.
///
/// # Example
/// ```
/// use cliente_admin::table::{ColumnSpec, Variant};
///
/// let columns: Vec<ColumnSpec<serde_json::Value>> = vec![
///     ColumnSpec::plain("nome", "Nome").orderable(),
///     ColumnSpec::badge("status", "Status").with_variant(Variant::Outline),
///     ColumnSpec::nested("contato", "Contato").with_keys(["label", "value"]),
/// ];
/// assert!(columns[0].orderable);
/// ```
pub struct ColumnSpec<T> {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind<T>,
    pub orderable: bool,
    /// Overrides kind-based rendering when set.
    pub renderer: Option<CellRenderer<T>>,
}

impl<T> ColumnSpec<T> {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ColumnKind<T>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            orderable: false,
            renderer: None,
        }
    }

    pub fn plain(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::Plain)
    }

    pub fn nested(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::NestedObject { keys: None })
    }

    pub fn badge(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::Badge { variant: None })
    }

    pub fn action<F>(key: impl Into<String>, label: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> Cell + Send + Sync + 'static,
    {
        Self::new(key, label, ColumnKind::Action(Arc::new(render)))
    }

    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    /// Restrict a nested-object column to the given keys. No effect on other kinds.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ColumnKind::NestedObject { keys: slot } = &mut self.kind {
            *slot = Some(keys.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Set the badge variant. No effect on other kinds.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        if let ColumnKind::Badge { variant: slot } = &mut self.kind {
            *slot = Some(variant);
        }
        self
    }

    pub fn with_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> Cell + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(render));
        self
    }
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            kind: self.kind.clone(),
            orderable: self.orderable,
            renderer: self.renderer.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("orderable", &self.orderable)
            .field("renderer", &self.renderer.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn variant_defaults_to_secondary() {
        assert_eq!(Variant::default(), Variant::Secondary);
        assert_eq!(Variant::Destructive.to_string(), "destructive");
        assert_eq!(Variant::from_str("outline").unwrap(), Variant::Outline);
    }

    #[test]
    fn with_keys_only_applies_to_nested_columns() {
        let nested: ColumnSpec<()> = ColumnSpec::nested("c", "C").with_keys(["label"]);
        assert!(matches!(
            nested.kind,
            ColumnKind::NestedObject { keys: Some(ref keys) } if keys == &["label".to_string()]
        ));
        let plain: ColumnSpec<()> = ColumnSpec::plain("c", "C").with_keys(["label"]);
        assert!(matches!(plain.kind, ColumnKind::Plain));
    }

    #[test]
    fn with_variant_only_applies_to_badges() {
        let badge: ColumnSpec<()> = ColumnSpec::badge("s", "S").with_variant(Variant::Outline);
        assert!(matches!(badge.kind, ColumnKind::Badge { variant: Some(Variant::Outline) }));
    }
}
