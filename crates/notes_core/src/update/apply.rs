//! Directive application for document-shaped stores.

use crate::model::item::{Item, ID_ATTRIBUTE};
use crate::update::builder::{UpdateBindings, UpdateDirective};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error raised when a directive cannot be applied to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The directive has no clauses.
    EmptyDirective,
    /// A `#name` placeholder has no entry in the name table.
    UnboundName(String),
    /// A `:value` placeholder has no entry in the value table.
    UnboundValue(String),
    /// The directive targets the identifier attribute.
    ProtectedAttribute(String),
}

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDirective => write!(f, "update directive has no assignments"),
            Self::UnboundName(placeholder) => {
                write!(f, "unbound attribute name placeholder `{placeholder}`")
            }
            Self::UnboundValue(placeholder) => {
                write!(f, "unbound attribute value placeholder `{placeholder}`")
            }
            Self::ProtectedAttribute(name) => write!(f, "attribute `{name}` cannot be updated"),
        }
    }
}

impl Error for ApplyError {}

/// Applies `directive` to `item`, touching only the assigned attributes.
///
/// Every clause is resolved before anything is written, so a failing
/// directive leaves `item` unchanged.
pub fn apply_update(
    item: &mut Item,
    directive: &UpdateDirective,
    bindings: &UpdateBindings,
) -> Result<(), ApplyError> {
    if directive.is_empty() {
        return Err(ApplyError::EmptyDirective);
    }

    let mut resolved: Vec<(&str, &Value)> = Vec::with_capacity(directive.len());
    for clause in directive.assignments() {
        let name = bindings
            .name(&clause.name_placeholder)
            .ok_or_else(|| ApplyError::UnboundName(clause.name_placeholder.clone()))?;
        if name == ID_ATTRIBUTE {
            return Err(ApplyError::ProtectedAttribute(name.to_string()));
        }
        let value = bindings
            .value(&clause.value_placeholder)
            .ok_or_else(|| ApplyError::UnboundValue(clause.value_placeholder.clone()))?;
        resolved.push((name, value));
    }

    for (name, value) in resolved {
        item.insert(name.to_string(), value.clone());
    }
    Ok(())
}
