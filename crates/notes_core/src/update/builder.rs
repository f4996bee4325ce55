//! Update expression builder.
//!
//! # Responsibility
//! - Strip protected attributes from a partial-update payload.
//! - Emit one `#name = :value` assignment per remaining field.
//!
//! # Invariants
//! - Placeholder stems derive only from the field name, so the same field
//!   always maps to the same placeholders and two fields never share one.
//! - An empty directive is never produced; callers get `NoMutableFields`.

use crate::model::item::{Item, PROTECTED_ATTRIBUTES};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SET_KEYWORD: &str = "SET";
const NAME_PREFIX: char = '#';
const VALUE_PREFIX: char = ':';

/// Error raised when a payload cannot produce a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateBuildError {
    /// Nothing is left to set after protected attributes were removed.
    NoMutableFields,
}

impl Display for UpdateBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMutableFields => write!(f, "No update data provided."),
        }
    }
}

impl Error for UpdateBuildError {}

/// One `SET` clause: `<name placeholder> = <value placeholder>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name_placeholder: String,
    pub value_placeholder: String,
}

/// Placeholder tables referenced by an [`UpdateDirective`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateBindings {
    /// `#placeholder` -> attribute name.
    pub names: BTreeMap<String, String>,
    /// `:placeholder` -> literal value.
    pub values: BTreeMap<String, Value>,
}

impl UpdateBindings {
    /// Resolves a name placeholder.
    pub fn name(&self, placeholder: &str) -> Option<&str> {
        self.names.get(placeholder).map(String::as_str)
    }

    /// Resolves a value placeholder.
    pub fn value(&self, placeholder: &str) -> Option<&Value> {
        self.values.get(placeholder)
    }
}

/// Generic "set these fields" instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateDirective {
    assignments: Vec<Assignment>,
}

impl UpdateDirective {
    /// Builds a directive from explicit clauses.
    ///
    /// Used by adapters and tests that assemble directives by hand; the
    /// builder is the normal entry point.
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Clauses in the order the payload listed its fields.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders the directive, e.g. `SET #f_text = :f_text, #f_done = :f_done`.
    pub fn expression(&self) -> String {
        let clauses = self
            .assignments
            .iter()
            .map(|clause| format!("{} = {}", clause.name_placeholder, clause.value_placeholder))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{SET_KEYWORD} {clauses}")
    }
}

impl Display for UpdateDirective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Builder output: the directive and the bindings it references.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
    pub directive: UpdateDirective,
    pub bindings: UpdateBindings,
}

/// Converts partial-update payloads into [`UpdatePlan`]s.
#[derive(Debug, Clone, Copy)]
pub struct UpdateExpressionBuilder<'a> {
    protected: &'a [&'a str],
}

impl Default for UpdateExpressionBuilder<'static> {
    fn default() -> Self {
        Self::new(PROTECTED_ATTRIBUTES)
    }
}

impl<'a> UpdateExpressionBuilder<'a> {
    /// Creates a builder that drops every attribute listed in `protected`.
    pub fn new(protected: &'a [&'a str]) -> Self {
        Self { protected }
    }

    /// Builds a plan for `patch`.
    ///
    /// # Errors
    /// - `NoMutableFields` when `patch` is empty or only names protected
    ///   attributes.
    pub fn build(&self, patch: &Item) -> Result<UpdatePlan, UpdateBuildError> {
        let mut assignments = Vec::with_capacity(patch.len());
        let mut bindings = UpdateBindings::default();

        for (field, value) in patch {
            if self.protected.contains(&field.as_str()) {
                continue;
            }

            let stem = placeholder_stem(field);
            let name_placeholder = format!("{NAME_PREFIX}{stem}");
            let value_placeholder = format!("{VALUE_PREFIX}{stem}");

            bindings
                .names
                .insert(name_placeholder.clone(), field.clone());
            bindings
                .values
                .insert(value_placeholder.clone(), value.clone());
            assignments.push(Assignment {
                name_placeholder,
                value_placeholder,
            });
        }

        if assignments.is_empty() {
            return Err(UpdateBuildError::NoMutableFields);
        }

        Ok(UpdatePlan {
            directive: UpdateDirective { assignments },
            bindings,
        })
    }
}

/// Derives the placeholder stem for a field name.
///
/// Plain identifiers keep their spelling (`f_<field>`); anything else is
/// hex-encoded (`h_<hex>`), which keeps the stem free of characters that
/// would break a directive.
fn placeholder_stem(field: &str) -> String {
    let is_plain =
        !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_plain {
        return format!("f_{field}");
    }

    let hex = field
        .bytes()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("h_{hex}")
}

#[cfg(test)]
mod tests {
    use super::placeholder_stem;

    #[test]
    fn plain_field_names_keep_their_spelling() {
        assert_eq!(placeholder_stem("text"), "f_text");
        assert_eq!(placeholder_stem("due_at2"), "f_due_at2");
    }

    #[test]
    fn unusual_field_names_are_hex_encoded() {
        assert_eq!(placeholder_stem("a b"), "h_612062");
        assert_eq!(placeholder_stem(""), "h_");
        assert_eq!(placeholder_stem("x = :y"), "h_78203d203a79");
    }

    #[test]
    fn stems_do_not_collide_between_plain_and_encoded_names() {
        assert_ne!(placeholder_stem("a_b"), placeholder_stem("a b"));
        assert_ne!(placeholder_stem("h_61"), placeholder_stem("a-"));
    }
}
