//! Declarative report forms.
//!
//! The reporter never renders UI itself; it emits a [`FormDescriptor`]
//! that any front end (the bundled terminal prompt, or the installer's
//! own dialog layer) can turn into widgets and hand back as
//! [`ReportData`].

use crate::report::ReportResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of input widget a field asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Multiline,
}

/// One input field of a report form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Key under which the submitted value appears in [`ReportData`].
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    /// Widget kind.
    pub kind: FieldKind,
    /// Hint text shown while the input is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Pre-filled value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether the form may be submitted with this field empty.
    pub required: bool,
}

impl FormField {
    /// Creates a required single-line text field.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Text,
            placeholder: None,
            value: None,
            required: true,
        }
    }

    /// Creates a required multi-line text field.
    pub fn multiline(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Multiline,
            ..Self::text(name, label)
        }
    }

    /// Sets the placeholder hint.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Pre-fills the field. `None` leaves it empty.
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Data carried through a form unchanged, from preparation to submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExtra {
    /// Outcome of the installer run being reported.
    pub result: ReportResult,
    /// Error that triggered the report, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A complete form, ready to be shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDescriptor {
    /// Dialog title.
    pub title: String,
    /// Introductory text shown above the fields.
    pub description: String,
    /// Fields in display order.
    pub fields: Vec<FormField>,
    /// Label of the confirm button.
    pub confirm_label: String,
    /// Passed through to the submit handler unchanged.
    pub extra: ReportExtra,
}

/// User-submitted form values, keyed by field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    /// Submitted values; unanswered optional fields are absent.
    pub values: BTreeMap<String, String>,
    /// The `extra` of the descriptor this data answers.
    pub extra: ReportExtra,
}

impl ReportData {
    /// Returns the submitted value of a field, if the user filled it in.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}
