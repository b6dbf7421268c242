//! Form field and picker declarations
//!
//! A descriptor lists the inputs of its create/edit form in order. Plain
//! inputs are [`FormField`]s; relationship pickers are [`PickerSpec`]s backed
//! by another entity type's collection.

use serde::{Deserialize, Serialize};

// ============================================================================
// FieldInput
// ============================================================================

/// Kind of input a form field is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldInput {
    /// Single-line text input
    Text { trim: bool },
    /// Multi-line text area
    TextArea { trim: bool },
    /// Numeric input; empty input is omitted from the payload
    Number,
    /// Masked input; only sent when non-empty
    Password,
    /// Checkbox with its reset state
    Checkbox { default: bool },
    /// Fixed choice list with its reset value
    Select { options: Vec<String>, default: String },
}

impl FieldInput {
    /// Trimmed single-line text
    pub fn text() -> Self {
        FieldInput::Text { trim: true }
    }

    /// Trimmed text area
    pub fn text_area() -> Self {
        FieldInput::TextArea { trim: true }
    }

    /// Text area kept verbatim
    pub fn raw_text_area() -> Self {
        FieldInput::TextArea { trim: false }
    }

    /// Unchecked checkbox
    pub fn checkbox() -> Self {
        FieldInput::Checkbox { default: false }
    }

    /// Select over the given options, resetting to `default`
    pub fn select(options: &[&str], default: &str) -> Self {
        FieldInput::Select {
            options: options.iter().map(|o| o.to_string()).collect(),
            default: default.to_string(),
        }
    }
}

// ============================================================================
// Requirement
// ============================================================================

/// When a field must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Requirement {
    /// Never required
    #[default]
    Optional,
    /// Required on create and on edit
    Always,
    /// Required on create only (e.g. a password)
    OnCreate,
}

impl Requirement {
    /// Whether the field is required for this kind of save
    pub fn applies(&self, is_edit: bool) -> bool {
        match self {
            Requirement::Optional => false,
            Requirement::Always => true,
            Requirement::OnCreate => !is_edit,
        }
    }
}

// ============================================================================
// FormField
// ============================================================================

/// A plain input of the entity form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Payload key and record field name
    pub name: String,

    /// Human-readable label used in validation messages
    pub label: String,

    /// Input kind
    pub input: FieldInput,

    /// Requirement rule
    pub requirement: Requirement,

    /// Element id of the input inside the form
    pub element_id: String,
}

impl FormField {
    /// Create an optional field; the element id is filled in by the descriptor
    pub fn new(name: impl Into<String>, label: impl Into<String>, input: FieldInput) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input,
            requirement: Requirement::Optional,
            element_id: String::new(),
        }
    }

    /// Mark as always required
    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    /// Mark as required when creating only
    pub fn required_on_create(mut self) -> Self {
        self.requirement = Requirement::OnCreate;
        self
    }

    /// Set an explicit element id
    pub fn with_element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = id.into();
        self
    }

    /// Whether the field value is a secret never read back from a record
    pub fn is_secret(&self) -> bool {
        matches!(self.input, FieldInput::Password)
    }
}

// ============================================================================
// PickerSpec
// ============================================================================

/// How picker values are typed in the request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PayloadKind {
    /// Numeric ids
    #[default]
    Integers,
    /// Natural keys (codes, usernames)
    Strings,
}

/// A searchable multi-select bound to another entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSpec {
    /// Picker name; also the payload key and the relation field on records
    pub name: String,

    /// Catalog key of the entity type the options come from
    pub source: String,

    /// Option field used as the value
    pub value_field: String,

    /// Option field shown to the user
    pub label_field: String,

    /// Option field searched when typing
    pub search_field: String,

    /// Placeholder shown when nothing is selected
    pub placeholder: String,

    /// Payload typing
    pub payload: PayloadKind,

    /// Element id of the select element
    pub element_id: String,
}

impl PickerSpec {
    /// Create a picker whose value, label and search field are all `field`
    pub fn new(name: impl Into<String>, source: impl Into<String>, field: &str) -> Self {
        let name = name.into();
        let placeholder = format!("Select {}...", name);
        Self {
            name,
            source: source.into(),
            value_field: field.to_string(),
            label_field: field.to_string(),
            search_field: field.to_string(),
            placeholder,
            payload: PayloadKind::Strings,
            element_id: String::new(),
        }
    }

    /// Picker keyed by numeric `id`, labelled and searched by `label_field`
    pub fn by_id(name: impl Into<String>, source: impl Into<String>, label_field: &str) -> Self {
        let mut picker = Self::new(name, source, label_field);
        picker.value_field = "id".to_string();
        picker.payload = PayloadKind::Integers;
        picker
    }

    /// Use a different label/search field
    pub fn labelled_by(mut self, field: &str) -> Self {
        self.label_field = field.to_string();
        self.search_field = field.to_string();
        self
    }

    /// Set an explicit element id
    pub fn with_element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = id.into();
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_requirement_applies() {
        assert!(Requirement::Always.applies(true));
        assert!(Requirement::OnCreate.applies(false));
        assert!(!Requirement::OnCreate.applies(true));
        assert!(!Requirement::Optional.applies(false));
    }

    #[test]
    fn test_form_field_builder() {
        let field = FormField::new("pw", "Password", FieldInput::Password).required_on_create();
        assert_eq!(field.requirement, Requirement::OnCreate);
        assert!(field.is_secret());
    }

    #[test]
    fn test_picker_by_id() {
        let picker = PickerSpec::by_id("roles", "roles", "rolename");
        assert_eq!(picker.value_field, "id");
        assert_eq!(picker.label_field, "rolename");
        assert_eq!(picker.payload, PayloadKind::Integers);
        assert_eq!(picker.placeholder, "Select roles...");
    }

    #[test]
    fn test_picker_by_natural_key() {
        let picker = PickerSpec::new("warehouses", "warehouses", "code").labelled_by("name");
        assert_eq!(picker.value_field, "code");
        assert_eq!(picker.search_field, "name");
        assert_eq!(picker.payload, PayloadKind::Strings);
    }
}
