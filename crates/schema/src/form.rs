//! Form values and request payloads
//!
//! The form widget hands back raw strings and checkbox states; pickers hand
//! back lists of option values. This module turns those into the JSON payload
//! the backend expects, fills a form from a record for editing, and runs the
//! required-field checks derived from the field declarations.

use crate::entity::EntityDescriptor;
use crate::field::{FieldInput, PayloadKind, PickerSpec};
use gridkeeper_core::{ConsoleError, ConsoleResult, EntityRecord, display_scalar};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Raw value of one form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Text(String),
    Checked(bool),
}

impl FormInput {
    /// Text content (checkboxes render as `"true"`/`"false"`)
    pub fn as_text(&self) -> String {
        match self {
            FormInput::Text(text) => text.clone(),
            FormInput::Checked(checked) => checked.to_string(),
        }
    }

    /// Checkbox state; text counts as checked when it reads like a yes
    pub fn is_checked(&self) -> bool {
        match self {
            FormInput::Checked(checked) => *checked,
            FormInput::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "1"
            ),
        }
    }
}

/// Form inputs keyed by field name
pub type FormValues = BTreeMap<String, FormInput>;

/// Picker selections keyed by picker name
pub type PickerValues = BTreeMap<String, Vec<String>>;

/// One selectable option of a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub value: String,
    pub label: String,
    pub search: String,
}

// ============================================================================
// Payload building
// ============================================================================

/// Build the request payload from form and picker values
///
/// Missing text inputs count as empty. Pickers without an entry are left out
/// of the payload entirely, which is what happens when their options could
/// not be loaded.
pub fn build_payload(
    descriptor: &EntityDescriptor,
    form: &FormValues,
    pickers: &PickerValues,
) -> ConsoleResult<EntityRecord> {
    let mut payload = EntityRecord::new();

    for field in &descriptor.fields {
        let raw = form.get(&field.name);
        let text = raw.map(FormInput::as_text).unwrap_or_default();

        match &field.input {
            FieldInput::Text { trim } | FieldInput::TextArea { trim } => {
                let value = if *trim { text.trim().to_string() } else { text };
                payload.insert(field.name.as_str(), value);
            }
            FieldInput::Select { .. } => {
                payload.insert(field.name.as_str(), text.trim());
            }
            FieldInput::Checkbox { default } => {
                let checked = raw.map(FormInput::is_checked).unwrap_or(*default);
                payload.insert(field.name.as_str(), checked);
            }
            FieldInput::Number => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    let number = parse_number(trimmed).ok_or_else(|| {
                        ConsoleError::validation(format!("{} must be a number", field.label))
                    })?;
                    payload.insert(field.name.as_str(), number);
                }
            }
            FieldInput::Password => {
                if !text.is_empty() {
                    payload.insert(field.name.as_str(), text);
                }
            }
        }
    }

    for picker in &descriptor.pickers {
        if let Some(selected) = pickers.get(&picker.name) {
            payload.insert(picker.name.as_str(), picker_payload(picker, selected)?);
        }
    }

    Ok(payload)
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn picker_payload(picker: &PickerSpec, selected: &[String]) -> ConsoleResult<Value> {
    match picker.payload {
        PayloadKind::Strings => Ok(Value::from(selected.to_vec())),
        PayloadKind::Integers => selected
            .iter()
            .map(|value| {
                value.trim().parse::<i64>().map(Value::from).map_err(|_| {
                    ConsoleError::validation(format!(
                        "{} value '{}' is not a numeric id",
                        picker.name, value
                    ))
                })
            })
            .collect::<ConsoleResult<Vec<_>>>()
            .map(Value::Array),
    }
}

// ============================================================================
// Form population
// ============================================================================

/// Reset state of every form input
pub fn blank_inputs(descriptor: &EntityDescriptor) -> FormValues {
    descriptor
        .fields
        .iter()
        .map(|field| {
            let input = match &field.input {
                FieldInput::Checkbox { default } => FormInput::Checked(*default),
                FieldInput::Select { default, .. } => FormInput::Text(default.clone()),
                _ => FormInput::Text(String::new()),
            };
            (field.name.clone(), input)
        })
        .collect()
}

/// Form inputs filled from a record snapshot
///
/// Secrets are never read back; a select without a value falls back to its
/// default.
pub fn populate_inputs(descriptor: &EntityDescriptor, record: &EntityRecord) -> FormValues {
    descriptor
        .fields
        .iter()
        .map(|field| {
            let current = record.get(&field.name).map(display_scalar).unwrap_or_default();
            let input = match &field.input {
                FieldInput::Password => FormInput::Text(String::new()),
                FieldInput::Checkbox { .. } => FormInput::Checked(record.flag(&field.name)),
                FieldInput::Select { default, .. } if current.is_empty() => {
                    FormInput::Text(default.clone())
                }
                _ => FormInput::Text(current),
            };
            (field.name.clone(), input)
        })
        .collect()
}

/// Values a picker should show as selected for a record
///
/// Items may be sub-records (the value field is read from them) or bare
/// scalars.
pub fn picker_selection(picker: &PickerSpec, record: &EntityRecord) -> Vec<String> {
    record
        .array(&picker.name)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| match item {
            Value::Object(_) => item.get(picker.value_field.as_str()).map(display_scalar),
            Value::Null => None,
            scalar => Some(display_scalar(scalar)),
        })
        .filter(|value| !value.is_empty())
        .collect()
}

/// Options of a picker built from the source collection
pub fn picker_options(picker: &PickerSpec, records: &[EntityRecord]) -> Vec<PickerOption> {
    records
        .iter()
        .filter_map(|record| {
            let value = record.get(&picker.value_field).map(display_scalar)?;
            let label = record
                .get(&picker.label_field)
                .map(display_scalar)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| value.clone());
            let search = record
                .get(&picker.search_field)
                .map(display_scalar)
                .unwrap_or_else(|| label.clone());
            Some(PickerOption { value, label, search })
        })
        .collect()
}

// ============================================================================
// Validation
// ============================================================================

/// Check that every field required for this kind of save has a value
pub fn validate_required(
    descriptor: &EntityDescriptor,
    payload: &EntityRecord,
    is_edit: bool,
) -> ConsoleResult<()> {
    for field in descriptor
        .fields
        .iter()
        .filter(|f| f.requirement.applies(is_edit))
    {
        let filled = match payload.get(&field.name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        if !filled {
            return Err(ConsoleError::required(&field.name, &field.label));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoints;
    use crate::field::FormField;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users() -> EntityDescriptor {
        EntityDescriptor::new("users", "User", Endpoints::crud("/users/"))
            .identified_by("username")
            .with_field(FormField::new("username", "Username", FieldInput::text()).required())
            .with_field(FormField::new(
                "usertype",
                "User type",
                FieldInput::select(&["user", "admin"], "user"),
            ))
            .with_field(FormField::new("is_active", "Active", FieldInput::checkbox()))
            .with_field(FormField::new("pw", "Password", FieldInput::Password).required_on_create())
            .with_picker(PickerSpec::by_id("roles", "roles", "rolename"))
            .with_picker(PickerSpec::new("divisions", "divisions", "code"))
    }

    fn skills() -> EntityDescriptor {
        EntityDescriptor::new("skills", "Skill", Endpoints::crud("/skills/"))
            .with_field(FormField::new("skillname", "Skill name", FieldInput::text()).required())
            .with_field(FormField::new("skill_level", "Skill level", FieldInput::Number))
            .with_field(FormField::new("notes", "Notes", FieldInput::raw_text_area()))
    }

    fn text(value: &str) -> FormInput {
        FormInput::Text(value.to_string())
    }

    #[test]
    fn test_build_payload_trims_and_types() {
        let mut form = FormValues::new();
        form.insert("username".into(), text("  jdoe "));
        form.insert("usertype".into(), text("admin"));
        form.insert("is_active".into(), FormInput::Checked(true));
        form.insert("pw".into(), text(""));
        let mut pickers = PickerValues::new();
        pickers.insert("roles".into(), vec!["1".into(), "3".into()]);
        pickers.insert("divisions".into(), vec!["D1".into()]);

        let payload = build_payload(&users(), &form, &pickers).unwrap();
        assert_eq!(
            payload.into_value(),
            json!({
                "username": "jdoe",
                "usertype": "admin",
                "is_active": true,
                "roles": [1, 3],
                "divisions": ["D1"]
            })
        );
    }

    #[test]
    fn test_password_only_sent_when_filled() {
        let mut form = blank_inputs(&users());
        form.insert("pw".into(), text("s3cret"));
        let payload = build_payload(&users(), &form, &PickerValues::new()).unwrap();
        assert_eq!(payload.get("pw"), Some(&json!("s3cret")));
        assert!(!payload.contains("roles"));
    }

    #[test]
    fn test_number_fields() {
        let mut form = FormValues::new();
        form.insert("skillname".into(), text("Welding"));
        form.insert("skill_level".into(), text(""));
        form.insert("notes".into(), text("  keep  "));
        let payload = build_payload(&skills(), &form, &PickerValues::new()).unwrap();
        assert!(!payload.contains("skill_level"));
        assert_eq!(payload.get("notes"), Some(&json!("  keep  ")));

        form.insert("skill_level".into(), text("4"));
        let payload = build_payload(&skills(), &form, &PickerValues::new()).unwrap();
        assert_eq!(payload.get("skill_level"), Some(&json!(4)));

        form.insert("skill_level".into(), text("high"));
        let err = build_payload(&skills(), &form, &PickerValues::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_integer_picker_rejects_text() {
        let mut pickers = PickerValues::new();
        pickers.insert("roles".into(), vec!["admin".into()]);
        assert!(build_payload(&users(), &FormValues::new(), &pickers).is_err());
    }

    #[test]
    fn test_validate_required_relaxes_on_edit() {
        let descriptor = users();
        let payload = EntityRecord::new().with("username", "jdoe");
        let err = validate_required(&descriptor, &payload, false).unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
        assert!(validate_required(&descriptor, &payload, true).is_ok());

        let blank = EntityRecord::new().with("username", "   ");
        assert!(validate_required(&descriptor, &blank, true).is_err());
    }

    #[test]
    fn test_populate_inputs_from_record() {
        let record = EntityRecord::new()
            .with("username", "jdoe")
            .with("is_active", true)
            .with("pw", "hash");
        let form = populate_inputs(&users(), &record);
        assert_eq!(form.get("username"), Some(&text("jdoe")));
        assert_eq!(form.get("usertype"), Some(&text("user")));
        assert_eq!(form.get("is_active"), Some(&FormInput::Checked(true)));
        assert_eq!(form.get("pw"), Some(&text("")));
    }

    #[test]
    fn test_picker_selection_reads_values() {
        let descriptor = users();
        let record = EntityRecord::new()
            .with("roles", json!([{"id": 2, "rolename": "ops"}, {"rolename": "orphan"}]))
            .with("divisions", json!(["D1", null]));
        let roles = descriptor.picker("roles").unwrap();
        let divisions = descriptor.picker("divisions").unwrap();
        assert_eq!(picker_selection(roles, &record), vec!["2"]);
        assert_eq!(picker_selection(divisions, &record), vec!["D1"]);
        assert!(picker_selection(roles, &EntityRecord::new()).is_empty());
    }

    #[test]
    fn test_picker_options() {
        let picker = PickerSpec::by_id("roles", "roles", "rolename");
        let records = vec![
            EntityRecord::new().with("id", 1).with("rolename", "admin"),
            EntityRecord::new().with("rolename", "no id"),
            EntityRecord::new().with("id", 2),
        ];
        let options = picker_options(&picker, &records);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "admin");
        assert_eq!(options[1].label, "2");
    }

    #[test]
    fn test_checkbox_text_input() {
        assert!(text("on").is_checked());
        assert!(text("TRUE").is_checked());
        assert!(!text("no").is_checked());
    }
}
