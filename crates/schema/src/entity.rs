//! Entity descriptors
//!
//! An [`EntityDescriptor`] is the static declaration of one entity type: its
//! endpoints, its form, its pickers, its relationship fields and the actions
//! offered on each grid row. It is pure data; behaviour that cannot be
//! expressed declaratively goes through [`crate::EntityHooks`].

use crate::action::{ActionSpec, RowAction};
use crate::endpoint::{Endpoints, ID_PLACEHOLDER, OperationType};
use crate::field::{FormField, PickerSpec};
use crate::relationship::RelationSpec;
use gridkeeper_core::{ConsoleError, ConsoleResult, Validatable};
use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shared delete confirmation modal
pub const CONFIRM_DELETE_MODAL: &str = "confirmDeleteModal";

/// Confirm button inside the shared delete modal
pub const CONFIRM_DELETE_BUTTON: &str = "confirmDeleteBtn";

/// Shared related-entities viewer modal
pub const RELATED_VIEWER_MODAL: &str = "showLinksModal";

/// Title element of the related-entities viewer
pub const RELATED_VIEWER_TITLE: &str = "showLinksModalTitle";

/// List container of the related-entities viewer
pub const RELATED_VIEWER_LIST: &str = "linksList";

// ============================================================================
// FormElements
// ============================================================================

/// Stable element ids of an entity type's add/edit UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElements {
    pub add_button: String,
    pub save_button: String,
    pub modal: String,
    pub modal_title: String,
    pub form: String,
}

impl FormElements {
    /// Conventional ids under an element prefix
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            add_button: format!("{}-addBtn", prefix),
            save_button: format!("{}-saveBtn", prefix),
            modal: format!("{}-Modal", prefix),
            modal_title: format!("{}-ModalTitle", prefix),
            form: format!("{}-Form", prefix),
        }
    }
}

// ============================================================================
// EntityDescriptor
// ============================================================================

/// Static declaration of one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Catalog key (kebab-case plural, e.g. `"user-roles"`)
    pub key: String,

    /// Display name (singular, e.g. `"Role"`)
    pub name: String,

    /// Field carrying the stable identifier
    pub id_field: String,

    /// REST endpoints
    pub endpoints: Endpoints,

    /// Fields shown first, in this order
    pub preferred_columns: Vec<String>,

    /// Plain form inputs, in form order
    pub fields: Vec<FormField>,

    /// Relationship pickers, in form order
    pub pickers: Vec<PickerSpec>,

    /// Relationship fields of the records
    pub relations: Vec<RelationSpec>,

    /// Row actions, in button order
    pub actions: Vec<ActionSpec>,

    /// Prefix of every element id of this entity type
    pub element_prefix: String,

    /// Add/edit UI elements (absent for read-only types)
    pub elements: Option<FormElements>,
}

impl EntityDescriptor {
    /// Create a descriptor identified by `id`
    pub fn new(key: impl Into<String>, name: impl Into<String>, endpoints: Endpoints) -> Self {
        let key = key.into();
        let element_prefix = key.to_kebab_case();
        let elements = (endpoints.supports(OperationType::Create)
            || endpoints.supports(OperationType::Update))
        .then(|| FormElements::for_prefix(&element_prefix));

        Self {
            key,
            name: name.into(),
            id_field: "id".to_string(),
            endpoints,
            preferred_columns: Vec::new(),
            fields: Vec::new(),
            pickers: Vec::new(),
            relations: Vec::new(),
            actions: Vec::new(),
            element_prefix,
            elements,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Use a natural key as the identifier
    pub fn identified_by(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Set the preferred column order
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.preferred_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a form field, deriving its element id when unset
    pub fn with_field(mut self, mut field: FormField) -> Self {
        if field.element_id.is_empty() {
            field.element_id = self.element_id(&field.name);
        }
        self.fields.push(field);
        self
    }

    /// Add a picker, deriving its element id when unset
    pub fn with_picker(mut self, mut picker: PickerSpec) -> Self {
        if picker.element_id.is_empty() {
            picker.element_id = self.element_id(&picker.name);
        }
        self.pickers.push(picker);
        self
    }

    /// Declare a relationship field
    pub fn with_relation(mut self, relation: RelationSpec) -> Self {
        self.relations.push(relation);
        self
    }

    /// Append a row action
    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    /// Append edit/delete buttons for whichever write endpoints exist
    pub fn with_standard_actions(mut self) -> Self {
        if self.endpoints.supports(OperationType::Update) {
            self.actions.push(ActionSpec::edit());
        }
        if self.endpoints.supports(OperationType::Delete) {
            self.actions.push(ActionSpec::delete());
        }
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Element id of a named input
    pub fn element_id(&self, name: &str) -> String {
        format!("{}-{}", self.element_prefix, name.to_kebab_case())
    }

    /// Whether the operation has an endpoint
    pub fn supports(&self, op: OperationType) -> bool {
        self.endpoints.supports(op)
    }

    /// Whether the type is list-only
    pub fn is_read_only(&self) -> bool {
        self.endpoints.is_read_only()
    }

    /// Whether the type has an add/edit form
    pub fn has_form(&self) -> bool {
        !self.fields.is_empty() || !self.pickers.is_empty()
    }

    /// Relationship declaration for a field
    pub fn relation(&self, field: &str) -> Option<&RelationSpec> {
        self.relations.iter().find(|r| r.field == field)
    }

    /// Whether a field is a declared relationship
    pub fn is_relation(&self, field: &str) -> bool {
        self.relation(field).is_some()
    }

    /// Picker declaration by name
    pub fn picker(&self, name: &str) -> Option<&PickerSpec> {
        self.pickers.iter().find(|p| p.name == name)
    }

    /// Form field declaration by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the form edits the given record field
    pub fn form_covers(&self, field: &str) -> bool {
        self.field(field).is_some() || self.picker(field).is_some()
    }

    /// Declared action by name
    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.action == name)
    }

    /// Modal title for adding
    pub fn add_title(&self) -> String {
        format!("Add New {}", self.name)
    }

    /// Primary button label for adding
    pub fn add_label(&self) -> String {
        format!("Create {}", self.name)
    }

    /// Modal title for editing
    pub fn edit_title(&self) -> String {
        format!("Edit {}", self.name)
    }

    /// Distinct catalog keys the pickers draw options from
    pub fn picker_sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.pickers
            .iter()
            .map(|p| p.source.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

impl Validatable for EntityDescriptor {
    fn validate(&self) -> ConsoleResult<()> {
        let fail = |msg: String| Err(ConsoleError::descriptor(&self.name, msg));

        if self.key.trim().is_empty() || self.name.trim().is_empty() {
            return fail("key and name must not be empty".to_string());
        }
        if self.id_field.trim().is_empty() {
            return fail("identifier field must not be empty".to_string());
        }
        if self.endpoints.list.trim().is_empty() {
            return fail("list endpoint must not be empty".to_string());
        }
        for op in [OperationType::Update, OperationType::Delete] {
            if let Some(template) = self.endpoints.template(op) {
                if !template.contains(ID_PLACEHOLDER) {
                    return fail(format!(
                        "{} endpoint '{}' lacks the {} placeholder",
                        op.display_name(),
                        template,
                        ID_PLACEHOLDER
                    ));
                }
            }
        }

        let can_write =
            self.supports(OperationType::Create) || self.supports(OperationType::Update);
        if self.has_form() && !can_write {
            return fail("form declared without create or update endpoint".to_string());
        }
        if can_write && self.elements.is_none() {
            return fail("write endpoints declared without form elements".to_string());
        }

        let mut names = HashSet::new();
        for action in &self.actions {
            if !names.insert(action.action.as_str()) {
                return fail(format!("duplicate action '{}'", action.action));
            }
            match RowAction::parse(&action.action) {
                RowAction::Edit if !self.supports(OperationType::Update) => {
                    return fail("edit action without update endpoint".to_string());
                }
                RowAction::Delete if !self.supports(OperationType::Delete) => {
                    return fail("delete action without delete endpoint".to_string());
                }
                RowAction::ShowRelated(field) if !self.is_relation(&field) => {
                    return fail(format!(
                        "'{}' shows undeclared relation '{}'",
                        action.action, field
                    ));
                }
                _ => {}
            }
        }

        let mut pickers = HashSet::new();
        for picker in &self.pickers {
            if !pickers.insert(picker.name.as_str()) {
                return fail(format!("duplicate picker '{}'", picker.name));
            }
            if picker.source.trim().is_empty() || picker.value_field.trim().is_empty() {
                return fail(format!("picker '{}' has no option source", picker.name));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::StyleVariant;
    use crate::field::FieldInput;
    use pretty_assertions::assert_eq;

    fn roles() -> EntityDescriptor {
        EntityDescriptor::new("user-roles", "Role", Endpoints::crud("/userroles/"))
            .with_columns(&["id", "rolename", "users"])
            .with_field(FormField::new("rolename", "Role name", FieldInput::text()).required())
            .with_relation(RelationSpec::users())
            .with_standard_actions()
            .with_action(ActionSpec::show("users", "Users", "fas fa-user", StyleVariant::Info))
    }

    fn modules() -> EntityDescriptor {
        EntityDescriptor::new("modules", "Module", Endpoints::read_only("/modules/"))
    }

    #[test]
    fn test_new_descriptor_defaults() {
        let descriptor = roles();
        assert_eq!(descriptor.id_field, "id");
        assert_eq!(descriptor.element_prefix, "user-roles");
        assert_eq!(
            descriptor.elements.as_ref().map(|e| e.modal.as_str()),
            Some("user-roles-Modal")
        );
        assert_eq!(descriptor.fields[0].element_id, "user-roles-rolename");
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_standard_actions_follow_endpoints() {
        let descriptor = roles();
        let names: Vec<&str> = descriptor.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(names, vec!["edit", "delete", "show-users"]);

        let read_only = modules().with_standard_actions();
        assert!(read_only.actions.is_empty());
        assert!(read_only.elements.is_none());
    }

    #[test]
    fn test_edit_action_requires_update_endpoint() {
        let descriptor = modules().with_action(ActionSpec::edit());
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().contains("edit action without update endpoint"));
    }

    #[test]
    fn test_show_action_requires_relation() {
        let show_users = ActionSpec::show("users", "Users", "fas fa-user", StyleVariant::Info);
        let descriptor = modules().with_action(show_users);
        assert!(!descriptor.is_valid());
    }

    #[test]
    fn test_form_on_read_only_is_invalid() {
        let descriptor = modules().with_field(FormField::new("title", "Title", FieldInput::text()));
        assert!(!descriptor.is_valid());
    }

    #[test]
    fn test_templates_need_placeholder() {
        let mut endpoints = Endpoints::crud("/userroles/");
        endpoints.update = Some("/userroles/".to_string());
        let descriptor = EntityDescriptor::new("user-roles", "Role", endpoints);
        assert!(!descriptor.is_valid());
    }

    #[test]
    fn test_duplicate_actions_are_invalid() {
        let descriptor = roles().with_action(ActionSpec::edit());
        assert!(!descriptor.is_valid());
    }

    #[test]
    fn test_form_covers() {
        let descriptor = roles();
        assert!(descriptor.form_covers("rolename"));
        assert!(!descriptor.form_covers("users"));
        assert_eq!(descriptor.add_title(), "Add New Role");
        assert_eq!(descriptor.add_label(), "Create Role");
        assert_eq!(descriptor.edit_title(), "Edit Role");
    }
}
