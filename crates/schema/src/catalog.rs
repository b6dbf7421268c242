//! Built-in entity types
//!
//! The console ships with the declarations of every entity type it manages:
//! users, roles, skills and modules from the users-and-permissions area, and
//! the organizational units and locations of the common definitions area.

use crate::action::{ActionSpec, StyleVariant};
use crate::endpoint::Endpoints;
use crate::entity::EntityDescriptor;
use crate::field::{FieldInput, FormField, PickerSpec};
use crate::hooks::{DefaultHooks, EntityHooks, UserHooks};
use crate::relationship::RelationSpec;
use gridkeeper_core::{ConsoleError, ConsoleResult, Validatable};
use heck::ToKebabCase;
use std::sync::Arc;

const USERS_AND_PERMISSIONS: &str = "/users_and_permissions";
const COMMON_DEFINITIONS: &str = "/mp_common_definitions";

/// Values accepted by the user type select
pub const USER_TYPES: &[&str] = &["regular", "mp_admin", "superadmin"];

// ============================================================================
// CatalogEntry
// ============================================================================

/// A descriptor together with its hooks
#[derive(Clone)]
pub struct CatalogEntry {
    pub descriptor: EntityDescriptor,
    pub hooks: Arc<dyn EntityHooks>,
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("descriptor", &self.descriptor.key)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Ordered set of the entity types the console manages
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in entity type, validated
    pub fn builtin() -> ConsoleResult<Self> {
        let defaults: Arc<dyn EntityHooks> = Arc::new(DefaultHooks);
        let mut catalog = Self::new();
        catalog.register(users(), Arc::new(UserHooks::new()?))?;
        catalog.register(roles(), defaults.clone())?;
        catalog.register(skills(), defaults.clone())?;
        catalog.register(modules(), defaults.clone())?;
        catalog.register(divisions(), defaults.clone())?;
        catalog.register(laboratories(), defaults.clone())?;
        catalog.register(locations(), defaults.clone())?;
        catalog.register(warehouses(), defaults)?;
        catalog.check_picker_sources()?;
        Ok(catalog)
    }

    /// Add an entity type; its descriptor must be valid and its key unused
    pub fn register(
        &mut self,
        descriptor: EntityDescriptor,
        hooks: Arc<dyn EntityHooks>,
    ) -> ConsoleResult<()> {
        descriptor.validate()?;
        if self.get(&descriptor.key).is_some() {
            return Err(ConsoleError::descriptor(
                &descriptor.name,
                format!("key '{}' registered twice", descriptor.key),
            ));
        }
        self.entries.push(CatalogEntry { descriptor, hooks });
        Ok(())
    }

    /// Entry by exact key
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.descriptor.key == key)
    }

    /// Entry by loosely written name
    ///
    /// Accepts the key, the key without its `user-` prefix, or the singular
    /// display name, in any casing (`"UserRoles"`, `"roles"`, `"Role"`).
    pub fn find(&self, name: &str) -> ConsoleResult<&CatalogEntry> {
        let wanted = name.trim().to_kebab_case();
        self.entries
            .iter()
            .find(|e| {
                let key = e.descriptor.key.as_str();
                key == wanted
                    || key.strip_prefix("user-") == Some(wanted.as_str())
                    || e.descriptor.name.to_kebab_case() == wanted
            })
            .ok_or_else(|| ConsoleError::EntityNotFound(name.to_string()))
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Catalog keys in registration order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.descriptor.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_picker_sources(&self) -> ConsoleResult<()> {
        for entry in &self.entries {
            for picker in &entry.descriptor.pickers {
                if self.get(&picker.source).is_none() {
                    return Err(ConsoleError::descriptor(
                        &entry.descriptor.name,
                        format!("picker '{}' draws from unknown '{}'", picker.name, picker.source),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Users and permissions
// ============================================================================

fn users() -> EntityDescriptor {
    let collection = format!("{}/users/", USERS_AND_PERMISSIONS);
    EntityDescriptor::new("users", "User", Endpoints::crud(collection))
        .identified_by("username")
        .with_columns(&[
            "id", "is_active", "username", "name", "surname", "email", "usertype", "title",
            "roles", "skills", "divisions", "modules",
        ])
        .with_field(FormField::new("username", "Username", FieldInput::text()).required())
        .with_field(FormField::new("email", "Email", FieldInput::text()).required())
        .with_field(FormField::new("name", "Name", FieldInput::text()).required())
        .with_field(FormField::new("surname", "Surname", FieldInput::text()).required())
        .with_field(FormField::new(
            "usertype",
            "User type",
            FieldInput::select(USER_TYPES, "regular"),
        ))
        .with_field(FormField::new("is_active", "Active", FieldInput::checkbox()))
        .with_field(FormField::new("title", "Title", FieldInput::text()))
        .with_field(FormField::new("pw", "Password", FieldInput::Password).required_on_create())
        .with_picker(PickerSpec::by_id("roles", "user-roles", "rolename"))
        .with_picker(PickerSpec::by_id("skills", "user-skills", "skillname"))
        .with_picker(PickerSpec::new("divisions", "divisions", "code"))
        .with_picker(PickerSpec::by_id("modules", "user-modules", "title"))
        .with_relation(
            RelationSpec::new("roles", "Roles", "role(s)")
                .titled_by(&["rolename"])
                .detailed_by(&["notes"])
                .hidden(),
        )
        .with_relation(
            RelationSpec::new("skills", "Skills", "skill(s)")
                .titled_by(&["skillname"])
                .detailed_by(&["skill_level"])
                .hidden(),
        )
        .with_relation(
            RelationSpec::new("divisions", "Divisions", "division(s)")
                .joined("code", "No divisions")
                .titled_by(&["name"])
                .detailed_by(&["code"]),
        )
        .with_relation(
            RelationSpec::new("modules", "Modules", "module(s)")
                .titled_by(&["title"])
                .detailed_by(&["description"])
                .hidden(),
        )
        .with_standard_actions()
        .with_action(ActionSpec::show(
            "roles",
            "Roles",
            "fas fa-user-shield",
            StyleVariant::Success,
        ))
        .with_action(ActionSpec::show("skills", "Skills", "fas fa-hammer", StyleVariant::Warning))
        .with_action(ActionSpec::show(
            "modules",
            "Modules",
            "fas fa-gears",
            StyleVariant::Secondary,
        ))
}

fn roles() -> EntityDescriptor {
    let collection = format!("{}/userroles/", USERS_AND_PERMISSIONS);
    EntityDescriptor::new("user-roles", "Role", Endpoints::crud(collection))
        .with_columns(&[
            "id",
            "rolename",
            "can_create",
            "can_read",
            "can_update",
            "can_delete",
            "notes",
            "users",
        ])
        .with_field(FormField::new("rolename", "Role name", FieldInput::text()).required())
        .with_field(FormField::new("notes", "Notes", FieldInput::text_area()))
        .with_field(FormField::new("can_create", "Can create", FieldInput::checkbox()))
        .with_field(FormField::new("can_read", "Can read", FieldInput::checkbox()))
        .with_field(FormField::new("can_update", "Can update", FieldInput::checkbox()))
        .with_field(FormField::new("can_delete", "Can delete", FieldInput::checkbox()))
        .with_relation(RelationSpec::users())
        .with_standard_actions()
        .with_action(ActionSpec::show("users", "Users", "fas fa-user", StyleVariant::Info))
}

fn skills() -> EntityDescriptor {
    let collection = format!("{}/userskills/", USERS_AND_PERMISSIONS);
    EntityDescriptor::new("user-skills", "Skill", Endpoints::crud(collection))
        .with_columns(&["id", "skillname", "skill_level", "notes", "users"])
        .with_field(FormField::new("skillname", "Skill name", FieldInput::text()).required())
        .with_field(FormField::new("skill_level", "Skill level", FieldInput::Number))
        .with_field(FormField::new("notes", "Notes", FieldInput::text_area()))
        .with_relation(RelationSpec::users())
        .with_standard_actions()
        .with_action(ActionSpec::show("users", "Users", "fas fa-user", StyleVariant::Info))
}

fn modules() -> EntityDescriptor {
    let collection = format!("{}/modules/", USERS_AND_PERMISSIONS);
    EntityDescriptor::new("user-modules", "Module", Endpoints::read_only(collection))
        .with_columns(&["id", "title", "description", "users"])
        .with_relation(RelationSpec::users())
        .with_action(ActionSpec::show("users", "Users", "fas fa-user", StyleVariant::Info))
}

// ============================================================================
// Common definitions
// ============================================================================

/// Relation to organizational units, titled by name with the code as detail
fn units(field: &str, label: &str, noun: &str) -> RelationSpec {
    RelationSpec::new(field, label, noun)
        .titled_by(&["name"])
        .detailed_by(&["code"])
}

fn divisions() -> EntityDescriptor {
    let collection = format!("{}/divisions/", COMMON_DEFINITIONS);
    EntityDescriptor::new("divisions", "Division", Endpoints::crud(collection))
        .with_columns(&["id", "code", "name", "description", "laboratories", "warehouses", "users"])
        .with_field(FormField::new("code", "Code", FieldInput::text()).required())
        .with_field(FormField::new("name", "Name", FieldInput::text()).required())
        .with_field(FormField::new("description", "Description", FieldInput::text_area()))
        .with_picker(PickerSpec::new("laboratories", "laboratories", "code").labelled_by("name"))
        .with_picker(PickerSpec::new("warehouses", "warehouses", "code").labelled_by("name"))
        .with_picker(PickerSpec::new("users", "users", "username"))
        .with_relation(units("laboratories", "Laboratories", "laboratory(ies)"))
        .with_relation(units("warehouses", "Warehouses", "warehouse(s)"))
        .with_relation(RelationSpec::users())
        .with_standard_actions()
        .with_action(ActionSpec::show(
            "laboratories",
            "Laboratories",
            "fas fa-flask-vial",
            StyleVariant::Success,
        ))
        .with_action(ActionSpec::show(
            "warehouses",
            "Warehouses",
            "fas fa-warehouse",
            StyleVariant::Warning,
        ))
        .with_action(ActionSpec::show("users", "Users", "fas fa-users", StyleVariant::Primary))
}

fn laboratories() -> EntityDescriptor {
    let collection = format!("{}/laboratories/", COMMON_DEFINITIONS);
    EntityDescriptor::new("laboratories", "Laboratory", Endpoints::crud(collection))
        .with_columns(&["id", "code", "name", "description", "divisions"])
        .with_field(FormField::new("code", "Code", FieldInput::text()).required())
        .with_field(FormField::new("name", "Name", FieldInput::text()))
        .with_field(FormField::new("description", "Description", FieldInput::text_area()))
        .with_picker(PickerSpec::new("divisions", "divisions", "code"))
        .with_relation(units("divisions", "Divisions", "division(s)"))
        .with_standard_actions()
        .with_action(ActionSpec::show(
            "divisions",
            "Divisions",
            "fas fa-building",
            StyleVariant::Danger,
        ))
}

fn locations() -> EntityDescriptor {
    let collection = format!("{}/locations/", COMMON_DEFINITIONS);
    EntityDescriptor::new("locations", "Location", Endpoints::crud(collection))
        .with_columns(&["id", "code", "name", "address", "description", "warehouses"])
        .with_field(FormField::new("code", "Code", FieldInput::text()).required())
        .with_field(FormField::new("name", "Name", FieldInput::text()))
        .with_field(FormField::new("address", "Address", FieldInput::raw_text_area()))
        .with_field(FormField::new("description", "Description", FieldInput::raw_text_area()))
        .with_relation(units("warehouses", "Warehouses", "warehouse(s)"))
        .with_standard_actions()
        .with_action(ActionSpec::show(
            "warehouses",
            "Warehouses",
            "fas fa-warehouse",
            StyleVariant::Info,
        ))
}

fn warehouses() -> EntityDescriptor {
    let collection = format!("{}/warehouses/", COMMON_DEFINITIONS);
    EntityDescriptor::new("warehouses", "Warehouse", Endpoints::crud(collection))
        .with_columns(&["id", "code", "name", "description", "locations", "divisions"])
        .with_field(FormField::new("code", "Code", FieldInput::text()).required())
        .with_field(FormField::new("name", "Name", FieldInput::text()))
        .with_field(FormField::new("description", "Description", FieldInput::text_area()))
        .with_picker(PickerSpec::new("divisions", "divisions", "code"))
        .with_picker(PickerSpec::new("locations", "locations", "code").labelled_by("name"))
        .with_relation(units("locations", "Locations", "location(s)"))
        .with_relation(units("divisions", "Divisions", "division(s)"))
        .with_standard_actions()
        .with_action(ActionSpec::show(
            "locations",
            "Locations",
            "fas fa-location-dot",
            StyleVariant::Warning,
        ))
        .with_action(ActionSpec::show(
            "divisions",
            "Divisions",
            "fas fa-building",
            StyleVariant::Danger,
        ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::OperationType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.keys(),
            vec![
                "users",
                "user-roles",
                "user-skills",
                "user-modules",
                "divisions",
                "laboratories",
                "locations",
                "warehouses"
            ]
        );
    }

    #[test]
    fn test_find_accepts_loose_names() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.find("roles").unwrap().descriptor.key, "user-roles");
        assert_eq!(catalog.find("UserSkills").unwrap().descriptor.key, "user-skills");
        assert_eq!(catalog.find("Division").unwrap().descriptor.key, "divisions");
        assert!(catalog.find("invoices").unwrap_err().is_not_found());
    }

    #[test]
    fn test_users_are_keyed_by_username() {
        let catalog = Catalog::builtin().unwrap();
        let users = &catalog.get("users").unwrap().descriptor;
        assert_eq!(users.id_field, "username");
        assert_eq!(
            users.endpoints.template(OperationType::Update),
            Some("/users_and_permissions/users/{id}")
        );
        assert_eq!(
            users.picker_sources(),
            vec!["user-roles", "user-skills", "divisions", "user-modules"]
        );
    }

    #[test]
    fn test_modules_are_read_only() {
        let catalog = Catalog::builtin().unwrap();
        let modules = &catalog.find("modules").unwrap().descriptor;
        assert!(modules.is_read_only());
        assert!(!modules.has_form());
        let actions: Vec<&str> = modules.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["show-users"]);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.register(roles(), Arc::new(DefaultHooks)).unwrap();
        assert!(catalog.register(roles(), Arc::new(DefaultHooks)).is_err());
    }

    #[test]
    fn test_unknown_picker_source_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.register(laboratories(), Arc::new(DefaultHooks)).unwrap();
        assert!(catalog.check_picker_sources().is_err());
    }
}
