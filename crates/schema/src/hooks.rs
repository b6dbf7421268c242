//! Entity-specific behaviour
//!
//! The controller is generic. Whatever an entity type needs beyond its
//! declaration is supplied through [`EntityHooks`]; every method has a
//! default, so most entity types use [`DefaultHooks`].

use crate::column::ColumnDefinition;
use crate::entity::EntityDescriptor;
use crate::form::validate_required;
use crate::relationship::RelatedListing;
use gridkeeper_core::{ConsoleError, ConsoleResult, EntityRecord};
use regex::Regex;
use serde_json::Value;

/// Result of an entity-specific row action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Open the related viewer with this content
    ShowRelated(RelatedListing),
    /// Show a message to the operator
    Notify(String),
}

/// Extension points of one entity type
pub trait EntityHooks: Send + Sync {
    /// Column override for a field, consulted before the fixed rules
    fn custom_column(
        &self,
        _descriptor: &EntityDescriptor,
        _field: &str,
    ) -> Option<ColumnDefinition> {
        None
    }

    /// Handle an action outside the fixed action table
    fn custom_action(
        &self,
        _descriptor: &EntityDescriptor,
        _action: &str,
        _row: &EntityRecord,
    ) -> Option<ActionEffect> {
        None
    }

    /// Validate a payload before it is sent
    fn validate(
        &self,
        descriptor: &EntityDescriptor,
        payload: &EntityRecord,
        is_edit: bool,
    ) -> ConsoleResult<()> {
        validate_required(descriptor, payload, is_edit)
    }

    /// Carry forward fields the form does not edit
    ///
    /// `updated` is the original snapshot with the server response laid over
    /// it. Relationship arrays the form has no picker for are restored from
    /// the original, or emptied when the original had none.
    fn preserve_fields_on_update(
        &self,
        descriptor: &EntityDescriptor,
        updated: &mut EntityRecord,
        original: &EntityRecord,
    ) {
        for relation in &descriptor.relations {
            if descriptor.form_covers(&relation.field) {
                continue;
            }
            let kept = original
                .get(&relation.field)
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()));
            updated.insert(relation.field.as_str(), kept);
        }
    }

    /// Fill in a freshly created record before it is added to the grid
    fn initialize_new_record(&self, descriptor: &EntityDescriptor, record: &mut EntityRecord) {
        for relation in &descriptor.relations {
            if !record.contains(&relation.field) {
                record.insert(relation.field.as_str(), Value::Array(Vec::new()));
            }
        }
    }
}

/// Hooks with every default
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl EntityHooks for DefaultHooks {}

// ============================================================================
// UserHooks
// ============================================================================

/// Address check applied to the user form
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Hooks of the user entity type: required fields plus an email check
#[derive(Debug, Clone)]
pub struct UserHooks {
    email: Regex,
}

impl UserHooks {
    pub fn new() -> ConsoleResult<Self> {
        let email = Regex::new(EMAIL_PATTERN)
            .map_err(|e| ConsoleError::internal(format!("email pattern: {}", e)))?;
        Ok(Self { email })
    }

    /// Whether an address looks deliverable
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }
}

impl EntityHooks for UserHooks {
    fn validate(
        &self,
        descriptor: &EntityDescriptor,
        payload: &EntityRecord,
        is_edit: bool,
    ) -> ConsoleResult<()> {
        validate_required(descriptor, payload, is_edit)?;
        match payload.get("email").and_then(Value::as_str) {
            Some(email) if !email.is_empty() && !self.is_valid_email(email) => Err(
                ConsoleError::validation("Please enter a valid email address"),
            ),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
