//! Row actions
//!
//! The actions column renders one button per [`ActionSpec`]. A click is
//! dispatched by action name and resolved through [`RowAction::parse`].

use serde::{Deserialize, Serialize};

/// Action that opens the edit form
pub const ACTION_EDIT: &str = "edit";

/// Action that asks for delete confirmation
pub const ACTION_DELETE: &str = "delete";

/// Prefix of the related-entities viewer actions
pub const SHOW_PREFIX: &str = "show-";

// ============================================================================
// StyleVariant
// ============================================================================

/// Button colour variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleVariant {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
}

impl StyleVariant {
    /// CSS-style variant name
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleVariant::Primary => "primary",
            StyleVariant::Secondary => "secondary",
            StyleVariant::Success => "success",
            StyleVariant::Danger => "danger",
            StyleVariant::Warning => "warning",
            StyleVariant::Info => "info",
        }
    }
}

// ============================================================================
// ActionSpec
// ============================================================================

/// One button of the actions column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action name carried by the button
    pub action: String,

    /// Tooltip label
    pub label: String,

    /// Icon class
    pub icon: String,

    /// Colour variant
    pub variant: StyleVariant,
}

impl ActionSpec {
    /// Create an action button
    pub fn new(
        action: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        variant: StyleVariant,
    ) -> Self {
        Self {
            action: action.into(),
            label: label.into(),
            icon: icon.into(),
            variant,
        }
    }

    /// Standard edit button
    pub fn edit() -> Self {
        Self::new(ACTION_EDIT, "Edit", "fas fa-edit", StyleVariant::Primary)
    }

    /// Standard delete button
    pub fn delete() -> Self {
        Self::new(ACTION_DELETE, "Delete", "fas fa-trash-alt", StyleVariant::Danger)
    }

    /// Button opening the related viewer for `field`
    pub fn show(field: &str, label: &str, icon: &str, variant: StyleVariant) -> Self {
        Self::new(format!("{}{}", SHOW_PREFIX, field), format!("Show {}", label), icon, variant)
    }
}

// ============================================================================
// RowAction
// ============================================================================

/// A dispatched action name, resolved through the fixed action table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Open the edit form for the row
    Edit,
    /// Ask for delete confirmation
    Delete,
    /// Show the related records stored in the named field
    ShowRelated(String),
    /// Entity-specific extension
    Custom(String),
}

impl RowAction {
    /// Resolve an action name
    pub fn parse(action: &str) -> Self {
        match action {
            ACTION_EDIT => RowAction::Edit,
            ACTION_DELETE => RowAction::Delete,
            other => match other.strip_prefix(SHOW_PREFIX) {
                Some(field) if !field.is_empty() => RowAction::ShowRelated(field.to_string()),
                _ => RowAction::Custom(other.to_string()),
            },
        }
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
    fn test_parse_fixed_actions() {
        assert_eq!(RowAction::parse("edit"), RowAction::Edit);
        assert_eq!(RowAction::parse("delete"), RowAction::Delete);
        assert_eq!(
            RowAction::parse("show-warehouses"),
            RowAction::ShowRelated("warehouses".to_string())
        );
    }

    #[test]
    fn test_parse_custom_actions() {
        assert_eq!(RowAction::parse("show-"), RowAction::Custom("show-".to_string()));
        assert_eq!(
            RowAction::parse("reset-password"),
            RowAction::Custom("reset-password".to_string())
        );
    }

    #[test]
    fn test_show_button() {
        let action =
            ActionSpec::show("roles", "Roles", "fas fa-user-shield", StyleVariant::Success);
        assert_eq!(action.action, "show-roles");
        assert_eq!(action.label, "Show Roles");
        assert_eq!(action.variant.as_str(), "success");
    }
}
