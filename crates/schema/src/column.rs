//! Column synthesis
//!
//! Column definitions are never stored. They are derived from the first
//! record each time a grid is (re)built: preferred fields first in declared
//! order, the remaining fields in record order, and the actions column last.

use crate::action::ActionSpec;
use crate::entity::EntityDescriptor;
use crate::hooks::EntityHooks;
use crate::relationship::RelationSpec;
use gridkeeper_core::{EntityRecord, display_scalar};
use serde_json::Value;
use std::fmt;

/// Boolean field rendered as a status badge
pub const STATUS_FIELD: &str = "is_active";

/// Pseudo-field of the actions column
pub const ACTIONS_FIELD: &str = "actions";

/// Maximum width of the identifier column
const IDENTIFIER_MAX_WIDTH: u32 = 75;

/// Minimum width of the status column
const STATUS_MIN_WIDTH: u32 = 100;

/// Width reserved per action button
const ACTION_BUTTON_WIDTH: u32 = 50;

// ============================================================================
// ColumnKind
// ============================================================================

/// How a column renders its cells
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Narrow identifier column
    Identifier,
    /// Coloured glyph plus Active/Inactive text
    Status,
    /// Relationship field rendered through its declaration
    Relation(RelationSpec),
    /// Plain scalar rendering
    Plain,
    /// Trailing button group
    Actions(Vec<ActionSpec>),
}

// ============================================================================
// ColumnDefinition
// ============================================================================

/// One grid column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Record field the column reads
    pub field: String,

    /// Header text
    pub header: String,

    /// Rendering
    pub kind: ColumnKind,

    /// Whether the column is sortable
    pub sortable: bool,

    /// Whether the column offers a filter
    pub filterable: bool,

    /// Whether the column starts hidden
    pub hidden: bool,

    /// Minimum width in pixels
    pub min_width: Option<u32>,

    /// Maximum width in pixels
    pub max_width: Option<u32>,
}

impl ColumnDefinition {
    /// Default sortable, filterable column
    pub fn plain(field: &str) -> Self {
        Self {
            field: field.to_string(),
            header: header_for(field),
            kind: ColumnKind::Plain,
            sortable: true,
            filterable: true,
            hidden: false,
            min_width: None,
            max_width: None,
        }
    }

    /// Narrow, non-filterable identifier column
    pub fn identifier(field: &str) -> Self {
        Self {
            kind: ColumnKind::Identifier,
            filterable: false,
            max_width: Some(IDENTIFIER_MAX_WIDTH),
            ..Self::plain(field)
        }
    }

    /// Status badge column
    pub fn status(field: &str) -> Self {
        Self {
            header: "STATUS".to_string(),
            kind: ColumnKind::Status,
            filterable: false,
            min_width: Some(STATUS_MIN_WIDTH),
            ..Self::plain(field)
        }
    }

    /// Relationship column
    pub fn relation(spec: &RelationSpec) -> Self {
        Self {
            header: spec.header(),
            kind: ColumnKind::Relation(spec.clone()),
            filterable: false,
            hidden: spec.hidden,
            ..Self::plain(&spec.field)
        }
    }

    /// Trailing actions column
    pub fn actions(actions: &[ActionSpec]) -> Self {
        Self {
            field: ACTIONS_FIELD.to_string(),
            header: "Actions".to_string(),
            kind: ColumnKind::Actions(actions.to_vec()),
            sortable: false,
            filterable: false,
            hidden: false,
            min_width: Some(actions.len() as u32 * ACTION_BUTTON_WIDTH),
            max_width: None,
        }
    }

    /// Override the header
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Start hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether this is the actions column
    pub fn is_actions(&self) -> bool {
        matches!(self.kind, ColumnKind::Actions(_))
    }

    /// Render the cell for a record
    pub fn render(&self, record: &EntityRecord) -> Cell {
        match &self.kind {
            ColumnKind::Status => Cell::Status(record.flag(&self.field)),
            ColumnKind::Relation(spec) => Cell::Text(spec.cell_text(record.get(&self.field))),
            ColumnKind::Actions(actions) => {
                Cell::Actions(actions.iter().map(|a| a.action.clone()).collect())
            }
            ColumnKind::Identifier | ColumnKind::Plain => Cell::Text(
                record
                    .get(&self.field)
                    .map(display_scalar)
                    .unwrap_or_default(),
            ),
        }
    }
}

// ============================================================================
// Cell
// ============================================================================

/// Rendered content of one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Status(bool),
    Actions(Vec<String>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Status(true) => f.write_str("✔ Active"),
            Cell::Status(false) => f.write_str("✖ Inactive"),
            Cell::Actions(actions) => f.write_str(&actions.join(" | ")),
        }
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Header text for a field: underscores become spaces, upper-cased
pub fn header_for(field: &str) -> String {
    field.replace('_', " ").to_uppercase()
}

/// Column definition for a single field
///
/// Entity-specific overrides win; then relationship fields, the status
/// field and the identifier field get their fixed renderings; anything else
/// is a plain column.
pub fn column_for(
    descriptor: &EntityDescriptor,
    hooks: &dyn EntityHooks,
    field: &str,
) -> ColumnDefinition {
    if let Some(custom) = hooks.custom_column(descriptor, field) {
        return custom;
    }
    if let Some(relation) = descriptor.relation(field) {
        return ColumnDefinition::relation(relation);
    }
    if field == STATUS_FIELD {
        return ColumnDefinition::status(field);
    }
    if field == descriptor.id_field {
        return ColumnDefinition::identifier(field);
    }
    ColumnDefinition::plain(field)
}

/// Derive the full column set from the first record of a collection
pub fn synthesize_columns(
    descriptor: &EntityDescriptor,
    hooks: &dyn EntityHooks,
    first: &EntityRecord,
) -> Vec<ColumnDefinition> {
    let preferred = descriptor
        .preferred_columns
        .iter()
        .map(String::as_str)
        .filter(|field| first.contains(field));
    let discovered = first
        .field_names()
        .filter(|field| !descriptor.preferred_columns.iter().any(|p| p == field));

    let mut columns: Vec<ColumnDefinition> = preferred
        .chain(discovered)
        .map(|field| column_for(descriptor, hooks, field))
        .collect();
    columns.push(ColumnDefinition::actions(&descriptor.actions));
    columns
}

/// Whether a JSON value looks like a relationship array
///
/// Only used to warn about undeclared relationship fields; rendering never
/// depends on it.
pub fn looks_like_relation(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.iter().all(Value::is_object))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::StyleVariant;
    use crate::endpoint::Endpoints;
    use crate::hooks::DefaultHooks;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tagged() -> EntityDescriptor {
        EntityDescriptor::new("things", "Thing", Endpoints::crud("/things/"))
            .with_relation(RelationSpec::new("tags", "Tags", "tag(s)"))
            .with_standard_actions()
    }

    fn first_record() -> EntityRecord {
        EntityRecord::new()
            .with("id", 1)
            .with("is_active", true)
            .with("name", "X")
            .with("tags", json!([{"label": "a"}, {"label": "b"}]))
    }

    #[test]
    fn test_column_synthesis_rules() {
        let columns = synthesize_columns(&tagged(), &DefaultHooks, &first_record());
        let fields: Vec<&str> = columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "is_active", "name", "tags", "actions"]);

        assert_eq!(columns[0].kind, ColumnKind::Identifier);
        assert!(!columns[0].filterable);
        assert_eq!(columns[0].max_width, Some(75));

        assert_eq!(columns[1].kind, ColumnKind::Status);
        assert_eq!(columns[1].header, "STATUS");

        assert_eq!(columns[2].kind, ColumnKind::Plain);
        assert!(columns[2].sortable && columns[2].filterable);
        assert_eq!(columns[2].header, "NAME");

        assert!(matches!(columns[3].kind, ColumnKind::Relation(_)));
        assert!(!columns[3].filterable);
        assert_eq!(columns[3].render(&first_record()), Cell::Text("2 tag(s)".into()));

        assert!(columns[4].is_actions());
        assert_eq!(columns.iter().filter(|c| c.is_actions()).count(), 1);
    }

    #[test]
    fn test_preferred_order_comes_first() {
        let descriptor = tagged().with_columns(&["name", "id", "missing"]);
        let columns = synthesize_columns(&descriptor, &DefaultHooks, &first_record());
        let fields: Vec<&str> = columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "id", "is_active", "tags", "actions"]);
    }

    #[test]
    fn test_actions_column_always_last() {
        let descriptor = EntityDescriptor::new("modules", "Module", Endpoints::read_only("/m/"));
        let first = EntityRecord::new().with("id", 1);
        let columns = synthesize_columns(&descriptor, &DefaultHooks, &first);
        assert_eq!(columns.len(), 2);
        assert!(columns.last().is_some_and(|c| c.is_actions()));
        assert_eq!(columns[1].min_width, Some(0));
    }

    #[test]
    fn test_header_for() {
        assert_eq!(header_for("skill_level"), "SKILL LEVEL");
        assert_eq!(header_for("code"), "CODE");
    }

    #[test]
    fn test_cell_rendering() {
        let record = first_record().with("note", json!(null));
        assert_eq!(ColumnDefinition::status("is_active").render(&record).to_string(), "✔ Active");
        assert_eq!(ColumnDefinition::plain("note").render(&record), Cell::Text(String::new()));
        assert_eq!(ColumnDefinition::plain("absent").render(&record), Cell::Text(String::new()));

        let actions = ColumnDefinition::actions(&[
            ActionSpec::edit(),
            ActionSpec::new("x", "X", "fa-x", StyleVariant::Info),
        ]);
        assert_eq!(actions.min_width, Some(100));
        assert_eq!(actions.render(&record).to_string(), "edit | x");
    }

    #[test]
    fn test_looks_like_relation() {
        assert!(looks_like_relation(&json!([{"id": 1}])));
        assert!(!looks_like_relation(&json!([1, 2])));
        assert!(!looks_like_relation(&json!("x")));
    }
}
