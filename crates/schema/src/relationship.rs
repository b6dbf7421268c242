//! Relationship fields and their display metadata
//!
//! A relationship field holds an array of sub-records embedded in a row (the
//! users that belong to a role, the warehouses of a location). Descriptors
//! enumerate these fields explicitly; the console never guesses from the
//! runtime shape of a value.

use gridkeeper_core::display_scalar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys tried, in order, when an item carries none of its declared title fields
const FALLBACK_TITLE_KEYS: &[&str] = &["name", "title", "code", "username", "id"];

// ============================================================================
// RelationDisplay
// ============================================================================

/// How a relationship column renders in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationDisplay {
    /// `"<n> <noun>"`, e.g. `"3 user(s)"`
    Count,
    /// Comma-joined sub-field of every item, `empty_text` when there are none
    Join { sub_field: String, empty_text: String },
}

// ============================================================================
// RelationSpec
// ============================================================================

/// A field whose value is an array of related sub-records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Record field name
    pub field: String,

    /// Display name of the relation (viewer title, column header)
    pub label: String,

    /// Noun used in count labels, e.g. `"user(s)"`
    pub noun: String,

    /// Grid rendering
    pub display: RelationDisplay,

    /// Whether the column starts hidden
    pub hidden: bool,

    /// Sub-fields joined by a space to form an item's title
    pub title_fields: Vec<String>,

    /// Sub-fields joined by `" – "` to form an item's detail line
    pub detail_fields: Vec<String>,
}

impl RelationSpec {
    /// Create a count-rendered relation
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        noun: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            noun: noun.into(),
            display: RelationDisplay::Count,
            hidden: false,
            title_fields: Vec::new(),
            detail_fields: Vec::new(),
        }
    }

    /// Relation of user records, rendered the way every "show users" list is
    pub fn users() -> Self {
        Self::new("users", "Users", "user(s)")
            .titled_by(&["name", "surname"])
            .detailed_by(&["email", "usertype"])
    }

    /// Render as a joined list of `sub_field` instead of a count
    pub fn joined(mut self, sub_field: &str, empty_text: &str) -> Self {
        self.display = RelationDisplay::Join {
            sub_field: sub_field.to_string(),
            empty_text: empty_text.to_string(),
        };
        self
    }

    /// Start with the column hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the title sub-fields
    pub fn titled_by(mut self, fields: &[&str]) -> Self {
        self.title_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Set the detail sub-fields
    pub fn detailed_by(mut self, fields: &[&str]) -> Self {
        self.detail_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Action name that opens the related viewer for this relation
    pub fn show_action(&self) -> String {
        format!("show-{}", self.field)
    }

    /// Column header text
    pub fn header(&self) -> String {
        self.label.to_uppercase()
    }

    /// Grid cell text for the given field value (missing counts as empty)
    pub fn cell_text(&self, value: Option<&Value>) -> String {
        let items: &[Value] = match value {
            Some(Value::Array(items)) => items,
            _ => &[],
        };
        match &self.display {
            RelationDisplay::Count => format!("{} {}", items.len(), self.noun),
            RelationDisplay::Join {
                sub_field,
                empty_text,
            } => {
                if items.is_empty() {
                    return empty_text.clone();
                }
                items
                    .iter()
                    .filter_map(|item| item.get(sub_field.as_str()).map(display_scalar))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    }

    /// Build the viewer content for the given related items
    pub fn listing(&self, items: &[Value]) -> RelatedListing {
        RelatedListing {
            title: format!("{} ({})", self.label, items.len()),
            items: items.iter().map(|item| self.item(item)).collect(),
            empty_text: format!("No {} assigned", self.label.to_lowercase()),
        }
    }

    fn item(&self, value: &Value) -> RelatedItem {
        let title = join_present(value, &self.title_fields, " ");
        let title = if title.is_empty() {
            fallback_title(value)
        } else {
            title
        };
        let detail = join_present(value, &self.detail_fields, " – ");
        RelatedItem {
            title,
            detail: (!detail.is_empty()).then_some(detail),
        }
    }
}

fn join_present(value: &Value, fields: &[String], separator: &str) -> String {
    fields
        .iter()
        .filter_map(|f| value.get(f.as_str()))
        .map(display_scalar)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn fallback_title(value: &Value) -> String {
    if !value.is_object() {
        return display_scalar(value);
    }
    FALLBACK_TITLE_KEYS
        .iter()
        .filter_map(|key| value.get(*key))
        .map(display_scalar)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "(unnamed)".to_string())
}

// ============================================================================
// RelatedListing
// ============================================================================

/// One line of the related-entities viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedItem {
    pub title: String,
    pub detail: Option<String>,
}

/// Content of the shared related-entities viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedListing {
    /// Relation name and count, e.g. `"Users (2)"`
    pub title: String,

    /// Items in server order
    pub items: Vec<RelatedItem>,

    /// Placeholder shown when `items` is empty
    pub empty_text: String,
}

impl RelatedListing {
    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain-text lines as a list renderer would show them
    pub fn lines(&self) -> Vec<String> {
        if self.items.is_empty() {
            return vec![self.empty_text.clone()];
        }
        self.items
            .iter()
            .map(|item| match &item.detail {
                Some(detail) => format!("{} ({})", item.title, detail),
                None => item.title.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_count_cell_text() {
        let relation = RelationSpec::users();
        assert_eq!(relation.cell_text(Some(&json!([{}, {}]))), "2 user(s)");
        assert_eq!(relation.cell_text(None), "0 user(s)");
        assert_eq!(relation.cell_text(Some(&json!(null))), "0 user(s)");
    }

    #[test]
    fn test_joined_cell_text() {
        let relation = RelationSpec::new("divisions", "Division(s)", "division(s)")
            .joined("code", "No divisions");
        assert_eq!(
            relation.cell_text(Some(&json!([{"code": "D1"}, {"code": "D2"}]))),
            "D1, D2"
        );
        assert_eq!(relation.cell_text(Some(&json!([]))), "No divisions");
    }

    #[test]
    fn test_listing_of_users() {
        let listing = RelationSpec::users().listing(&[json!({
            "name": "Jane",
            "surname": "Doe",
            "email": "jane@example.com",
            "usertype": "admin"
        })]);
        assert_eq!(listing.title, "Users (1)");
        assert_eq!(
            listing.items,
            vec![RelatedItem {
                title: "Jane Doe".to_string(),
                detail: Some("jane@example.com – admin".to_string()),
            }]
        );
    }

    #[test]
    fn test_empty_listing_has_placeholder() {
        let listing = RelationSpec::users().listing(&[]);
        assert_eq!(listing.title, "Users (0)");
        assert!(listing.is_empty());
        assert_eq!(listing.lines(), vec!["No users assigned".to_string()]);
    }

    #[test]
    fn test_unknown_shapes_omit_missing_fields() {
        let listing = RelationSpec::users().listing(&[
            json!({"username": "jdoe"}),
            json!({"name": "Solo"}),
            json!("plain"),
            json!({}),
        ]);
        let lines = listing.lines();
        assert_eq!(lines, vec!["jdoe", "Solo", "plain", "(unnamed)"]);
    }

    #[test]
    fn test_show_action_name() {
        assert_eq!(RelationSpec::users().show_action(), "show-users");
        assert_eq!(RelationSpec::users().header(), "USERS");
    }
}
