//! Endpoint definitions for an entity type
//!
//! Every entity type talks to up to four REST endpoints. The list endpoint is
//! mandatory; the write endpoints may be absent for read-only entity types.
//! Update and delete are URL templates carrying an `{id}` placeholder.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the record identifier
pub const ID_PLACEHOLDER: &str = "{id}";

// ============================================================================
// OperationType
// ============================================================================

/// The four collection operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// `GET <list-url>`
    List,
    /// `POST <create-url>`
    Create,
    /// `PUT <update-url>`
    Update,
    /// `DELETE <delete-url>`
    Delete,
}

impl OperationType {
    /// HTTP method used by the operation
    pub fn http_method(&self) -> &'static str {
        match self {
            OperationType::List => "GET",
            OperationType::Create => "POST",
            OperationType::Update => "PUT",
            OperationType::Delete => "DELETE",
        }
    }

    /// Lower-case display name
    pub fn display_name(&self) -> &'static str {
        match self {
            OperationType::List => "list",
            OperationType::Create => "create",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Endpoint set of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Collection URL (`GET`)
    pub list: String,

    /// Create URL (`POST`), absent for read-only types
    pub create: Option<String>,

    /// Update URL template (`PUT`), absent for read-only types
    pub update: Option<String>,

    /// Delete URL template (`DELETE`), absent for read-only types
    pub delete: Option<String>,
}

impl Endpoints {
    /// Full CRUD set rooted at a collection path ending in `/`
    ///
    /// `"/users_and_permissions/userroles/"` yields
    /// `"/users_and_permissions/userroles/{id}"` for update and delete.
    pub fn crud(collection: impl Into<String>) -> Self {
        let collection = collection.into();
        let item = format!("{}{}", ensure_trailing_slash(&collection), ID_PLACEHOLDER);
        Self {
            list: collection.clone(),
            create: Some(collection),
            update: Some(item.clone()),
            delete: Some(item),
        }
    }

    /// List-only endpoint set
    pub fn read_only(list: impl Into<String>) -> Self {
        Self {
            list: list.into(),
            create: None,
            update: None,
            delete: None,
        }
    }

    /// Remove the delete endpoint
    pub fn without_delete(mut self) -> Self {
        self.delete = None;
        self
    }

    /// Template for an operation, if the entity type supports it
    pub fn template(&self, op: OperationType) -> Option<&str> {
        match op {
            OperationType::List => Some(self.list.as_str()),
            OperationType::Create => self.create.as_deref(),
            OperationType::Update => self.update.as_deref(),
            OperationType::Delete => self.delete.as_deref(),
        }
    }

    /// Whether the operation is available
    pub fn supports(&self, op: OperationType) -> bool {
        self.template(op).is_some()
    }

    /// Whether no write operation is available
    pub fn is_read_only(&self) -> bool {
        self.create.is_none() && self.update.is_none() && self.delete.is_none()
    }
}

fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
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
    fn test_crud_endpoints() {
        let endpoints = Endpoints::crud("/users_and_permissions/userroles/");
        assert_eq!(endpoints.list, "/users_and_permissions/userroles/");
        assert_eq!(
            endpoints.update.as_deref(),
            Some("/users_and_permissions/userroles/{id}")
        );
        assert!(endpoints.supports(OperationType::Delete));
        assert!(!endpoints.is_read_only());
    }

    #[test]
    fn test_crud_adds_missing_slash() {
        let endpoints = Endpoints::crud("/api/divisions");
        assert_eq!(endpoints.delete.as_deref(), Some("/api/divisions/{id}"));
    }

    #[test]
    fn test_read_only_endpoints() {
        let endpoints = Endpoints::read_only("/users_and_permissions/modules/");
        assert!(endpoints.is_read_only());
        assert!(endpoints.supports(OperationType::List));
        assert!(!endpoints.supports(OperationType::Create));
        assert_eq!(endpoints.template(OperationType::Update), None);
    }

    #[test]
    fn test_operation_methods() {
        assert_eq!(OperationType::Update.http_method(), "PUT");
        assert_eq!(OperationType::Delete.display_name(), "delete");
    }
}
