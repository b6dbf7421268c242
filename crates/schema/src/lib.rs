//! # Gridkeeper Schema
//!
//! Static declarations of the entity types the console manages and the pure
//! functions derived from them.
//!
//! ## Core Concepts
//!
//! - **EntityDescriptor**: endpoints, form, pickers, relations and row actions
//!   of one entity type
//! - **EntityHooks**: entity-specific behaviour the generic controller calls
//!   into (custom columns and actions, validation, update preservation)
//! - **ColumnDefinition**: grid columns, synthesized from the first record
//! - **Catalog**: the built-in set of entity types
//!

// Module declarations
pub mod action;
pub mod catalog;
pub mod column;
pub mod endpoint;
pub mod entity;
pub mod field;
pub mod form;
pub mod hooks;
pub mod relationship;

// Re-export commonly used types at crate root
pub use action::{ActionSpec, RowAction, StyleVariant};
pub use catalog::{Catalog, CatalogEntry};
pub use column::{Cell, ColumnDefinition, ColumnKind, header_for, synthesize_columns};
pub use endpoint::{Endpoints, ID_PLACEHOLDER, OperationType};
pub use entity::{EntityDescriptor, FormElements};
pub use field::{FieldInput, FormField, PayloadKind, PickerSpec, Requirement};
pub use form::{
    FormInput, FormValues, PickerOption, PickerValues, blank_inputs, build_payload,
    picker_options, picker_selection, populate_inputs, validate_required,
};
pub use hooks::{ActionEffect, DefaultHooks, EntityHooks, UserHooks};
pub use relationship::{RelatedItem, RelatedListing, RelationDisplay, RelationSpec};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
