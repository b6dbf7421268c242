//! Widget capability contracts
//!
//! The controller never renders anything itself. It drives a grid, a form,
//! a modal, the shared delete confirmation, the shared related viewer, a
//! notifier and a picker factory through these traits.

use gridkeeper_core::{EntityRecord, Identifier};
use gridkeeper_schema::{ColumnDefinition, FormValues, PickerOption, PickerSpec, RelatedListing};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Notices
// ============================================================================

/// Notice severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.text)
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Incremental change to the displayed rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTransaction {
    /// Rows appended at the end
    pub add: Vec<EntityRecord>,

    /// Rows replaced wholesale, located by their identifier before the edit
    pub update: Vec<(Identifier, EntityRecord)>,

    /// Rows removed
    pub remove: Vec<Identifier>,
}

impl RowTransaction {
    pub fn add(record: EntityRecord) -> Self {
        Self {
            add: vec![record],
            ..Self::default()
        }
    }

    pub fn update(identifier: Identifier, record: EntityRecord) -> Self {
        Self {
            update: vec![(identifier, record)],
            ..Self::default()
        }
    }

    pub fn remove(identifier: Identifier) -> Self {
        Self {
            remove: vec![identifier],
            ..Self::default()
        }
    }
}

/// Interactive table
pub trait GridWidget {
    /// (Re)create the grid; rows are keyed by `id_field`
    fn initialize(
        &mut self,
        id_field: &str,
        columns: Vec<ColumnDefinition>,
        rows: Vec<EntityRecord>,
    );

    /// Whether an instance exists
    fn is_created(&self) -> bool;

    /// Number of columns, actions column included
    fn column_count(&self) -> usize;

    /// Number of data rows
    fn row_count(&self) -> usize;

    /// Current data of a row
    fn row(&self, identifier: &Identifier) -> Option<EntityRecord>;

    /// Apply an incremental change
    fn apply(&mut self, transaction: RowTransaction);

    /// Tear the instance down
    fn destroy(&mut self);
}

// ============================================================================
// Form, modal and dialogs
// ============================================================================

/// The entity type's create/edit form
pub trait FormWidget {
    fn read(&self) -> FormValues;
    fn write(&mut self, values: FormValues);
    fn reset(&mut self, blank: FormValues);
}

/// The modal wrapping the form
pub trait ModalWidget {
    fn show(&mut self, title: &str, primary_label: &str);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// The shared delete confirmation
pub trait ConfirmWidget {
    fn ask(&mut self, message: &str);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// The shared related-entities viewer
pub trait RelatedViewer {
    fn show(&mut self, listing: RelatedListing);
}

/// Where user-visible messages go
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

// ============================================================================
// Pickers
// ============================================================================

/// One live searchable multi-select
pub trait PickerWidget {
    fn get_value(&self) -> Vec<String>;
    fn set_value(&mut self, values: Vec<String>);
    fn clear(&mut self);
    fn destroy(&mut self);
}

/// Creates picker widgets bound to a picker declaration's element
pub trait PickerFactory {
    fn create(&mut self, spec: &PickerSpec, options: Vec<PickerOption>) -> Box<dyn PickerWidget>;
}

// ============================================================================
// Widgets
// ============================================================================

/// Everything one controller drives
pub struct Widgets {
    pub grid: Box<dyn GridWidget>,
    pub form: Box<dyn FormWidget>,
    pub modal: Box<dyn ModalWidget>,
    pub confirm: Box<dyn ConfirmWidget>,
    pub viewer: Box<dyn RelatedViewer>,
    pub notifier: Box<dyn Notifier>,
    pub pickers: Box<dyn PickerFactory>,
}

impl fmt::Debug for Widgets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widgets")
            .field("grid_created", &self.grid.is_created())
            .field("modal_visible", &self.modal.is_visible())
            .finish_non_exhaustive()
    }
}
