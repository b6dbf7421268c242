//! # Gridkeeper Grid
//!
//! The generic lifecycle controller behind every entity grid of the console.
//!
//! - [`GridController`]: load, add, edit, delete and row actions of one entity
//!   type, with in-place reconciliation of the displayed rows
//! - [`SelectionBridge`]: the picker widgets of the open form
//! - [`NavigationShell`]: panel switching with lazy loading
//! - [`widgets`]: capability traits the controller drives; [`headless`]
//!   provides in-memory implementations
//!

pub mod bridge;
pub mod controller;
pub mod headless;
pub mod pending;
pub mod shell;
pub mod widgets;

pub use bridge::SelectionBridge;
pub use controller::{GridController, Outcome, SAVE_CHANGES_LABEL, UpdateFailurePolicy};
pub use headless::HeadlessWidgets;
pub use pending::{ControllerState, DeleteSession, FormMode, FormSession, PendingOperation};
pub use shell::{NavigationShell, Panel};
pub use widgets::{
    ConfirmWidget, FormWidget, GridWidget, ModalWidget, Notice, NoticeLevel, Notifier,
    PickerFactory, PickerWidget, RelatedViewer, RowTransaction, Widgets,
};
