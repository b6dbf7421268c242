//! Pending operation bookkeeping
//!
//! A controller tracks at most one open session: a form (add or edit) or a
//! delete confirmation. Opening a new session replaces the previous one.

use gridkeeper_core::{EntityRecord, Identifier};
use uuid::Uuid;

/// Mode of an open form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// An open add/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    /// Correlates log lines of the session
    pub session: Uuid,
    pub mode: FormMode,
    /// Identifier of the edited row
    pub identifier: Option<Identifier>,
    /// Row data when the edit started
    pub original: Option<EntityRecord>,
}

/// An open delete confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSession {
    pub session: Uuid,
    /// Identifier of the row to delete
    pub identifier: Identifier,
}

/// The single in-flight session of a controller
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOperation {
    Form(FormSession),
    Delete(DeleteSession),
}

impl PendingOperation {
    /// New add session
    pub fn add() -> Self {
        PendingOperation::Form(FormSession {
            session: Uuid::new_v4(),
            mode: FormMode::Add,
            identifier: None,
            original: None,
        })
    }

    /// New edit session over a row snapshot
    pub fn edit(identifier: Identifier, original: EntityRecord) -> Self {
        PendingOperation::Form(FormSession {
            session: Uuid::new_v4(),
            mode: FormMode::Edit,
            identifier: Some(identifier),
            original: Some(original),
        })
    }

    /// New delete confirmation
    pub fn delete(identifier: Identifier) -> Self {
        PendingOperation::Delete(DeleteSession {
            session: Uuid::new_v4(),
            identifier,
        })
    }

    /// Session id
    pub fn session(&self) -> Uuid {
        match self {
            PendingOperation::Form(form) => form.session,
            PendingOperation::Delete(delete) => delete.session,
        }
    }

    /// Controller state this session corresponds to
    pub fn state(&self) -> ControllerState {
        match self {
            PendingOperation::Form(form) => match form.mode {
                FormMode::Add => ControllerState::Adding,
                FormMode::Edit => ControllerState::Editing,
            },
            PendingOperation::Delete(_) => ControllerState::ConfirmingDelete,
        }
    }
}

/// Lifecycle state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Adding,
    Editing,
    ConfirmingDelete,
}

impl ControllerState {
    /// State of an optional pending operation
    pub fn of(pending: Option<&PendingOperation>) -> Self {
        pending.map(PendingOperation::state).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
