//! Entity grid lifecycle controller
//!
//! One [`GridController`] per entity type wires a [`CollectionSource`] to the
//! widgets of that type. It owns the add/edit/delete state machine:
//!
//! - `Idle → Adding` on [`GridController::open_add`]
//! - `Idle → Editing` on [`GridController::open_edit`]
//! - `Adding | Editing → Idle` on a successful save or on cancel
//! - `Idle → ConfirmingDelete` on [`GridController::request_delete`]
//! - `ConfirmingDelete → Idle` after the delete (whatever its outcome) or on
//!   dismiss
//!
//! Opening a session while another is open replaces it. After every write the
//! grid is reconciled in place; a full reload only happens on [`load`] or when
//! the grid has to be rebuilt.
//!
//! [`load`]: GridController::load

use crate::bridge::SelectionBridge;
use crate::pending::{ControllerState, DeleteSession, FormMode, FormSession, PendingOperation};
use crate::widgets::{
    ConfirmWidget, FormWidget, GridWidget, ModalWidget, Notice, Notifier, RelatedViewer,
    RowTransaction, Widgets,
};
use gridkeeper_client::{ClientError, CollectionSource, NETWORK_ERROR_MESSAGE, OptionLoader};
use gridkeeper_core::{ConsoleResult, EntityRecord, Identifier, Validatable};
use gridkeeper_schema::column::looks_like_relation;
use gridkeeper_schema::{
    ActionEffect, CatalogEntry, EntityDescriptor, EntityHooks, OperationType, PickerValues,
    RowAction, blank_inputs, build_payload, picker_selection, populate_inputs,
    synthesize_columns,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Primary button label of the edit form
pub const SAVE_CHANGES_LABEL: &str = "Save Changes";

// ============================================================================
// Options
// ============================================================================

/// What happens to the edit form when the server rejects an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateFailurePolicy {
    /// Close the form and drop the session; the operator has to reopen it
    #[default]
    Close,
    /// Keep the form open with the operator's input for another attempt
    KeepOpen,
}

/// Result of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran and the grid/widgets reflect it
    Applied,
    /// Client-side validation refused the input; nothing was sent
    Invalid,
    /// The request failed or the server rejected it
    Failed,
    /// A prerequisite was missing; nothing happened
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

// ============================================================================
// GridController
// ============================================================================

/// Generic lifecycle controller of one entity type
pub struct GridController {
    descriptor: EntityDescriptor,
    hooks: Arc<dyn EntityHooks>,
    source: Arc<dyn CollectionSource>,
    options: OptionLoader,
    grid: Box<dyn GridWidget>,
    form: Box<dyn FormWidget>,
    modal: Box<dyn ModalWidget>,
    confirm: Box<dyn ConfirmWidget>,
    viewer: Box<dyn RelatedViewer>,
    notifier: Box<dyn Notifier>,
    bridge: SelectionBridge,
    pending: Option<PendingOperation>,
    update_failure: UpdateFailurePolicy,
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("entity", &self.descriptor.key)
            .field("state", &self.state())
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}

impl GridController {
    /// Create a controller; the descriptor must be valid
    pub fn new(
        descriptor: EntityDescriptor,
        hooks: Arc<dyn EntityHooks>,
        source: Arc<dyn CollectionSource>,
        widgets: Widgets,
    ) -> ConsoleResult<Self> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            hooks,
            source,
            options: OptionLoader::new(),
            grid: widgets.grid,
            form: widgets.form,
            modal: widgets.modal,
            confirm: widgets.confirm,
            viewer: widgets.viewer,
            notifier: widgets.notifier,
            bridge: SelectionBridge::new(widgets.pickers),
            pending: None,
            update_failure: UpdateFailurePolicy::default(),
        })
    }

    /// Create a controller from a catalog entry
    pub fn for_entry(
        entry: &CatalogEntry,
        source: Arc<dyn CollectionSource>,
        widgets: Widgets,
    ) -> ConsoleResult<Self> {
        Self::new(entry.descriptor.clone(), entry.hooks.clone(), source, widgets)
    }

    /// Use these collections for picker options
    pub fn with_option_loader(mut self, options: OptionLoader) -> Self {
        self.options = options;
        self
    }

    /// Set the update failure policy
    pub fn with_update_failure(mut self, policy: UpdateFailurePolicy) -> Self {
        self.update_failure = policy;
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    /// Current lifecycle state
    pub fn state(&self) -> ControllerState {
        ControllerState::of(self.pending.as_ref())
    }

    /// The open session, if any
    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    /// Current data of a displayed row
    pub fn row(&self, identifier: &Identifier) -> Option<EntityRecord> {
        self.grid.row(identifier)
    }

    /// Identifier of the displayed row matching operator input
    ///
    /// All-digit input matches a numeric identifier first, then a natural key
    /// spelled the same way.
    pub fn find_row(&self, input: &str) -> Option<Identifier> {
        let numeric = Identifier::parse(input);
        let textual = Identifier::Key(input.trim().to_string());
        [numeric, textual]
            .into_iter()
            .find(|identifier| self.grid.row(identifier).is_some())
    }

    /// Number of live picker widgets
    pub fn live_pickers(&self) -> usize {
        self.bridge.live_count()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch the collection and rebuild the grid
    pub async fn load(&mut self) -> Outcome {
        match self.source.list().await {
            Ok(records) => {
                tracing::info!("Loaded {} {} record(s)", records.len(), self.descriptor.name);
                self.rebuild(records);
                Outcome::Applied
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.descriptor.name, e);
                self.notify_failure(&e, &format!("Failed to load {}: ", self.descriptor.name));
                Outcome::Failed
            }
        }
    }

    /// (Re)initialize the grid from a full collection
    ///
    /// An empty collection yields a grid without columns, which forces the
    /// next create to rebuild rather than append.
    fn rebuild(&mut self, records: Vec<EntityRecord>) {
        let columns = match records.first() {
            Some(first) => {
                for field in first.field_names() {
                    let undeclared = !self.descriptor.is_relation(field)
                        && first.get(field).is_some_and(looks_like_relation);
                    if undeclared {
                        tracing::debug!(
                            "{} field '{}' holds sub-records but is not a declared relation",
                            self.descriptor.name,
                            field
                        );
                    }
                }
                synthesize_columns(&self.descriptor, self.hooks.as_ref(), first)
            }
            None => Vec::new(),
        };
        tracing::debug!(
            "Building {} grid: {} column(s), {} row(s)",
            self.descriptor.name,
            columns.len(),
            records.len()
        );
        self.grid.initialize(&self.descriptor.id_field, columns, records);
    }

    // ========================================================================
    // Form sessions
    // ========================================================================

    /// Open the empty form for a new record
    pub async fn open_add(&mut self) -> Outcome {
        if !self.descriptor.supports(OperationType::Create) {
            tracing::warn!("{} has no create endpoint", self.descriptor.name);
            return Outcome::Ignored;
        }

        let pending = PendingOperation::add();
        tracing::debug!("Opening add form for {} ({})", self.descriptor.name, pending.session());
        self.replace_pending(pending);

        self.form.reset(blank_inputs(&self.descriptor));
        self.populate_pickers(None).await;
        self.modal.show(&self.descriptor.add_title(), &self.descriptor.add_label());
        Outcome::Applied
    }

    /// Open the form filled from a displayed row
    pub async fn open_edit(&mut self, identifier: &Identifier) -> Outcome {
        if !self.descriptor.supports(OperationType::Update) {
            tracing::warn!("{} has no update endpoint", self.descriptor.name);
            return Outcome::Ignored;
        }
        let Some(row) = self.grid.row(identifier) else {
            tracing::warn!("No {} row '{}' to edit", self.descriptor.name, identifier);
            return Outcome::Ignored;
        };

        let pending = PendingOperation::edit(identifier.clone(), row.clone());
        tracing::debug!(
            "Opening edit form for {} '{}' ({})",
            self.descriptor.name,
            identifier,
            pending.session()
        );
        self.replace_pending(pending);

        self.form.write(populate_inputs(&self.descriptor, &row));
        self.populate_pickers(Some(&row)).await;
        self.modal.show(&self.descriptor.edit_title(), SAVE_CHANGES_LABEL);
        Outcome::Applied
    }

    /// Submit the open form
    pub async fn save(&mut self) -> Outcome {
        let session = match &self.pending {
            Some(PendingOperation::Form(session)) => session.clone(),
            _ => {
                tracing::debug!("Save pressed without an open {} form", self.descriptor.name);
                return Outcome::Ignored;
            }
        };
        match session.mode {
            FormMode::Add => self.create(session).await,
            FormMode::Edit => self.update(session).await,
        }
    }

    /// Close the open form without saving
    pub fn cancel_form(&mut self) {
        if matches!(self.pending, Some(PendingOperation::Form(_))) {
            tracing::debug!("Cancelled {} form", self.descriptor.name);
            self.close_form();
        }
    }

    async fn create(&mut self, session: FormSession) -> Outcome {
        let Some(payload) = self.validated_payload(false) else {
            return Outcome::Invalid;
        };

        match self.source.create(&payload).await {
            Ok(mut record) => {
                self.hooks.initialize_new_record(&self.descriptor, &mut record);
                tracing::info!(
                    "Created {} {:?} ({})",
                    self.descriptor.name,
                    record.identifier(&self.descriptor.id_field),
                    session.session
                );

                if !self.grid.is_created() {
                    tracing::warn!(
                        "{} grid does not exist, reloading instead of adding the row",
                        self.descriptor.name
                    );
                    self.close_form();
                    self.load().await;
                    return Outcome::Applied;
                }

                if self.grid.column_count() == 0 {
                    self.rebuild(vec![record]);
                } else {
                    self.grid.apply(RowTransaction::add(record));
                }
                self.close_form();
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(
                    "Create {} failed ({}): {}",
                    self.descriptor.name,
                    session.session,
                    e
                );
                self.notify_failure(&e, &format!("Failed to create {}: ", self.descriptor.name));
                Outcome::Failed
            }
        }
    }

    async fn update(&mut self, session: FormSession) -> Outcome {
        let (Some(identifier), Some(original)) = (session.identifier, session.original) else {
            tracing::warn!("Edit session {} lost its row", session.session);
            self.close_form();
            return Outcome::Ignored;
        };
        let Some(payload) = self.validated_payload(true) else {
            return Outcome::Invalid;
        };

        match self.source.update(&identifier, &payload).await {
            Ok(response) => {
                let mut submitted = EntityRecord::new();
                for field in self.descriptor.fields.iter().filter(|f| !f.is_secret()) {
                    if let Some(value) = payload.get(&field.name) {
                        submitted.insert(field.name.as_str(), value.clone());
                    }
                }
                let mut updated = original.merged_with(&submitted).merged_with(&response);
                self.hooks
                    .preserve_fields_on_update(&self.descriptor, &mut updated, &original);

                self.grid.apply(RowTransaction::update(identifier.clone(), updated));
                tracing::info!(
                    "Updated {} '{}' ({})",
                    self.descriptor.name,
                    identifier,
                    session.session
                );
                self.close_form();
                Outcome::Applied
            }
            Err(e) => {
                self.notify_failure(&e, &format!("Failed to update {}: ", self.descriptor.name));
                match self.update_failure {
                    UpdateFailurePolicy::Close => {
                        tracing::warn!(
                            "Update of {} '{}' rejected, closing the form ({}): {}",
                            self.descriptor.name,
                            identifier,
                            session.session,
                            e
                        );
                        self.close_form();
                    }
                    UpdateFailurePolicy::KeepOpen => {
                        tracing::warn!(
                            "Update of {} '{}' rejected, keeping the form open ({}): {}",
                            self.descriptor.name,
                            identifier,
                            session.session,
                            e
                        );
                    }
                }
                Outcome::Failed
            }
        }
    }

    /// Read the form and pickers, build the payload and validate it
    ///
    /// Failures are shown as a warning; `None` means nothing may be sent.
    fn validated_payload(&mut self, is_edit: bool) -> Option<EntityRecord> {
        let values = self.form.read();
        let pickers: PickerValues = self.bridge.values();
        let checked = build_payload(&self.descriptor, &values, &pickers).and_then(|payload| {
            self.hooks
                .validate(&self.descriptor, &payload, is_edit)
                .map(|_| payload)
        });
        match checked {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("{} form rejected: {}", self.descriptor.name, e);
                let text = match e {
                    gridkeeper_core::ConsoleError::Validation(message) => message,
                    other => other.to_string(),
                };
                self.notifier.notify(Notice::warning(text));
                None
            }
        }
    }

    /// Load picker options and (re)create the picker widgets
    ///
    /// A failed fetch leaves the form without pickers.
    async fn populate_pickers(&mut self, row: Option<&EntityRecord>) {
        self.bridge.destroy_all();
        if self.descriptor.pickers.is_empty() {
            return;
        }

        let sources = self.descriptor.picker_sources();
        match self.options.load(&sources).await {
            Ok(sets) => {
                self.bridge.build(&self.descriptor.pickers, &sets);
                if let Some(row) = row {
                    for picker in &self.descriptor.pickers {
                        self.bridge.set_value(&picker.name, picker_selection(picker, row));
                    }
                }
            }
            Err(e) => {
                tracing::error!(
                    "Picker options for {} unavailable, opening form without them: {}",
                    self.descriptor.name,
                    e
                );
            }
        }
    }

    fn close_form(&mut self) {
        self.bridge.destroy_all();
        self.form.reset(blank_inputs(&self.descriptor));
        self.modal.hide();
        self.pending = None;
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Ask for confirmation before deleting a displayed row
    pub fn request_delete(&mut self, identifier: &Identifier) -> Outcome {
        if !self.descriptor.supports(OperationType::Delete) {
            tracing::warn!("{} has no delete endpoint", self.descriptor.name);
            return Outcome::Ignored;
        }
        if self.grid.row(identifier).is_none() {
            tracing::warn!("No {} row '{}' to delete", self.descriptor.name, identifier);
            return Outcome::Ignored;
        }

        let pending = PendingOperation::delete(identifier.clone());
        tracing::debug!(
            "Confirming delete of {} '{}' ({})",
            self.descriptor.name,
            identifier,
            pending.session()
        );
        self.replace_pending(pending);
        self.confirm.ask(&format!(
            "Are you sure you want to delete this {}?",
            self.descriptor.name.to_lowercase()
        ));
        Outcome::Applied
    }

    /// Delete the row awaiting confirmation
    ///
    /// The confirmation stays open until the request resolves.
    pub async fn confirm_delete(&mut self) -> Outcome {
        let DeleteSession {
            session,
            identifier,
        } = match &self.pending {
            Some(PendingOperation::Delete(delete)) => delete.clone(),
            _ => {
                tracing::debug!(
                    "Delete confirmed without a pending {} delete",
                    self.descriptor.name
                );
                return Outcome::Ignored;
            }
        };

        let result = self.source.delete(&identifier).await;
        self.confirm.hide();
        self.pending = None;

        match result {
            Ok(()) => {
                self.grid.apply(RowTransaction::remove(identifier.clone()));
                tracing::info!("Deleted {} '{}' ({})", self.descriptor.name, identifier, session);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(
                    "Delete of {} '{}' failed ({}): {}",
                    self.descriptor.name,
                    identifier,
                    session,
                    e
                );
                self.notify_failure(&e, "Delete failed: ");
                Outcome::Failed
            }
        }
    }

    /// Close the confirmation without deleting
    pub fn dismiss_delete(&mut self) {
        if matches!(self.pending, Some(PendingOperation::Delete(_))) {
            self.pending = None;
            self.confirm.hide();
        }
    }

    // ========================================================================
    // Row actions
    // ========================================================================

    /// Run a row action by name
    pub async fn dispatch(&mut self, action: &str, identifier: &Identifier) -> Outcome {
        if self.descriptor.action(action).is_none() {
            tracing::warn!("{} offers no '{}' action", self.descriptor.name, action);
            return Outcome::Ignored;
        }
        match RowAction::parse(action) {
            RowAction::Edit => self.open_edit(identifier).await,
            RowAction::Delete => self.request_delete(identifier),
            RowAction::ShowRelated(field) if self.descriptor.is_relation(&field) => {
                self.show_related(identifier, &field)
            }
            RowAction::ShowRelated(_) | RowAction::Custom(_) => {
                self.custom_action(action, identifier)
            }
        }
    }

    /// Show the related records stored in a row's relation field
    pub fn show_related(&mut self, identifier: &Identifier, field: &str) -> Outcome {
        let Some(relation) = self.descriptor.relation(field) else {
            tracing::warn!("{} has no relation '{}'", self.descriptor.name, field);
            return Outcome::Ignored;
        };
        let Some(row) = self.grid.row(identifier) else {
            tracing::warn!("No {} row '{}'", self.descriptor.name, identifier);
            return Outcome::Ignored;
        };
        let listing = relation.listing(row.array(field).unwrap_or_default());
        self.viewer.show(listing);
        Outcome::Applied
    }

    fn custom_action(&mut self, action: &str, identifier: &Identifier) -> Outcome {
        let Some(row) = self.grid.row(identifier) else {
            tracing::warn!("No {} row '{}'", self.descriptor.name, identifier);
            return Outcome::Ignored;
        };
        match self.hooks.custom_action(&self.descriptor, action, &row) {
            Some(ActionEffect::ShowRelated(listing)) => self.viewer.show(listing),
            Some(ActionEffect::Notify(text)) => self.notifier.notify(Notice::info(text)),
            None => {
                tracing::warn!("No handler for {} action '{}'", self.descriptor.name, action);
                return Outcome::Ignored;
            }
        }
        Outcome::Applied
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn replace_pending(&mut self, pending: PendingOperation) {
        if let Some(stale) = self.pending.take() {
            tracing::warn!(
                "Discarding stale {:?} session {} of {}",
                stale.state(),
                stale.session(),
                self.descriptor.name
            );
            match stale {
                PendingOperation::Form(_) => {
                    self.bridge.destroy_all();
                    self.modal.hide();
                }
                PendingOperation::Delete(_) => self.confirm.hide(),
            }
        }
        self.pending = Some(pending);
    }

    fn notify_failure(&mut self, error: &ClientError, prefix: &str) {
        let text = match error {
            ClientError::Rejected { .. } => format!("{}{}", prefix, error.user_message()),
            _ if error.is_transport() => NETWORK_ERROR_MESSAGE.to_string(),
            other => format!("{}{}", prefix, other.user_message()),
        };
        self.notifier.notify(Notice::error(text));
    }
}

// ============================================================================
// Tests
// ============================================================================
