//! In-memory widget implementations
//!
//! Used by the command-line console and by tests. Every widget is a cheap
//! handle over shared state: keep a clone to inspect what the controller did
//! or to play the operator's part (typing into the form, picking options).

use crate::widgets::{
    ConfirmWidget, FormWidget, GridWidget, ModalWidget, Notice, Notifier, PickerFactory,
    PickerWidget, RelatedViewer, RowTransaction, Widgets,
};
use gridkeeper_core::{EntityRecord, Identifier};
use gridkeeper_schema::{
    Cell, ColumnDefinition, FormInput, FormValues, PickerOption, PickerSpec, RelatedListing,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

// ============================================================================
// Grid
// ============================================================================

#[derive(Debug, Default)]
struct GridState {
    created: bool,
    id_field: String,
    columns: Vec<ColumnDefinition>,
    rows: Vec<EntityRecord>,
    initializations: usize,
}

impl GridState {
    fn position(&self, identifier: &Identifier) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.identifier(&self.id_field).as_ref() == Some(identifier))
    }
}

/// Grid holding its rows in memory
#[derive(Debug, Clone, Default)]
pub struct HeadlessGrid {
    state: Rc<RefCell<GridState>>,
}

impl HeadlessGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current column definitions
    pub fn columns(&self) -> Vec<ColumnDefinition> {
        self.state.borrow().columns.clone()
    }

    /// Current rows in display order
    pub fn rows(&self) -> Vec<EntityRecord> {
        self.state.borrow().rows.clone()
    }

    /// Number of times the grid was (re)built
    pub fn initializations(&self) -> usize {
        self.state.borrow().initializations
    }

    /// Rendered cells of every row, one vector per row
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        let state = self.state.borrow();
        state
            .rows
            .iter()
            .map(|row| state.columns.iter().map(|c| c.render(row)).collect())
            .collect()
    }
}

impl GridWidget for HeadlessGrid {
    fn initialize(
        &mut self,
        id_field: &str,
        columns: Vec<ColumnDefinition>,
        rows: Vec<EntityRecord>,
    ) {
        let mut state = self.state.borrow_mut();
        state.created = true;
        state.id_field = id_field.to_string();
        state.columns = columns;
        state.rows = rows;
        state.initializations += 1;
    }

    fn is_created(&self) -> bool {
        self.state.borrow().created
    }

    fn column_count(&self) -> usize {
        self.state.borrow().columns.len()
    }

    fn row_count(&self) -> usize {
        self.state.borrow().rows.len()
    }

    fn row(&self, identifier: &Identifier) -> Option<EntityRecord> {
        let state = self.state.borrow();
        state.position(identifier).map(|i| state.rows[i].clone())
    }

    fn apply(&mut self, transaction: RowTransaction) {
        let mut state = self.state.borrow_mut();
        for identifier in &transaction.remove {
            if let Some(i) = state.position(identifier) {
                state.rows.remove(i);
            }
        }
        for (identifier, record) in transaction.update {
            if let Some(i) = state.position(&identifier) {
                state.rows[i] = record;
            }
        }
        state.rows.extend(transaction.add);
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.created = false;
        state.columns.clear();
        state.rows.clear();
    }
}

// ============================================================================
// Form and modal
// ============================================================================

/// Form holding raw input values
#[derive(Debug, Clone, Default)]
pub struct HeadlessForm {
    values: Rc<RefCell<FormValues>>,
}

impl HeadlessForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type into an input
    pub fn set(&self, name: &str, input: FormInput) {
        self.values.borrow_mut().insert(name.to_string(), input);
    }

    /// Type text into an input
    pub fn type_text(&self, name: &str, text: &str) {
        self.set(name, FormInput::Text(text.to_string()));
    }

    /// Current value of an input
    pub fn get(&self, name: &str) -> Option<FormInput> {
        self.values.borrow().get(name).cloned()
    }
}

impl FormWidget for HeadlessForm {
    fn read(&self) -> FormValues {
        self.values.borrow().clone()
    }

    fn write(&mut self, values: FormValues) {
        *self.values.borrow_mut() = values;
    }

    fn reset(&mut self, blank: FormValues) {
        *self.values.borrow_mut() = blank;
    }
}

#[derive(Debug, Default)]
struct ModalState {
    visible: bool,
    title: String,
    primary_label: String,
}

/// Modal remembering its title and primary button label
#[derive(Debug, Clone, Default)]
pub struct HeadlessModal {
    state: Rc<RefCell<ModalState>>,
}

impl HeadlessModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn primary_label(&self) -> String {
        self.state.borrow().primary_label.clone()
    }
}

impl ModalWidget for HeadlessModal {
    fn show(&mut self, title: &str, primary_label: &str) {
        let mut state = self.state.borrow_mut();
        state.visible = true;
        state.title = title.to_string();
        state.primary_label = primary_label.to_string();
    }

    fn hide(&mut self) {
        self.state.borrow_mut().visible = false;
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

// ============================================================================
// Shared dialogs
// ============================================================================

/// Delete confirmation remembering its question
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfirm {
    question: Rc<RefCell<Option<String>>>,
}

impl HeadlessConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(&self) -> Option<String> {
        self.question.borrow().clone()
    }
}

impl ConfirmWidget for HeadlessConfirm {
    fn ask(&mut self, message: &str) {
        *self.question.borrow_mut() = Some(message.to_string());
    }

    fn hide(&mut self) {
        *self.question.borrow_mut() = None;
    }

    fn is_visible(&self) -> bool {
        self.question.borrow().is_some()
    }
}

/// Related viewer keeping the last listing shown
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewer {
    shown: Rc<RefCell<Option<RelatedListing>>>,
}

impl HeadlessViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<RelatedListing> {
        self.shown.borrow().clone()
    }
}

impl RelatedViewer for HeadlessViewer {
    fn show(&mut self, listing: RelatedListing) {
        *self.shown.borrow_mut() = Some(listing);
    }
}

/// Notifier collecting every notice
#[derive(Debug, Clone, Default)]
pub struct HeadlessNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl HeadlessNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }

    /// Remove and return every notice
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

impl Notifier for HeadlessNotifier {
    fn notify(&mut self, notice: Notice) {
        tracing::debug!("Notice: {}", notice);
        self.notices.borrow_mut().push(notice);
    }
}

// ============================================================================
// Pickers
// ============================================================================

#[derive(Debug, Default)]
struct PickerBoard {
    live: BTreeMap<String, LivePicker>,
    created: usize,
    destroyed: usize,
}

#[derive(Debug, Default)]
struct LivePicker {
    options: Vec<PickerOption>,
    selected: Vec<String>,
}

/// Picker factory keeping every live picker on a shared board
#[derive(Debug, Clone, Default)]
pub struct HeadlessPickers {
    board: Rc<RefCell<PickerBoard>>,
}

impl HeadlessPickers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select values on a live picker, as the operator would
    ///
    /// Returns false when no such picker is live.
    pub fn select(&self, name: &str, values: Vec<String>) -> bool {
        match self.board.borrow_mut().live.get_mut(name) {
            Some(picker) => {
                picker.selected = values;
                true
            }
            None => false,
        }
    }

    /// Options of a live picker
    pub fn options(&self, name: &str) -> Option<Vec<PickerOption>> {
        self.board.borrow().live.get(name).map(|p| p.options.clone())
    }

    /// Selection of a live picker
    pub fn selected(&self, name: &str) -> Option<Vec<String>> {
        self.board.borrow().live.get(name).map(|p| p.selected.clone())
    }

    pub fn live_count(&self) -> usize {
        self.board.borrow().live.len()
    }

    pub fn created(&self) -> usize {
        self.board.borrow().created
    }

    pub fn destroyed(&self) -> usize {
        self.board.borrow().destroyed
    }
}

impl PickerFactory for HeadlessPickers {
    fn create(&mut self, spec: &PickerSpec, options: Vec<PickerOption>) -> Box<dyn PickerWidget> {
        let mut board = self.board.borrow_mut();
        board.created += 1;
        board.live.insert(
            spec.name.clone(),
            LivePicker {
                options,
                selected: Vec::new(),
            },
        );
        Box::new(HeadlessPicker {
            name: spec.name.clone(),
            board: self.board.clone(),
            live: true,
        })
    }
}

struct HeadlessPicker {
    name: String,
    board: Rc<RefCell<PickerBoard>>,
    live: bool,
}

impl PickerWidget for HeadlessPicker {
    fn get_value(&self) -> Vec<String> {
        self.board
            .borrow()
            .live
            .get(&self.name)
            .map(|p| p.selected.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, values: Vec<String>) {
        if let Some(picker) = self.board.borrow_mut().live.get_mut(&self.name) {
            picker.selected = values;
        }
    }

    fn clear(&mut self) {
        self.set_value(Vec::new());
    }

    fn destroy(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        let mut board = self.board.borrow_mut();
        board.live.remove(&self.name);
        board.destroyed += 1;
    }
}

// ============================================================================
// HeadlessWidgets
// ============================================================================

/// Handles to a full set of headless widgets
#[derive(Debug, Clone, Default)]
pub struct HeadlessWidgets {
    pub grid: HeadlessGrid,
    pub form: HeadlessForm,
    pub modal: HeadlessModal,
    pub confirm: HeadlessConfirm,
    pub viewer: HeadlessViewer,
    pub notifier: HeadlessNotifier,
    pub pickers: HeadlessPickers,
}

impl HeadlessWidgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh per-entity widgets sharing this set's dialogs and notifier
    pub fn sharing_dialogs(&self) -> Self {
        Self {
            confirm: self.confirm.clone(),
            viewer: self.viewer.clone(),
            notifier: self.notifier.clone(),
            ..Self::default()
        }
    }

    /// Boxed widgets for a controller; the handles stay usable
    pub fn widgets(&self) -> Widgets {
        Widgets {
            grid: Box::new(self.grid.clone()),
            form: Box::new(self.form.clone()),
            modal: Box::new(self.modal.clone()),
            confirm: Box::new(self.confirm.clone()),
            viewer: Box::new(self.viewer.clone()),
            notifier: Box::new(self.notifier.clone()),
            pickers: Box::new(self.pickers.clone()),
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

    fn record(id: i64, name: &str) -> EntityRecord {
        EntityRecord::new().with("id", id).with("name", name)
    }

    #[test]
    fn test_grid_transactions() {
        let mut grid = HeadlessGrid::new();
        assert!(!grid.is_created());
        grid.initialize(
            "id",
            vec![ColumnDefinition::plain("name")],
            vec![record(1, "a"), record(2, "b")],
        );

        grid.apply(RowTransaction::add(record(3, "c")));
        grid.apply(RowTransaction::update(Identifier::Number(1), record(1, "A")));
        grid.apply(RowTransaction::remove(Identifier::Number(2)));

        let names: Vec<String> = grid
            .rows()
            .iter()
            .map(|r| r.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string())
            .collect();
        assert_eq!(names, vec!["A", "c"]);
        assert_eq!(grid.row(&Identifier::Number(2)), None);
        assert_eq!(grid.cells()[0], vec![Cell::Text("A".into())]);
    }

    #[test]
    fn test_update_can_change_natural_key() {
        let mut grid = HeadlessGrid::new();
        let row = EntityRecord::new().with("username", "old");
        grid.initialize("username", vec![], vec![row]);
        grid.apply(RowTransaction::update(
            Identifier::from("old"),
            EntityRecord::new().with("username", "new"),
        ));
        assert!(grid.row(&Identifier::from("new")).is_some());
        assert!(grid.row(&Identifier::from("old")).is_none());
    }

    #[test]
    fn test_destroyed_grid_is_not_created() {
        let mut grid = HeadlessGrid::new();
        grid.initialize("id", vec![], vec![]);
        assert!(grid.is_created());
        grid.destroy();
        assert!(!grid.is_created());
        assert_eq!(grid.initializations(), 1);
    }

    #[test]
    fn test_shared_dialogs() {
        let first = HeadlessWidgets::new();
        let second = first.sharing_dialogs();
        second.widgets().notifier.notify(Notice::info("hello"));
        assert_eq!(first.notifier.last(), Some(Notice::info("hello")));
        second.grid.clone().initialize("id", vec![], vec![]);
        assert!(!first.grid.is_created());
    }
}
