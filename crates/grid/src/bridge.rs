//! Selection widget bridge
//!
//! Creates one picker widget per declared picker from the loaded option
//! sets, reads and writes their selections, and destroys them. Existing
//! widgets are always destroyed before replacements are created.

use crate::widgets::{PickerFactory, PickerWidget};
use gridkeeper_client::OptionSets;
use gridkeeper_schema::{PickerSpec, PickerValues, picker_options};
use std::collections::BTreeMap;

/// Live picker widgets of one controller, keyed by picker name
pub struct SelectionBridge {
    factory: Box<dyn PickerFactory>,
    live: BTreeMap<String, Box<dyn PickerWidget>>,
}

impl std::fmt::Debug for SelectionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionBridge")
            .field("live", &self.live.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SelectionBridge {
    pub fn new(factory: Box<dyn PickerFactory>) -> Self {
        Self {
            factory,
            live: BTreeMap::new(),
        }
    }

    /// Replace every live picker with fresh ones
    ///
    /// Pickers whose source is missing from `options` are not created.
    pub fn build(&mut self, pickers: &[PickerSpec], options: &OptionSets) {
        self.destroy_all();
        for spec in pickers {
            let Some(records) = options.get(&spec.source) else {
                tracing::debug!("No options for picker '{}', leaving it out", spec.name);
                continue;
            };
            let widget = self.factory.create(spec, picker_options(spec, records));
            self.live.insert(spec.name.clone(), widget);
        }
    }

    /// Set the selection of a live picker
    pub fn set_value(&mut self, name: &str, values: Vec<String>) {
        if let Some(widget) = self.live.get_mut(name) {
            widget.set_value(values);
        }
    }

    /// Selections of every live picker
    pub fn values(&self) -> PickerValues {
        self.live
            .iter()
            .map(|(name, widget)| (name.clone(), widget.get_value()))
            .collect()
    }

    /// Clear every selection without destroying the widgets
    pub fn clear_all(&mut self) {
        for widget in self.live.values_mut() {
            widget.clear();
        }
    }

    /// Destroy every live picker
    pub fn destroy_all(&mut self) {
        for (_, mut widget) in std::mem::take(&mut self.live) {
            widget.destroy();
        }
    }

    /// Whether a picker is live
    pub fn is_live(&self, name: &str) -> bool {
        self.live.contains_key(name)
    }

    /// Number of live pickers
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Drop for SelectionBridge {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPickers;
    use gridkeeper_core::EntityRecord;
    use pretty_assertions::assert_eq;

    fn specs() -> Vec<PickerSpec> {
        vec![
            PickerSpec::by_id("roles", "user-roles", "rolename"),
            PickerSpec::new("divisions", "divisions", "code"),
        ]
    }

    fn options() -> OptionSets {
        let mut sets = OptionSets::new();
        sets.insert(
            "user-roles".into(),
            vec![EntityRecord::new().with("id", 1).with("rolename", "admin")],
        );
        sets.insert("divisions".into(), vec![EntityRecord::new().with("code", "D1")]);
        sets
    }

    #[test]
    fn test_rebuild_destroys_previous_widgets() {
        let board = HeadlessPickers::new();
        let mut bridge = SelectionBridge::new(Box::new(board.clone()));

        bridge.build(&specs(), &options());
        bridge.build(&specs(), &options());
        assert_eq!(bridge.live_count(), 2);
        assert_eq!(board.live_count(), 2);
        assert_eq!(board.created(), 4);
        assert_eq!(board.destroyed(), 2);

        bridge.destroy_all();
        assert_eq!(board.live_count(), 0);
    }

    #[test]
    fn test_values_round_trip() {
        let board = HeadlessPickers::new();
        let mut bridge = SelectionBridge::new(Box::new(board.clone()));
        bridge.build(&specs(), &options());

        bridge.set_value("roles", vec!["1".into()]);
        assert_eq!(bridge.values().get("roles"), Some(&vec!["1".to_string()]));
        assert_eq!(board.options("roles").map(|o| o.len()), Some(1));

        bridge.clear_all();
        assert!(bridge.values().values().all(Vec::is_empty));
    }

    #[test]
    fn test_missing_source_leaves_picker_out() {
        let board = HeadlessPickers::new();
        let mut bridge = SelectionBridge::new(Box::new(board));
        let mut sets = options();
        sets.remove("divisions");
        bridge.build(&specs(), &sets);
        assert!(bridge.is_live("roles"));
        assert!(!bridge.is_live("divisions"));
        assert!(!bridge.values().contains_key("divisions"));
    }
}
