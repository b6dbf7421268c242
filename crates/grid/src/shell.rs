//! Navigation shell
//!
//! Holds one panel per entity type. Revealing a panel hides the others and
//! loads its controller the first time it becomes visible.

use crate::controller::{GridController, Outcome};
use chrono::{DateTime, Utc};
use gridkeeper_core::{ConsoleError, ConsoleResult};
use std::collections::BTreeMap;

/// One content panel and its controller
#[derive(Debug)]
pub struct Panel {
    controller: GridController,
    visible: bool,
    loaded_at: Option<DateTime<Utc>>,
}

impl Panel {
    pub fn controller(&self) -> &GridController {
        &self.controller
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// When the last successful load finished
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    async fn load(&mut self) -> Outcome {
        let outcome = self.controller.load().await;
        if outcome.is_applied() {
            self.loaded_at = Some(Utc::now());
        }
        outcome
    }
}

/// Panel switcher owning every controller
#[derive(Debug, Default)]
pub struct NavigationShell {
    panels: BTreeMap<String, Panel>,
    active: Option<String>,
    reload_on_reveal: bool,
}

impl NavigationShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload a panel every time it is revealed instead of only the first time
    pub fn with_reload_on_reveal(mut self, reload: bool) -> Self {
        self.reload_on_reveal = reload;
        self
    }

    /// Register a hidden panel under its entity key
    pub fn add_panel(&mut self, controller: GridController) {
        let key = controller.descriptor().key.clone();
        if self.panels.contains_key(&key) {
            tracing::warn!("Replacing panel '{}'", key);
        }
        self.panels.insert(
            key,
            Panel {
                controller,
                visible: false,
                loaded_at: None,
            },
        );
    }

    /// Show a panel, hiding every other one
    ///
    /// Returns `Ignored` when no load was needed.
    pub async fn reveal(&mut self, key: &str) -> ConsoleResult<Outcome> {
        if !self.panels.contains_key(key) {
            return Err(ConsoleError::EntityNotFound(key.to_string()));
        }
        for (name, panel) in self.panels.iter_mut() {
            panel.visible = name == key;
        }
        self.active = Some(key.to_string());

        let reload = self.reload_on_reveal;
        let panel = self.panel_mut(key)?;
        if panel.loaded_at.is_none() || reload {
            tracing::debug!("Loading panel '{}'", key);
            Ok(panel.load().await)
        } else {
            Ok(Outcome::Ignored)
        }
    }

    /// Force a reload of a panel, visible or not
    pub async fn refresh(&mut self, key: &str) -> ConsoleResult<Outcome> {
        Ok(self.panel_mut(key)?.load().await)
    }

    pub fn panel(&self, key: &str) -> Option<&Panel> {
        self.panels.get(key)
    }

    pub fn controller(&self, key: &str) -> Option<&GridController> {
        self.panels.get(key).map(Panel::controller)
    }

    pub fn controller_mut(&mut self, key: &str) -> Option<&mut GridController> {
        self.panels.get_mut(key).map(|p| &mut p.controller)
    }

    /// Key of the visible panel
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.panels.get(key).is_some_and(Panel::is_visible)
    }

    pub fn loaded_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.panels.get(key).and_then(Panel::loaded_at)
    }

    /// Registered entity keys
    pub fn keys(&self) -> Vec<&str> {
        self.panels.keys().map(String::as_str).collect()
    }

    fn panel_mut(&mut self, key: &str) -> ConsoleResult<&mut Panel> {
        self.panels
            .get_mut(key)
            .ok_or_else(|| ConsoleError::EntityNotFound(key.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
