//! Element picker state machine.

use std::sync::Arc;

use formpilot_config::{keys, LocalStore};
use formpilot_page::{NodeId, Page, SharedDocument};
use parking_lot::RwLock;
use tracing::debug;

use crate::pipeline::FillPipeline;

/// Cursor shown on the page while picking is active.
pub const PICKER_CURSOR: &str = "crosshair";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerState {
    Inactive,
    Active,
}

/// Arms and disarms click-to-fill on a page.
///
/// The active flag is persisted so a reloaded page resumes in the same
/// mode. Starting an already-active picker is a no-op, as is stopping
/// an inactive one.
pub struct ElementPicker {
    store: Arc<LocalStore>,
    state: RwLock<PickerState>,
}

impl ElementPicker {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store, state: RwLock::new(PickerState::Inactive) }
    }

    pub fn is_active(&self) -> bool {
        *self.state.read() == PickerState::Active
    }

    pub fn start(&self, page: &Page) {
        {
            let mut state = self.state.write();
            if *state == PickerState::Active {
                return;
            }
            *state = PickerState::Active;
        }
        self.store.set(keys::PICKER, true);
        self.apply_cursor(page, Some(PICKER_CURSOR.to_string()));
        debug!("element picker armed");
    }

    pub fn stop(&self, page: &Page) {
        {
            let mut state = self.state.write();
            if *state == PickerState::Inactive {
                return;
            }
            *state = PickerState::Inactive;
        }
        self.store.set(keys::PICKER, false);
        self.apply_cursor(page, None);
        debug!("element picker disarmed");
    }

    /// Restores the persisted picker mode, e.g. after a page reload.
    pub fn resume(&self, page: &Page) {
        if self.store.get::<bool>(keys::PICKER) == Some(true) {
            self.start(page);
        }
    }

    /// Routes a click on `target` into the fill pipeline, if the
    /// picker is armed and the target is a fillable control.
    pub async fn handle_click(
        &self,
        pipeline: &FillPipeline,
        doc: &SharedDocument,
        target: NodeId,
    ) {
        if !self.is_active() {
            return;
        }
        let eligible = doc.lock().control_kind(target).is_some();
        if !eligible {
            debug!(node = target, "clicked element is not fillable");
            return;
        }
        pipeline.fill(doc, target).await;
    }

    fn apply_cursor(&self, page: &Page, cursor: Option<String>) {
        page.document().lock().set_cursor(cursor.clone());
        for frame in page.frames() {
            match frame.document(page.origin()) {
                Ok(doc) => doc.lock().set_cursor(cursor.clone()),
                Err(_) => {
                    debug!(origin = frame.origin(), "skipping inaccessible frame");
                }
            }
        }
    }
}
