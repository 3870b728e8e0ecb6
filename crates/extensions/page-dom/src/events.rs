//! Event vocabulary dispatched at form controls.

use crate::document::NodeId;

/// An event observable on a control after the injector runs.
///
/// Framework change detection typically listens for `Input` and
/// `Change`; the key events are emitted per character by the simulated
/// typing fallback. `FillComplete` marks the end of a fill attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Focus,
    Input,
    Change,
    Blur,
    KeyDown(char),
    KeyUp(char),
    KeyPress,
    FillComplete,
}

/// One dispatched event together with its target node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub target: NodeId,
    pub event: DomEvent,
}
