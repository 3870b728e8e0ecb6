//! Page DOM model for the fill pipeline.
//!
//! Provides an owned document tree ([`PageDocument`]), the label
//! resolution rules used to name a form control, a value injector that
//! survives framework-managed inputs, and the frame model used when a
//! page embeds same-origin or cross-origin subdocuments.

mod document;
mod events;
mod frames;
mod inject;
mod label;

pub use document::{ControlKind, Node, NodeId, PageDocument, SharedDocument, ValueInterceptor};
pub use events::{DomEvent, EventRecord};
pub use frames::{Frame, Page};
pub use inject::ValueInjector;
pub use label::resolve as resolve_label;
