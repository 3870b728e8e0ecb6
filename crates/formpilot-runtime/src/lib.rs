//! FormPilot runtime wiring.
//!
//! Composes the vault, context store, and chat provider into the
//! services behind the message protocol: resolving an answer for a
//! field label, running the element picker, and driving the fill
//! pipeline when a picked control is clicked.

mod dispatcher;
mod error;
mod picker;
mod pipeline;
mod resolver;

pub use dispatcher::Dispatcher;
pub use error::ResolveError;
pub use picker::{ElementPicker, PICKER_CURSOR};
pub use pipeline::{FillPipeline, ERROR_PLACEHOLDER, NOT_FOUND_PLACEHOLDER};
pub use resolver::{AnswerResolver, SYSTEM_PROMPT};
