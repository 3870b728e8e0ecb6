//! Click-to-fill pipeline.

use std::sync::Arc;

use formpilot_page::{resolve_label, NodeId, SharedDocument, ValueInjector};
use formpilot_protocols::Answer;
use tracing::warn;

use crate::resolver::AnswerResolver;

/// Written into a control when the model has no answer.
pub const NOT_FOUND_PLACEHOLDER: &str = "NA";

/// Written into a control when resolution fails outright.
pub const ERROR_PLACEHOLDER: &str = "Error";

/// Resolves a clicked control's label to a value and injects it.
///
/// An unlabeled control stops the pipeline before any remote call. A
/// failed resolution still fills the control, with a placeholder, so
/// the user can see the attempt happened.
pub struct FillPipeline {
    resolver: Arc<AnswerResolver>,
    injector: ValueInjector,
}

impl FillPipeline {
    pub fn new(resolver: Arc<AnswerResolver>) -> Self {
        Self { resolver, injector: ValueInjector::new() }
    }

    pub fn with_injector(resolver: Arc<AnswerResolver>, injector: ValueInjector) -> Self {
        Self { resolver, injector }
    }

    pub async fn fill(&self, doc: &SharedDocument, target: NodeId) {
        let label = {
            let guard = doc.lock();
            resolve_label(&guard, target)
        };
        let Some(label) = label else {
            warn!(node = target, "no label found for clicked control, skipping");
            return;
        };

        let value = match self.resolver.answer(&label).await {
            Ok(Answer::Value(v)) => v,
            Ok(Answer::Unknown) => NOT_FOUND_PLACEHOLDER.to_string(),
            Err(err) => {
                warn!(label = %label, error = %err, "answer resolution failed");
                ERROR_PLACEHOLDER.to_string()
            }
        };

        self.injector.inject(doc, target, &value).await;
    }
}
