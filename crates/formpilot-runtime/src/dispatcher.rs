//! Message dispatch between page contexts and the runtime services.

use std::sync::Arc;

use formpilot_page::Page;
use formpilot_protocols::{Answer, Request, RequestEnvelope, Response, UNKNOWN_SENTINEL};
use formpilot_vault::CredentialVault;
use tracing::{debug, warn};

use crate::picker::ElementPicker;
use crate::resolver::AnswerResolver;

/// Routes protocol requests to the vault, resolver, and picker.
///
/// Every request yields a response; an unrecognized type is answered
/// with a failure rather than silence so the sender never hangs.
pub struct Dispatcher {
    vault: Arc<CredentialVault>,
    resolver: Arc<AnswerResolver>,
    picker: Arc<ElementPicker>,
    page: Arc<Page>,
}

impl Dispatcher {
    pub fn new(
        vault: Arc<CredentialVault>,
        resolver: Arc<AnswerResolver>,
        picker: Arc<ElementPicker>,
        page: Arc<Page>,
    ) -> Self {
        Self { vault, resolver, picker, page }
    }

    pub async fn handle(&self, envelope: RequestEnvelope) -> Response {
        debug!(kind = %envelope.kind, "dispatching request");
        match Request::parse(envelope) {
            Request::Encrypt { data } => match self.vault.encrypt(&data) {
                Ok(secret) => Response::encrypted(secret),
                Err(err) => Response::error(err.to_string()),
            },
            Request::Decrypt { data } => match self.vault.decrypt(&data) {
                Ok(plaintext) => Response::decrypted(plaintext),
                Err(err) => Response::error(err.to_string()),
            },
            Request::AskLlm { label } => match self.resolver.answer(&label).await {
                Ok(Answer::Value(value)) => Response::answer(value),
                Ok(Answer::Unknown) => Response::answer(UNKNOWN_SENTINEL),
                Err(err) => Response::error(err.to_string()),
            },
            Request::StartPicker => {
                self.picker.start(&self.page);
                Response::ack()
            }
            Request::StopPicker => {
                self.picker.stop(&self.page);
                Response::ack()
            }
            Request::Unknown(kind) => {
                warn!(kind = %kind, "unknown request type");
                Response::unknown_type()
            }
        }
    }
}
