//! Webhook dispatch - routes verified events to their handlers.
//!
//! Each recognized event type is owned by exactly one handler. Events with
//! no registered handler are acknowledged without processing so the
//! processor stops redelivering them.

use std::sync::Arc;

use async_trait::async_trait;

use super::webhook_errors::WebhookError;
use super::webhook_event::{WebhookEvent, WebhookEventType};

/// Handler for one or more webhook event types.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// Returns the event type(s) this handler processes.
    fn handles(&self) -> Vec<WebhookEventType>;

    /// Handles the webhook event.
    ///
    /// Returns `Err(WebhookError::HandlerFailed(_))` when the work could not
    /// be completed and the processor should redeliver.
    async fn handle(&self, event: &WebhookEvent) -> Result<(), WebhookError>;
}

/// Result of dispatching a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler processed the event.
    Handled(WebhookEventType),
    /// No handler is registered for this type; the event was acknowledged.
    Ignored(String),
}

/// Dispatches webhook events to the appropriate handler.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Find a handler for the given event type.
    fn get_handler(&self, event_type: &WebhookEventType) -> Option<&dyn WebhookEventHandler>;

    /// Dispatch an event to its handler.
    async fn dispatch(&self, event: &WebhookEvent) -> Result<DispatchOutcome, WebhookError> {
        let event_type = event.kind();
        match self.get_handler(&event_type) {
            Some(handler) => {
                handler.handle(event).await?;
                Ok(DispatchOutcome::Handled(event_type))
            }
            None => Ok(DispatchOutcome::Ignored(event.event_type.clone())),
        }
    }
}

/// Dispatcher backed by a list of registered handlers.
///
/// The first handler registered for a type wins.
#[derive(Default, Clone)]
pub struct EventRouter {
    handlers: Vec<Arc<dyn WebhookEventHandler>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the types it declares.
    pub fn with_handler(mut self, handler: Arc<dyn WebhookEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[async_trait]
impl WebhookDispatcher for EventRouter {
    fn get_handler(&self, event_type: &WebhookEventType) -> Option<&dyn WebhookEventHandler> {
        if matches!(event_type, WebhookEventType::Unknown(_)) {
            return None;
        }
        self.handlers
            .iter()
            .find(|h| h.handles().contains(event_type))
            .map(|h| h.as_ref())
    }
}
