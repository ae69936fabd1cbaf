//! Progress notifications raised while provisioning.
//!
//! The pipelines never buffer a log of their own; every per-row and per-item
//! outcome is handed to the attached [`EventSink`] as it happens.

use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningEvent {
    Success(String),
    Error(String),
}

impl ProvisioningEvent {
    pub fn message(&self) -> &str {
        match self {
            ProvisioningEvent::Success(message) | ProvisioningEvent::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProvisioningEvent::Error(_))
    }
}

/// Observer of provisioning events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ProvisioningEvent);

    fn success(&self, message: String) {
        self.emit(ProvisioningEvent::Success(message));
    }

    fn error(&self, message: String) {
        self.emit(ProvisioningEvent::Error(message));
    }
}

/// Writes events to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: ProvisioningEvent) {
        match event {
            ProvisioningEvent::Success(message) => info!("{}", message),
            ProvisioningEvent::Error(message) => warn!("{}", message),
        }
    }
}

/// Keeps every event in memory, for validation runs and tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<ProvisioningEvent>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProvisioningEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(ProvisioningEvent::is_error)
            .map(|event| event.message().to_string())
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| !event.is_error())
            .map(|event| event.message().to_string())
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: ProvisioningEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
