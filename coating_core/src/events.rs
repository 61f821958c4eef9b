//! # Quote Events
//!
//! Components that report activity take an [`EventSink`] from their caller
//! instead of reaching for a process-wide logger. [`TracingSink`] forwards to
//! `tracing`; [`RecordingSink`] keeps events in memory for tests and for
//! callers that show an activity feed.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcError;
use crate::quote::QuoteStatus;

/// Something that happened to a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuoteEvent {
    Created {
        quote_id: Uuid,
        quote_number: String,
        total_cost: f64,
    },
    Recalculated {
        quote_id: Uuid,
        total_cost: f64,
    },
    StatusChanged {
        quote_id: Uuid,
        from: QuoteStatus,
        to: QuoteStatus,
    },
    Deleted {
        quote_id: Uuid,
    },
    /// An operation failed; `operation` names it
    Failed {
        operation: String,
        error: CalcError,
    },
}

/// Receiver for quote events
pub trait EventSink {
    fn emit(&self, event: QuoteEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: QuoteEvent) {
        match &event {
            QuoteEvent::Created {
                quote_id,
                quote_number,
                total_cost,
            } => tracing::info!(%quote_id, %quote_number, total_cost, "quote created"),
            QuoteEvent::Recalculated { quote_id, total_cost } => {
                tracing::info!(%quote_id, total_cost, "quote recalculated")
            }
            QuoteEvent::StatusChanged { quote_id, from, to } => {
                tracing::info!(%quote_id, %from, %to, "quote status changed")
            }
            QuoteEvent::Deleted { quote_id } => tracing::info!(%quote_id, "quote deleted"),
            QuoteEvent::Failed { operation, error } => {
                tracing::warn!(%operation, code = error.error_code(), %error, "quote operation failed")
            }
        }
    }
}

/// Stores every event in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<QuoteEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events seen so far
    pub fn events(&self) -> Vec<QuoteEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: QuoteEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: QuoteEvent) {
        (**self).emit(event)
    }
}
