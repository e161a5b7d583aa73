#![allow(async_fn_in_trait)]

//! Best-effort click tracking.
//!
//! Recording a click is a side effect owned by the caller's storage layer.
//! Failures are logged and swallowed so they can never turn into a
//! recommendation failure.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::interaction_event::ClickEvent;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("interaction store unavailable: {0}")]
    Unavailable(String),
    #[error("click event rejected: {0}")]
    Rejected(String),
}

/// Storage for click events, implemented by the application layer.
pub trait InteractionSink {
    async fn record_click(&self, event: &ClickEvent) -> Result<(), TrackingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingOutcome {
    Recorded,
    Dropped,
}

pub async fn track_click<S>(sink: &S, event: &ClickEvent) -> TrackingOutcome
where
    S: InteractionSink + ?Sized,
{
    info!(
        user_id = %event.user_id,
        product_id = %event.product_id,
        algorithm = ?event.algorithm,
        position = event.position,
        "recommendation clicked"
    );

    match sink.record_click(event).await {
        Ok(()) => TrackingOutcome::Recorded,
        Err(err) => {
            warn!(
                error = %err,
                user_id = %event.user_id,
                product_id = %event.product_id,
                "failed to record click; continuing"
            );
            TrackingOutcome::Dropped
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::{api::interaction_event::InteractionEventSource, recommendation::Algorithm};

    #[derive(Default)]
    struct MemorySink {
        events: Mutex<Vec<ClickEvent>>,
    }

    impl InteractionSink for MemorySink {
        async fn record_click(&self, event: &ClickEvent) -> Result<(), TrackingError> {
            self.events
                .lock()
                .map_err(|_| TrackingError::Unavailable("poisoned".into()))?
                .push(event.clone());
            Ok(())
        }
    }

    struct BrokenSink;

    impl InteractionSink for BrokenSink {
        async fn record_click(&self, _event: &ClickEvent) -> Result<(), TrackingError> {
            Err(TrackingError::Unavailable("connection refused".into()))
        }
    }

    fn event() -> ClickEvent {
        ClickEvent {
            user_id: "user-1".into(),
            org_id: Some("buyer-1".into()),
            product_id: "p-1".into(),
            algorithm: Some(Algorithm::Hybrid),
            position: Some(0),
            score: Some(0.8),
            source: InteractionEventSource::Web,
            clicked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_click_through_sink() {
        let sink = MemorySink::default();

        let outcome = track_click(&sink, &event()).await;

        assert_eq!(outcome, TrackingOutcome::Recorded);
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let outcome = track_click(&BrokenSink, &event()).await;
        assert_eq!(outcome, TrackingOutcome::Dropped);
    }
}
