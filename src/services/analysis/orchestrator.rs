//! Analysis Orchestrator
//!
//! Supervises one analysis run at a time: resets the session, opens the
//! transport, folds every classified event into the session state in arrival
//! order, and always settles the session, whether the stream completes,
//! fails, or is cancelled.
//!
//! State is published through a `watch` channel after every step, so readers
//! observe the timeline incrementally rather than only at completion.

use std::sync::Arc;

use agentic_studio_core::{AnalysisMode, DomainEvent, SessionOutcome, SessionState};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::transport::{AnalysisTransport, TransportError};
use crate::models::analysis::{AnalysisInputs, AnalysisRequest};
use crate::services::streaming::into_event_stream;

/// Runs analysis sessions against a transport.
pub struct AnalysisOrchestrator {
    transport: Arc<dyn AnalysisTransport>,
    state_tx: watch::Sender<SessionState>,
    event_tx: Option<mpsc::Sender<DomainEvent>>,
}

impl AnalysisOrchestrator {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::new());
        Self {
            transport,
            state_tx,
            event_tx: None,
        }
    }

    /// Forward every reduced event to `tx` as well.
    pub fn with_event_sender(mut self, tx: mpsc::Sender<DomainEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Clone of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Run one session to completion.
    pub async fn run(&mut self, mode: AnalysisMode, inputs: &AnalysisInputs) -> SessionState {
        self.run_with_cancel(mode, inputs, CancellationToken::new())
            .await
    }

    /// Run one session, settling as cancelled if `cancel` fires first.
    ///
    /// Any previous session state is discarded. The returned state is always
    /// settled.
    pub async fn run_with_cancel(
        &mut self,
        mode: AnalysisMode,
        inputs: &AnalysisInputs,
        cancel: CancellationToken,
    ) -> SessionState {
        let run_id = Uuid::new_v4().to_string();
        self.state_tx
            .send_modify(|state| state.begin(run_id.clone(), mode, now()));
        tracing::info!(run_id = %run_id, mode = %mode, "Analysis run started");

        let request = AnalysisRequest::build(mode, inputs);

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.transport.open(&request) => Some(result),
        };

        match opened {
            None => self.settle_cancelled().await,
            Some(Err(e)) => self.settle_with_error(e).await,
            Some(Ok(chunks)) => {
                let mut events = Box::pin(into_event_stream(chunks));
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            self.settle_cancelled().await;
                            break;
                        }
                        next = events.next() => match next {
                            Some(Ok(event)) => self.apply(event).await,
                            Some(Err(e)) => {
                                self.settle_with_error(e).await;
                                break;
                            }
                            None => {
                                self.settle_with(|state| state.settle_completed(now())).await;
                                break;
                            }
                        }
                    }
                }
            }
        }

        let state = self.snapshot();
        log_settled(&state);
        state
    }

    async fn apply(&mut self, event: DomainEvent) {
        tracing::debug!(role = %event.role(), "Reducing event");
        let forwarded = self.event_tx.is_some().then(|| event.clone());
        self.state_tx.send_modify(|state| state.apply(event));
        if let Some(event) = forwarded {
            self.forward(event).await;
        }
    }

    async fn forward(&mut self, event: DomainEvent) {
        let receiver_gone = match &self.event_tx {
            Some(tx) => tx.send(event).await.is_err(),
            None => false,
        };
        if receiver_gone {
            tracing::debug!("Event receiver dropped; continuing without forwarding");
            self.event_tx = None;
        }
    }

    /// Apply a settle transition and forward any synthetic event it appended.
    async fn settle_with(&mut self, settle: impl FnOnce(&mut SessionState)) {
        let before = self.state_tx.borrow().events.len();
        self.state_tx.send_modify(settle);
        let appended = self.state_tx.borrow().events[before..].to_vec();
        for event in appended {
            self.forward(event).await;
        }
    }

    async fn settle_with_error(&mut self, error: TransportError) {
        if error == TransportError::Cancelled {
            self.settle_cancelled().await;
            return;
        }
        tracing::warn!(error = %error, "Analysis transport failed");
        let message = format!("Connection failed: {}", error);
        self.settle_with(|state| state.settle_failed(message, now()))
            .await;
    }

    async fn settle_cancelled(&mut self) {
        self.settle_with(|state| state.settle_cancelled(now())).await;
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn log_settled(state: &SessionState) {
    let run_id = state.run_id.as_deref().unwrap_or_default();
    let events = state.events.len();
    match &state.outcome {
        Some(SessionOutcome::Completed) => {
            tracing::info!(run_id, events, "Analysis run completed")
        }
        Some(SessionOutcome::Failed { message }) => {
            tracing::info!(run_id, events, error = %message, "Analysis run failed")
        }
        Some(SessionOutcome::Cancelled) => {
            tracing::info!(run_id, events, "Analysis run cancelled")
        }
        None => tracing::warn!(run_id, events, "Analysis run ended without settling"),
    }
}

// ============================================================================
// Tests
// ============================================================================
