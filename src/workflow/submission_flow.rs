//! Submission flow - workflow layer
//!
//! Owns one fetched student assignment from open to completion:
//!
//! 1. fetch the assignment (submit is impossible before that)
//! 2. collect answers
//! 3. validate → serialize → POST (under timeout and cancellation)
//! 4. on success lock the collector, keep a snapshot and re-fetch
//!
//! A failed submit leaves answers and state untouched so the student can
//! simply try again. A retry with the same answers reuses the idempotency
//! key; edited answers get a fresh one.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::ApiClient;
use crate::error::{AppResult, BusinessError};
use crate::models::{AnswerSheet, StudentAssignment, SubmissionPayload, SubmitResponse};
use crate::utils::logging::log_submission;
use crate::workflow::cancel::{run_cancellable, CancelToken};
use crate::workflow::collector::{AnswerCollector, AnswerSet};
use crate::workflow::render::{completed_answers, AssignmentView};
use crate::workflow::serializer::serialize;
use crate::workflow::validator::{validate, Readiness};

const SUBMIT_ENDPOINT: &str = "/student/assignments/submit";

/// Assignments with a submit in flight
///
/// Shared by every flow created from the same application so that two
/// flows for one assignment cannot post concurrently.
#[derive(Debug, Clone, Default)]
pub struct SubmitGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Released on drop
#[derive(Debug)]
pub struct SubmitPermit {
    gate: SubmitGate,
    id: String,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, id: &str) -> AppResult<SubmitPermit> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !in_flight.insert(id.to_string()) {
            return Err(BusinessError::SubmitInFlight { id: id.to_string() }.into());
        }
        Ok(SubmitPermit {
            gate: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(id)
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.gate
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

/// Result of an accepted submit
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub response: SubmitResponse,
    /// False when the follow-up fetch failed and completion was applied locally
    pub refreshed: bool,
}

/// One assignment's submit workflow
pub struct SubmissionFlow {
    client: ApiClient,
    gate: SubmitGate,
    assignment: StudentAssignment,
    collector: AnswerCollector,
    snapshot: Option<AnswerSet>,
    /// Key of the last failed attempt and the body it carried
    pending: Option<PendingSubmit>,
}

#[derive(Debug, Clone)]
struct PendingSubmit {
    key: String,
    payload: SubmissionPayload,
}

impl SubmissionFlow {
    /// Fetches the assignment and prepares an empty collector
    ///
    /// # Arguments
    /// - `client`: backend client
    /// - `gate`: in-flight registry shared across flows
    /// - `id`: student assignment id
    /// - `cancel`: aborts the fetch
    pub async fn open(
        client: ApiClient,
        gate: SubmitGate,
        id: &str,
        cancel: &CancelToken,
    ) -> AppResult<Self> {
        let endpoint = format!("/student/assignments/{}", id);
        let assignment =
            run_cancellable(cancel, &endpoint, client.get_student_assignment(id)).await?;
        info!(
            "📄 Opened \"{}\" ({})",
            assignment.title(),
            if assignment.completed { "completed" } else { "in progress" }
        );
        Ok(Self::from_assignment(client, gate, assignment))
    }

    /// Builds a flow around an already fetched assignment
    pub fn from_assignment(
        client: ApiClient,
        gate: SubmitGate,
        assignment: StudentAssignment,
    ) -> Self {
        let collector = AnswerCollector::new(&assignment.assignment, assignment.completed);
        Self {
            client,
            gate,
            assignment,
            collector,
            snapshot: None,
            pending: None,
        }
    }

    pub fn assignment(&self) -> &StudentAssignment {
        &self.assignment
    }

    pub fn collector(&self) -> &AnswerCollector {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut AnswerCollector {
        &mut self.collector
    }

    pub fn apply_sheet(&mut self, sheet: &AnswerSheet) -> AppResult<usize> {
        self.collector.apply_sheet(sheet)
    }

    pub fn readiness(&self) -> Readiness {
        Readiness::measure(&self.assignment.assignment, self.collector.answers())
    }

    /// Validation only, no network
    pub fn check(&self) -> AppResult<()> {
        validate(&self.assignment, self.collector.answers())
    }

    /// Key of the last failed attempt, reused if the answers are unchanged
    pub fn pending_idempotency_key(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.key.as_str())
    }

    fn idempotency_key_for(&mut self, payload: &SubmissionPayload) -> String {
        if let Some(pending) = self.pending.as_ref().filter(|p| p.payload == *payload) {
            return pending.key.clone();
        }
        let key = Uuid::new_v4().to_string();
        self.pending = Some(PendingSubmit {
            key: key.clone(),
            payload: payload.clone(),
        });
        key
    }

    /// Validates, posts and completes the assignment
    ///
    /// # Returns
    /// The backend's score. On error nothing local has changed.
    pub async fn submit(&mut self, cancel: &CancelToken) -> AppResult<SubmissionOutcome> {
        self.check()?;
        let id = self.assignment.id().to_string();
        let _permit = self.gate.try_acquire(&id)?;

        let payload = serialize(&id, &self.assignment.assignment, self.collector.answers());
        let key = self.idempotency_key_for(&payload);

        info!("📤 Submitting \"{}\"", self.assignment.title());
        let request = self.client.submit_assignment(&payload, &key);
        let response = match run_cancellable(cancel, SUBMIT_ENDPOINT, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ Submit of \"{}\" failed: {}", self.assignment.title(), e);
                return Err(e);
            }
        };

        self.pending = None;
        self.snapshot = Some(self.collector.take());
        self.collector.lock();
        log_submission(self.assignment.title(), response.score);

        let refreshed = self.refresh_after_submit(&id, response.score, cancel).await;
        Ok(SubmissionOutcome { response, refreshed })
    }

    async fn refresh_after_submit(&mut self, id: &str, score: f64, cancel: &CancelToken) -> bool {
        let endpoint = format!("/student/assignments/{}", id);
        match run_cancellable(cancel, &endpoint, self.client.get_student_assignment(id)).await {
            Ok(mut fresh) => {
                fresh.mark_completed(score, Utc::now());
                self.assignment = fresh;
                true
            }
            Err(e) => {
                warn!(
                    "⚠️ Could not refresh \"{}\" after submit: {}",
                    self.assignment.title(),
                    e
                );
                self.assignment.mark_completed(score, Utc::now());
                false
            }
        }
    }

    /// Current view: worksheet while open, annotated report once completed
    pub fn render(&self) -> AssignmentView {
        if self.assignment.completed {
            let answers = completed_answers(&self.assignment, self.snapshot.as_ref());
            AssignmentView::render(&self.assignment, &answers)
        } else {
            AssignmentView::render(&self.assignment, self.collector.answers())
        }
    }
}

/// Opens a flow, mapping a missing assignment to the not-found view
pub async fn open_or_not_found(
    client: ApiClient,
    gate: SubmitGate,
    id: &str,
    cancel: &CancelToken,
) -> AppResult<Result<SubmissionFlow, AssignmentView>> {
    match SubmissionFlow::open(client, gate, id, cancel).await {
        Ok(flow) => Ok(Ok(flow)),
        Err(e) if e.is_not_found() => Ok(Err(AssignmentView::not_found(id))),
        Err(e) => Err(e),
    }
}

impl std::fmt::Debug for SubmissionFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionFlow")
            .field("assignment", &self.assignment.id())
            .field("completed", &self.assignment.completed)
            .field("locked", &self.collector.is_locked())
            .finish()
    }
}
