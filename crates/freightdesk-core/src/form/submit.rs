// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Submission coordinator
//
// validate -> serialize -> call the API -> report. At most one submission
// is in flight per coordinator; a second call while one is running is
// turned away rather than queued.

use crate::api::ContactApi;
use crate::form::draft::ContactDraft;
use crate::form::errors::FormErrors;
use crate::form::validate::validate;
use crate::wire::{ContactPayload, ContactRecord};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Server rejection as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFailure {
    /// Single message for an alert
    pub message: String,
    /// Field errors reported by the server, in the validator's shape
    pub errors: FormErrors,
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission was still running; nothing was sent
    Rejected,
    /// Local validation failed; nothing was sent
    Invalid(FormErrors),
    /// The server stored the record
    Saved(ContactRecord),
    /// The server or the transport refused the request
    Failed(SubmitFailure),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs submissions for one form session
#[derive(Debug, Default)]
pub struct SubmissionCoordinator {
    in_flight: AtomicBool,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is currently running
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Validate and send a draft. Failures are reported once and never retried.
    pub async fn submit<A>(&self, api: &A, draft: &ContactDraft) -> SubmitOutcome
    where
        A: ContactApi,
    {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Rejected;
        };

        let errors = validate(draft);
        if !errors.is_valid() {
            tracing::debug!(fields = errors.len(), "Draft failed validation, not submitting");
            return SubmitOutcome::Invalid(errors);
        }

        let payload = ContactPayload::from(draft);
        tracing::info!(id = ?draft.id, "Submitting contact");

        match api.submit_record(draft.id, &payload).await {
            Ok(record) => {
                tracing::info!(id = record.id, "Contact saved");
                SubmitOutcome::Saved(record)
            }
            Err(e) => {
                tracing::warn!("Contact submission failed: {}", e);
                SubmitOutcome::Failed(SubmitFailure {
                    message: e.user_message(),
                    errors: e.field_errors(),
                })
            }
        }
    }
}
