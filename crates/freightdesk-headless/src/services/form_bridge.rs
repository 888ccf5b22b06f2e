// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Headless - Form Session Bridge
//
// Runs one form session on a tokio runtime and exchanges commands and
// events with the host over channels.

use async_channel::{Receiver, Sender, TrySendError};
use freightdesk_core::{
    ApiError, AppError, ContactApi, ContactDraft, ContactRecord, FieldStore, FormAction,
    FormErrors, SubmissionCoordinator, SubmitFailure, SubmitOutcome,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::Instrument;
use uuid::Uuid;

/// Commands that can be sent to a form session
#[derive(Debug)]
pub enum FormCommand {
    Dispatch(FormAction),
    Load { id: u64 },
    Submit,
    Snapshot { reply: Sender<SessionView> },
    Close,
}

/// Events a form session reports back
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormEvent {
    /// Lossy: dropped while the event channel is full
    Changed {
        snapshot: ContactDraft,
        errors: FormErrors,
        dirty: bool,
    },
    Loaded {
        id: u64,
    },
    LoadFailed {
        message: String,
        #[serde(skip)]
        error: ApiError,
    },
    Submitting,
    Submitted {
        record: ContactRecord,
    },
    SubmitRejected,
    SubmitInvalid {
        errors: FormErrors,
    },
    SubmitFailed {
        failure: SubmitFailure,
    },
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub snapshot: ContactDraft,
    pub errors: FormErrors,
    pub dirty: bool,
    pub loading: bool,
    pub submitting: bool,
    /// Set once a submission succeeded; the draft takes no more edits
    pub finished: bool,
}

/// Whether the screen that owns a session is still mounted.
///
/// Results that arrive after an await only touch the store or produce
/// events while this holds.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of spawned API calls, fed back into the session loop
enum Completion {
    Loaded {
        id: u64,
        result: Result<ContactRecord, ApiError>,
    },
    Submitted(SubmitOutcome),
}

/// State owned by the session task
struct Session<A> {
    api: Arc<A>,
    store: FieldStore,
    coordinator: Arc<SubmissionCoordinator>,
    liveness: Liveness,
    event_tx: Sender<FormEvent>,
    completion_tx: Sender<Completion>,
    loads_pending: usize,
    submit_pending: bool,
    finished: bool,
}

impl<A> Session<A>
where
    A: ContactApi + 'static,
{
    async fn run(mut self, command_rx: Receiver<FormCommand>, completion_rx: Receiver<Completion>) {
        tracing::info!("Form session started");

        loop {
            tokio::select! {
                // Handle commands from the host
                cmd = command_rx.recv() => {
                    match cmd {
                        Ok(FormCommand::Close) | Err(_) => break,
                        Ok(command) => {
                            if self.handle_command(command).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                // Apply results of finished API calls
                done = completion_rx.recv() => {
                    if let Ok(done) = done {
                        if self.handle_completion(done).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        // Drop queued commands so pending snapshot replies see a closed channel
        command_rx.close();
        while command_rx.try_recv().is_ok() {}

        tracing::info!("Form session closed");
    }

    async fn emit(&self, event: FormEvent) -> Result<(), AppError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| AppError::SessionClosed)
    }

    /// Never waits for the host; `Snapshot` always has the current state
    fn emit_changed(&self) -> Result<(), AppError> {
        let event = FormEvent::Changed {
            snapshot: self.store.snapshot().clone(),
            errors: self.store.errors().clone(),
            dirty: self.store.is_dirty(),
        };

        match self.event_tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Event channel full, dropping change notification");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(AppError::SessionClosed),
        }
    }

    fn view(&self) -> SessionView {
        SessionView {
            snapshot: self.store.snapshot().clone(),
            errors: self.store.errors().clone(),
            dirty: self.store.is_dirty(),
            loading: self.loads_pending > 0,
            submitting: self.submit_pending || self.coordinator.is_submitting(),
            finished: self.finished,
        }
    }

    async fn handle_command(&mut self, command: FormCommand) -> Result<(), AppError> {
        match command {
            FormCommand::Dispatch(action) => {
                if self.finished {
                    tracing::warn!(action = action.kind(), "Session already submitted, ignoring edit");
                    return Ok(());
                }
                self.store.dispatch(action);
                self.emit_changed()
            }
            FormCommand::Load { id } => {
                self.loads_pending += 1;

                let api = self.api.clone();
                let completion_tx = self.completion_tx.clone();
                tokio::spawn(
                    async move {
                        let result = api.fetch_record(id).await;
                        let _ = completion_tx.send(Completion::Loaded { id, result }).await;
                    }
                    .in_current_span(),
                );
                Ok(())
            }
            FormCommand::Submit => {
                if self.finished || self.submit_pending {
                    tracing::debug!("Submit ignored, session is busy or finished");
                    return self.emit(FormEvent::SubmitRejected).await;
                }

                self.submit_pending = true;
                self.emit(FormEvent::Submitting).await?;

                let api = self.api.clone();
                let coordinator = self.coordinator.clone();
                let draft = self.store.snapshot().clone();
                let completion_tx = self.completion_tx.clone();
                tokio::spawn(
                    async move {
                        let outcome = coordinator.submit(api.as_ref(), &draft).await;
                        let _ = completion_tx.send(Completion::Submitted(outcome)).await;
                    }
                    .in_current_span(),
                );
                Ok(())
            }
            FormCommand::Snapshot { reply } => {
                let _ = reply.send(self.view()).await;
                Ok(())
            }
            FormCommand::Close => Ok(()),
        }
    }

    async fn handle_completion(&mut self, done: Completion) -> Result<(), AppError> {
        // Session bookkeeping applies whether or not the host is still there
        match &done {
            Completion::Loaded { .. } => {
                self.loads_pending = self.loads_pending.saturating_sub(1);
            }
            Completion::Submitted(outcome) => {
                self.submit_pending = false;
                if outcome.is_saved() {
                    self.finished = true;
                }
            }
        }

        if !self.liveness.is_alive() {
            tracing::debug!("Session detached, discarding late result");
            return Ok(());
        }

        match done {
            Completion::Loaded { id, result: Ok(record) } => {
                if self.finished {
                    return Ok(());
                }
                self.store.dispatch(FormAction::LoadFromSource {
                    record: Box::new(record),
                });
                self.emit(FormEvent::Loaded { id }).await?;
                self.emit_changed()
            }
            Completion::Loaded { id, result: Err(error) } => {
                tracing::warn!("Failed to load contact {}: {}", id, error);
                self.emit(FormEvent::LoadFailed {
                    message: format!("Could not load contact {}: {}", id, error),
                    error,
                })
                .await
            }
            Completion::Submitted(SubmitOutcome::Saved(record)) => {
                self.emit(FormEvent::Submitted { record }).await
            }
            Completion::Submitted(SubmitOutcome::Rejected) => {
                self.emit(FormEvent::SubmitRejected).await
            }
            Completion::Submitted(SubmitOutcome::Invalid(errors)) => {
                self.emit(FormEvent::SubmitInvalid { errors }).await
            }
            Completion::Submitted(SubmitOutcome::Failed(failure)) => {
                self.emit(FormEvent::SubmitFailed { failure }).await
            }
        }
    }
}

/// Bridge between a host UI and one form session
pub struct FormBridge {
    session_id: Uuid,
    command_tx: Sender<FormCommand>,
    event_rx: Receiver<FormEvent>,
    liveness: Liveness,
    _runtime: Arc<Runtime>,
}

impl FormBridge {
    /// Open a session on a blank draft
    pub fn new<A>(api: Arc<A>) -> Result<Self, AppError>
    where
        A: ContactApi + 'static,
    {
        Self::with_store(api, FieldStore::new())
    }

    /// Open a session on an existing store
    pub fn with_store<A>(api: Arc<A>, store: FieldStore) -> Result<Self, AppError>
    where
        A: ContactApi + 'static,
    {
        let (command_tx, command_rx) = async_channel::bounded::<FormCommand>(32);
        let (event_tx, event_rx) = async_channel::bounded::<FormEvent>(64);
        let (completion_tx, completion_rx) = async_channel::unbounded::<Completion>();

        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .map_err(|e| AppError::Runtime(format!("Failed to create Tokio runtime: {}", e)))?,
        );

        let session_id = Uuid::new_v4();
        let liveness = Liveness::new();
        let session = Session {
            api,
            store,
            coordinator: Arc::new(SubmissionCoordinator::new()),
            liveness: liveness.clone(),
            event_tx,
            completion_tx,
            loads_pending: 0,
            submit_pending: false,
            finished: false,
        };

        let span = tracing::info_span!("form_session", id = %session_id);
        runtime.spawn(session.run(command_rx, completion_rx).instrument(span));

        Ok(Self {
            session_id,
            command_tx,
            event_rx,
            liveness,
            _runtime: runtime,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Get event receiver for subscribing to session events.
    ///
    /// `Changed` notifications are dropped while nobody drains the
    /// receiver; every other event waits for room.
    pub fn event_receiver(&self) -> Receiver<FormEvent> {
        self.event_rx.clone()
    }

    /// Send a command from a thread outside the runtime
    pub fn send_blocking(&self, command: FormCommand) -> Result<(), AppError> {
        self.command_tx
            .send_blocking(command)
            .map_err(|_| AppError::SessionClosed)
    }

    /// Fetch the current session view from a thread outside the runtime
    pub fn snapshot_blocking(&self) -> Result<SessionView, AppError> {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        self.send_blocking(FormCommand::Snapshot { reply: reply_tx })?;
        reply_rx.recv_blocking().map_err(|_| AppError::SessionClosed)
    }

    /// The owning screen went away; late results are dropped from now on
    pub fn detach(&self) {
        tracing::debug!(session = %self.session_id, "Detaching form session");
        self.liveness.detach();
    }

    /// Detach and stop the session task
    pub fn close(&self) {
        self.detach();
        if self.send_blocking(FormCommand::Close).is_err() {
            tracing::debug!(session = %self.session_id, "Form session already closed");
        }
    }
}

impl Drop for FormBridge {
    fn drop(&mut self) {
        self.liveness.detach();
        self.command_tx.close();
    }
}
