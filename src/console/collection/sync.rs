//! Synchronizer
//!
//! Turns user intents into gateway calls and reconciles their results into
//! the console state. Intent methods are synchronous: they validate, flip the
//! busy flags and spawn the request. Results come back over a channel and are
//! applied by [`Synchronizer::poll`] (once per UI tick) or by awaiting
//! [`Synchronizer::next_completion`].
//!
//! Requests are spawned on the runtime handle given at construction, so
//! intents can be called from threads outside that runtime, such as a UI
//! thread. A request task that panics reports back as a failed result of
//! its own kind.
//!
//! # Reconciliation rules
//!
//! - Results are applied in the order the requests complete. The last one to
//!   complete wins, including a `list` that was issued earlier than another.
//! - Local state is only patched after the server accepted the change.
//! - An update whose record has since disappeared is dropped, never
//!   re-inserted.
//! - Completing an edit only closes the modal if it is still showing the same
//!   edit session.
//! - Removing the selected record, by delete or by a refresh that no longer
//!   lists it, closes its modal.
//! - In-flight requests are never cancelled.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::console::collection::draft::{CreateForm, FieldInput};
use crate::console::collection::modal::{Modal, ModalController, ModalKind};
use crate::console::collection::store::CollectionStore;
use crate::console::error::{ConsoleError, GatewayError};
use crate::console::gateway::CollectionGateway;
use crate::shared::{Software, SoftwareFields};

/// Everything the collection screen renders from
#[derive(Debug, Default)]
pub struct ConsoleState {
    store: CollectionStore,
    modal: ModalController,
    create_form: CreateForm,
}

impl ConsoleState {
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create_form
    }

    /// The record the open modal refers to
    pub fn selected(&self) -> Option<&Software> {
        self.modal.selected_id().and_then(|id| self.store.get(id))
    }
}

/// Result of a spawned gateway call
#[derive(Debug)]
enum Completion {
    Listed(Result<Vec<Software>, GatewayError>),
    Created(Result<Software, GatewayError>),
    Updated {
        id: String,
        session: u64,
        fields: SoftwareFields,
        result: Result<(), GatewayError>,
    },
    Deleted {
        id: String,
        result: Result<(), GatewayError>,
    },
}

pub struct Synchronizer<G> {
    gateway: Arc<G>,
    runtime: Handle,
    state: ConsoleState,
    /// Delete waiting for the user to confirm
    pending_delete: Option<String>,
    /// Ids with a delete in flight
    deleting: HashSet<String>,
    in_flight: usize,
    completion_tx: UnboundedSender<Completion>,
    completion_rx: UnboundedReceiver<Completion>,
}

impl<G> Synchronizer<G>
where
    G: CollectionGateway + 'static,
{
    pub fn new(gateway: G, runtime: Handle) -> Self {
        Self::with_shared(Arc::new(gateway), runtime)
    }

    pub fn with_shared(gateway: Arc<G>, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            runtime,
            state: ConsoleState::default(),
            pending_delete: None,
            deleting: HashSet::new(),
            in_flight: 0,
            completion_tx,
            completion_rx,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Number of requests whose results have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether the record under edit changed locally since the draft was seeded
    pub fn draft_is_stale(&self) -> bool {
        match self.state.modal.modal() {
            Modal::Editing { id, draft } => self
                .state
                .store
                .revision(id)
                .is_some_and(|revision| revision != draft.seeded_revision()),
            _ => false,
        }
    }

    /// Input fields of the create form, while it is open
    pub fn create_input(&mut self) -> Option<&mut FieldInput> {
        if self.state.create_form.is_open() {
            Some(&mut self.state.create_form.fields)
        } else {
            None
        }
    }

    /// Input fields of the edit draft, while editing
    pub fn draft_input(&mut self) -> Option<&mut FieldInput> {
        self.state.modal.draft_mut().map(|draft| &mut draft.fields)
    }

    pub fn dismiss_error(&mut self) {
        self.state.store.dismiss_error();
    }

    /// Load or reload the whole collection
    pub fn refresh(&mut self) {
        tracing::info!("[SYNC] Refreshing collection");
        self.state.store.begin_load();
        self.dispatch(
            |gateway| async move { Completion::Listed(gateway.list().await) },
            |err| Completion::Listed(Err(err)),
        );
    }

    pub fn open_create(&mut self) -> Result<(), ConsoleError> {
        if self.state.create_form.is_submitting() {
            return Err(ConsoleError::Busy("create"));
        }
        let kind = self.state.modal.kind();
        if kind != ModalKind::Closed {
            return Err(ConsoleError::InvalidTransition {
                action: "open create",
                state: kind.as_str(),
            });
        }
        self.state.create_form.open();
        Ok(())
    }

    pub fn close_create(&mut self) -> Result<(), ConsoleError> {
        if self.state.create_form.is_submitting() {
            return Err(ConsoleError::Busy("create"));
        }
        self.state.create_form.close();
        Ok(())
    }

    pub fn submit_create(&mut self) -> Result<(), ConsoleError> {
        let form = &mut self.state.create_form;
        if !form.is_open() {
            return Err(ConsoleError::InvalidTransition {
                action: "submit create",
                state: "closed",
            });
        }
        if form.is_submitting() {
            return Err(ConsoleError::Busy("create"));
        }
        let fields = match form.fields.validate() {
            Ok(fields) => fields,
            Err(err) => {
                form.fail(err.to_string());
                return Err(err.into());
            }
        };
        form.begin_submit();

        tracing::info!("[SYNC] Creating '{}'", fields.display_name);
        self.dispatch(
            move |gateway| async move { Completion::Created(gateway.create(&fields).await) },
            |err| Completion::Created(Err(err)),
        );
        Ok(())
    }

    pub fn open_view(&mut self, id: &str) -> Result<(), ConsoleError> {
        self.ensure_create_closed("open view")?;
        self.state.modal.open_view(id, &self.state.store)
    }

    pub fn close_view(&mut self) -> Result<(), ConsoleError> {
        self.state.modal.close()
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), ConsoleError> {
        self.ensure_create_closed("open edit")?;
        let session = self.state.modal.open_edit(id, &self.state.store)?;
        tracing::debug!("[SYNC] Editing '{}' (session {})", id, session);
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<(), ConsoleError> {
        self.state.modal.cancel_edit()
    }

    pub fn submit_edit(&mut self) -> Result<(), ConsoleError> {
        let (id, session, validated) = match self.state.modal.modal() {
            Modal::Editing { id, draft } => {
                if draft.is_submitting() {
                    return Err(ConsoleError::Busy("update"));
                }
                (id.clone(), draft.session(), draft.fields.validate())
            }
            _ => {
                return Err(ConsoleError::InvalidTransition {
                    action: "submit edit",
                    state: self.state.modal.kind().as_str(),
                })
            }
        };
        let fields = match validated {
            Ok(fields) => fields,
            Err(err) => {
                self.state.modal.fail_edit(session, &err.to_string());
                return Err(err.into());
            }
        };
        if !self.state.store.contains(&id) {
            return Err(ConsoleError::NotFound(id));
        }
        if let Some(draft) = self.state.modal.draft_mut() {
            draft.begin_submit();
        }

        tracing::info!("[SYNC] Updating '{}'", id);
        let aborted = {
            let (id, fields) = (id.clone(), fields.clone());
            move |err| Completion::Updated { id, session, fields, result: Err(err) }
        };
        self.dispatch(
            move |gateway| async move {
                let result = gateway.update(&id, &fields).await;
                Completion::Updated { id, session, fields, result }
            },
            aborted,
        );
        Ok(())
    }

    /// First step of a delete: park it until the user confirms
    pub fn request_delete(&mut self, id: &str) -> Result<(), ConsoleError> {
        if !self.state.store.contains(id) {
            return Err(ConsoleError::NotFound(id.to_string()));
        }
        if self.deleting.contains(id) {
            return Err(ConsoleError::Busy("delete"));
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Result<(), ConsoleError> {
        let id = self.pending_delete.take().ok_or(ConsoleError::NoPendingDelete)?;
        if !self.state.store.contains(&id) {
            return Err(ConsoleError::NotFound(id));
        }
        if !self.deleting.insert(id.clone()) {
            return Err(ConsoleError::Busy("delete"));
        }

        tracing::info!("[SYNC] Deleting '{}'", id);
        let aborted = {
            let id = id.clone();
            move |err| Completion::Deleted { id, result: Err(err) }
        };
        self.dispatch(
            move |gateway| async move {
                let result = gateway.delete(&id).await;
                Completion::Deleted { id, result }
            },
            aborted,
        );
        Ok(())
    }

    /// Apply every result that has already arrived. Never waits.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next result and apply it. Returns `false` when nothing
    /// is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completion_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Wait until every in-flight request has been applied
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn ensure_create_closed(&self, action: &'static str) -> Result<(), ConsoleError> {
        if self.state.create_form.is_open() {
            return Err(ConsoleError::InvalidTransition { action, state: "creating" });
        }
        Ok(())
    }

    /// Spawn `call` and report its completion. If the request task dies,
    /// `aborted` builds the failed completion so `in_flight` and the busy
    /// flags still unwind.
    fn dispatch<F, Fut, A>(&mut self, call: F, aborted: A)
    where
        F: FnOnce(Arc<G>) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
        A: FnOnce(GatewayError) -> Completion + Send + 'static,
    {
        let request = self.runtime.spawn(call(Arc::clone(&self.gateway)));
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let completion = match request.await {
                Ok(completion) => completion,
                Err(err) => {
                    tracing::error!("[SYNC] Request task failed: {}", err);
                    aborted(GatewayError::transport(format!("Request task failed: {}", err)))
                }
            };
            if tx.send(completion).is_err() {
                tracing::debug!("[SYNC] Synchronizer dropped before a request completed");
            }
        });
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let state = &mut self.state;

        match completion {
            Completion::Listed(Ok(records)) => {
                tracing::info!("[SYNC] Loaded {} records", records.len());
                state.store.load_succeeded(records);
                let vanished = state
                    .modal
                    .selected_id()
                    .filter(|id| !state.store.contains(id))
                    .map(str::to_string);
                if let Some(id) = vanished {
                    tracing::warn!("[SYNC] '{}' is no longer listed, closing its modal", id);
                    state.modal.force_close_if_selected(&id);
                }
                if self.pending_delete.as_deref().is_some_and(|id| !state.store.contains(id)) {
                    self.pending_delete = None;
                }
            }
            Completion::Listed(Err(err)) => {
                tracing::error!("[SYNC] Failed to load collection: {}", err);
                state.store.load_failed(err.to_string());
            }
            Completion::Created(Ok(record)) => {
                let id = record.id.clone();
                match state.store.insert(record) {
                    Ok(()) => tracing::info!("[SYNC] Created '{}'", id),
                    Err(err) => tracing::warn!("[SYNC] Created record already present: {}", err),
                }
                state.create_form.close();
            }
            Completion::Created(Err(err)) => {
                tracing::error!("[SYNC] Failed to create software: {}", err);
                state.create_form.fail(err.to_string());
            }
            Completion::Updated { id, session, fields, result: Ok(()) } => {
                match state.store.apply_update(&id, &fields, Utc::now()) {
                    Some(revision) => {
                        tracing::info!("[SYNC] Updated '{}' (revision {})", id, revision)
                    }
                    None => tracing::warn!(
                        "[SYNC] '{}' was removed before its update landed, dropping it",
                        id
                    ),
                }
                state.modal.finish_edit(session);
            }
            Completion::Updated { id, session, result: Err(err), .. } => {
                tracing::error!("[SYNC] Failed to update '{}': {}", id, err);
                if !state.modal.fail_edit(session, &err.to_string()) {
                    tracing::debug!("[SYNC] Edit session {} already closed", session);
                }
            }
            Completion::Deleted { id, result } => {
                self.deleting.remove(&id);
                match result {
                    Ok(()) => {
                        if state.store.remove(&id).is_none() {
                            tracing::debug!("[SYNC] '{}' was already gone", id);
                        }
                        if state.modal.force_close_if_selected(&id) {
                            tracing::info!("[SYNC] Closed modal for deleted '{}'", id);
                        }
                        tracing::info!("[SYNC] Deleted '{}'", id);
                    }
                    Err(err) => {
                        tracing::error!("[SYNC] Failed to delete '{}': {}", id, err);
                        state.store.report(format!("Failed to delete software: {}", err));
                    }
                }
            }
        }
    }
}
