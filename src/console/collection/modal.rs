//! Selection & Modal Controller
//!
//! The view and edit modals share one sum type, so at most one of them can be
//! open and the selected id always belongs to whichever is open.
//!
//! ```text
//! closed  --open_view(id)-->  viewing
//! closed  --open_edit(id)-->  editing     (draft seeded from the store)
//! viewing --open_edit(id)-->  editing
//! viewing --close-->          closed
//! editing --cancel-->         closed      (draft discarded)
//! editing --submit ok-->      closed
//! any     --selected id removed-->  closed
//! ```

use crate::console::collection::draft::EditDraft;
use crate::console::collection::store::CollectionStore;
use crate::console::error::ConsoleError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Viewing {
        id: String,
    },
    Editing {
        id: String,
        draft: EditDraft,
    },
}

/// Which modal is showing, without its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Closed,
    Viewing,
    Editing,
}

impl ModalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalKind::Closed => "closed",
            ModalKind::Viewing => "viewing",
            ModalKind::Editing => "editing",
        }
    }
}

#[derive(Debug, Default)]
pub struct ModalController {
    modal: Modal,
    next_session: u64,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn kind(&self) -> ModalKind {
        match self.modal {
            Modal::Closed => ModalKind::Closed,
            Modal::Viewing { .. } => ModalKind::Viewing,
            Modal::Editing { .. } => ModalKind::Editing,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.modal {
            Modal::Closed => None,
            Modal::Viewing { id } | Modal::Editing { id, .. } => Some(id),
        }
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match &self.modal {
            Modal::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        match &mut self.modal {
            Modal::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Open the details modal. Switching from one viewed record to another
    /// is allowed; an open edit is never replaced.
    pub fn open_view(&mut self, id: &str, store: &CollectionStore) -> Result<(), ConsoleError> {
        if let Modal::Editing { .. } = self.modal {
            return Err(self.rejected("open view"));
        }
        if !store.contains(id) {
            return Err(ConsoleError::NotFound(id.to_string()));
        }
        self.modal = Modal::Viewing { id: id.to_string() };
        Ok(())
    }

    /// Open the edit modal with a draft seeded from the store's current copy.
    ///
    /// Returns the session token of the new draft.
    pub fn open_edit(&mut self, id: &str, store: &CollectionStore) -> Result<u64, ConsoleError> {
        if let Modal::Editing { .. } = self.modal {
            return Err(self.rejected("open edit"));
        }
        let (record, revision) = store
            .get(id)
            .zip(store.revision(id))
            .ok_or_else(|| ConsoleError::NotFound(id.to_string()))?;

        let session = self.next_session;
        self.next_session += 1;
        self.modal = Modal::Editing {
            id: id.to_string(),
            draft: EditDraft::seed(record, revision, session),
        };
        Ok(session)
    }

    /// Close the details modal
    pub fn close(&mut self) -> Result<(), ConsoleError> {
        match self.modal {
            Modal::Editing { .. } => Err(self.rejected("close")),
            _ => {
                self.modal = Modal::Closed;
                Ok(())
            }
        }
    }

    /// Discard the draft and close the edit modal
    pub fn cancel_edit(&mut self) -> Result<(), ConsoleError> {
        let submitting = match self.draft() {
            Some(draft) => draft.is_submitting(),
            None => return Err(self.rejected("cancel edit")),
        };
        if submitting {
            return Err(ConsoleError::Busy("update"));
        }
        self.modal = Modal::Closed;
        Ok(())
    }

    /// Close the edit modal after its submit succeeded, if it is still the
    /// same edit session.
    pub(crate) fn finish_edit(&mut self, session: u64) -> bool {
        let same_session = self.draft().is_some_and(|draft| draft.session() == session);
        if same_session {
            self.modal = Modal::Closed;
        }
        same_session
    }

    /// Surface a failed submit in the edit modal, if it is still open for
    /// that session. The draft fields are left as they were.
    pub(crate) fn fail_edit(&mut self, session: u64, message: &str) -> bool {
        match &mut self.modal {
            Modal::Editing { draft, .. } if draft.session() == session => {
                draft.fail(message);
                true
            }
            _ => false,
        }
    }

    /// Close whatever modal refers to `id`
    pub(crate) fn force_close_if_selected(&mut self, id: &str) -> bool {
        if self.selected_id() == Some(id) {
            self.modal = Modal::Closed;
            true
        } else {
            false
        }
    }

    fn rejected(&self, action: &'static str) -> ConsoleError {
        ConsoleError::InvalidTransition {
            action,
            state: self.kind().as_str(),
        }
    }
}
