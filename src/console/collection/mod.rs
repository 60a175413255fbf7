//! Collection screen state
//!
//! - `store` - local copy of the software list and its load status
//! - `modal` - which record is being viewed or edited
//! - `draft` - form buffers for the create and edit modals
//! - `sync` - the synchronizer that drives all of the above from gateway results

pub mod draft;
pub mod modal;
pub mod store;
pub mod sync;

pub use draft::{CreateForm, EditDraft, FieldInput};
pub use modal::{Modal, ModalController, ModalKind};
pub use store::{CollectionStore, LoadStatus};
pub use sync::{ConsoleState, Synchronizer};
