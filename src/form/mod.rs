//! Registration form
//!
//! The controller holds the draft and talks to three collaborators supplied
//! by the host:
//! - a handler callback that receives each valid record
//! - a `RegistryStore` that persists it
//! - a `Notifier` that shows the outcome to the user

mod controller;
mod errors;
mod notify;
mod store;

pub use controller::{RegistrationForm, SubmitOutcome, ValidationMode};
pub use errors::{HandlerError, StoreError, StoreResult, SubmissionError};
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use store::{
    load_record, save_record, FileStore, MemoryStore, RegistryStore, DEFAULT_STORAGE_KEY,
    REGISTRY_FILE,
};
