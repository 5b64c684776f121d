//! File host client state.
//!
//! Session lifecycle, the notification slot, and the files and sharing
//! stores, all driven from one single-threaded executor through a
//! [`ClientContext`].

pub mod context;
pub mod credential;
pub mod files;
pub mod format;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod sharing;
pub mod validation;

pub use context::ClientContext;
pub use credential::Credential;
pub use files::FilesStore;
pub use format::{format_date, format_file_size};
pub use navigation::{History, Navigator, Route};
pub use notify::{NotificationMessage, Notifier, Severity, TRANSITION_DELAY};
pub use session::{SessionPhase, SessionStore, SessionUser};
pub use sharing::SharingStore;
pub use validation::{
    content_type_for, validate_file, validate_files, FileCandidate, ValidationError,
    ValidationReport,
};
