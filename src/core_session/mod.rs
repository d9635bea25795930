pub mod listing;
pub mod outcome;
pub mod remote_path;
pub mod session;

#[cfg(test)]
mod test_session;

pub use listing::{is_directory_entry, resolve_selection, Selection};
pub use outcome::{DownloadOutcome, LoginOutcome, LogoutOutcome};
pub use session::{Session, TransferSettings};
