pub mod edit_requests;
pub mod lock;
pub mod versions;

pub use edit_requests::{list_edit_requests, submit_edit_request};
pub use lock::{selection_lock_status, set_selection_lock};
pub use versions::{create_selection_version, list_selection_versions};
