pub mod edit_request;
pub mod project;
pub mod selection_version;

pub use edit_request::EditRequest;
pub use project::Project;
pub use selection_version::{normalize_asset_ids, NewSelectionVersion, SelectionVersion};
