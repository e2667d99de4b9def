// Common types shared across the service

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;
pub mod reference;

pub use auth::{Actor, AdminCapability, AuthError};
pub use entity_ids::*;
pub use error::{CoreError, CoreResult};
pub use id::Id;
pub use reference::{ReferenceId, ReferenceIdError};
