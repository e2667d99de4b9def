/// Authorization for back-office operations
///
/// Token verification happens in the HTTP middleware; handlers turn the
/// verified user into an [`Actor`] and ask for a capability:
///
/// ```ignore
/// use crate::common::auth::{Actor, AdminCapability};
///
/// Actor::from(auth_user.as_ref())
///     .can(AdminCapability::ToggleSelectionLock)
///     .check()?;
/// ```

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::AdminCapability;
pub use errors::AuthError;
