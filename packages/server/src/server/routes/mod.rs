// HTTP routes
pub mod edit_requests;
pub mod health;
pub mod media;
pub mod reviews;
pub mod selection;

pub use edit_requests::*;
pub use health::*;
pub use media::*;
pub use reviews::*;
pub use selection::*;

use axum::extract::Extension;

use crate::common::Actor;
use crate::server::middleware::AuthUser;

/// The caller as domain actions see it
pub(crate) fn actor_from(auth: &Option<Extension<AuthUser>>) -> Actor {
    Actor::from(auth.as_ref().map(|Extension(user)| user))
}
