// HTTP middleware
pub mod jwt_auth;
pub mod store_ready;

pub use jwt_auth::*;
pub use store_ready::*;
