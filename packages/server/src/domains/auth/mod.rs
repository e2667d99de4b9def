//! Auth boundary - verifies role-bearing tokens issued by the login flow.
//!
//! The selection, review and media domains never see tokens; they receive an
//! `Actor` whose admin flag was derived from verified claims.

pub mod jwt;

pub use jwt::{Claims, JwtService, Role};
