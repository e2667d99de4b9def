// Business domains
pub mod auth;
pub mod media;
pub mod reviews;
pub mod selection;
