// Studio API - Core
//
// Backend for a photography studio's client portal: versioned image
// selections per booking reference, the selection lock, post-lock edit
// requests, review publication and the media relay.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
