//! Selection domain - per-reference selection history, lock and edit requests
//!
//! Responsibilities:
//! - Versioned, append-only record of the assets a customer picked
//! - Admin lock that freezes further selections
//! - Post-lock edit request log

pub mod actions;
pub mod data;
pub mod models;

pub use data::{EditRequestData, LockStateData, SelectionVersionData};
pub use models::{EditRequest, Project, SelectionVersion};
