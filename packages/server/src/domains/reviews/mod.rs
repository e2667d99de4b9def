//! Reviews domain - client reviews and their publication pipeline
//!
//! Lifecycle: draft -> published (terminal). Publishing freezes a copy of the
//! display fields; later edits only reach the public site on the next publish.

pub mod actions;
pub mod data;
pub mod models;

pub use data::{PublicReview, ReviewData};
pub use models::{NewReview, Review, ReviewContent, ReviewEdit, ReviewStatus};
