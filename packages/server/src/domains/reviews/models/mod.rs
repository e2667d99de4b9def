pub mod review;

pub use review::{NewReview, Review, ReviewContent, ReviewEdit, ReviewStatus};
