pub mod publication;

pub use publication::{
    edit_review, list_all_reviews, list_public_reviews, publish_review, submit_review,
};
