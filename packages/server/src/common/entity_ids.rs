//! Typed ids for the records this service owns.

use super::id::Id;

/// Marker type for client reviews.
pub struct Review;

/// Marker type for post-lock edit requests.
pub struct EditRequest;

/// Marker type for selection version records.
pub struct SelectionVersion;

pub type ReviewId = Id<Review>;
pub type EditRequestId = Id<EditRequest>;
pub type SelectionVersionId = Id<SelectionVersion>;
