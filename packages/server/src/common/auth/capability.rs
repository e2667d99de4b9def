/// Back-office capabilities gated behind the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Freeze or reopen a reference's selection
    ToggleSelectionLock,

    /// Read customer change requests
    ReadEditRequests,

    /// Edit and list every review regardless of status
    ModerateReviews,

    /// Freeze a review into its public snapshot
    PublishReviews,
}

impl AdminCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleSelectionLock => "toggle_selection_lock",
            Self::ReadEditRequests => "read_edit_requests",
            Self::ModerateReviews => "moderate_reviews",
            Self::PublishReviews => "publish_reviews",
        }
    }
}
