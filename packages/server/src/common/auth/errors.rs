use thiserror::Error;

/// Authorization failures for studio back-office operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid or expired token")]
    InvalidToken,
}
