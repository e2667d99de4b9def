use super::{AdminCapability, AuthError};

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// Actor::from(auth_user.as_ref())
///     .can(AdminCapability::PublishReviews)
///     .check()?;
/// ```
///
/// The admin flag is produced by the token-verification middleware; nothing
/// here re-validates it.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    subject: Option<String>,
    is_admin: bool,
}

impl Actor {
    pub fn new(subject: impl Into<String>, is_admin: bool) -> Self {
        Self {
            subject: Some(subject.into()),
            is_admin,
        }
    }

    /// An unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Specify what capability the actor needs
    pub fn can(&self, capability: AdminCapability) -> CapabilityBuilder<'_> {
        CapabilityBuilder {
            actor: self,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    actor: &'a Actor,
    capability: AdminCapability,
}

impl CapabilityBuilder<'_> {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        if self.actor.subject.is_none() {
            tracing::debug!(capability = self.capability.as_str(), "anonymous caller rejected");
            return Err(AuthError::AuthenticationRequired);
        }
        if !self.actor.is_admin {
            tracing::debug!(
                capability = self.capability.as_str(),
                subject = ?self.actor.subject,
                "non-admin caller rejected"
            );
            return Err(AuthError::AdminRequired);
        }
        Ok(())
    }
}
