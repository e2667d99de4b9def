use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::ReferenceId;

/// Canonical record for one reference code.
///
/// Created implicitly the first time anything touches the reference; only the
/// lock fields ever change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub reference_id: ReferenceId,
    pub selection_locked: bool,
    pub selection_locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(reference_id: ReferenceId, now: DateTime<Utc>) -> Self {
        Self {
            reference_id,
            selection_locked: false,
            selection_locked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a lock toggle in place and reports whether the record changed.
    ///
    /// Repeating the current value leaves every field untouched, including the
    /// original `selection_locked_at`.
    pub fn apply_lock(&mut self, locked: bool, now: DateTime<Utc>) -> bool {
        if self.selection_locked == locked {
            return false;
        }
        self.selection_locked = locked;
        self.selection_locked_at = locked.then_some(now);
        self.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn project() -> Project {
        Project::new(ReferenceId::parse("abc123").unwrap(), Utc::now())
    }

    #[test]
    fn test_lock_sets_timestamp() {
        let mut p = project();
        let now = Utc::now();
        assert!(p.apply_lock(true, now));
        assert!(p.selection_locked);
        assert_eq!(p.selection_locked_at, Some(now));
    }

    #[test]
    fn test_relock_is_noop() {
        let mut p = project();
        let first = Utc::now();
        p.apply_lock(true, first);
        let before = p.clone();

        assert!(!p.apply_lock(true, first + Duration::minutes(5)));
        assert_eq!(p, before);
    }

    #[test]
    fn test_true_false_true() {
        let mut p = project();
        let t0 = Utc::now();
        p.apply_lock(true, t0);
        p.apply_lock(false, t0 + Duration::seconds(1));
        assert!(!p.selection_locked);
        assert_eq!(p.selection_locked_at, None);

        let t2 = t0 + Duration::seconds(2);
        p.apply_lock(true, t2);
        assert!(p.selection_locked);
        assert_eq!(p.selection_locked_at, Some(t2));
    }
}
