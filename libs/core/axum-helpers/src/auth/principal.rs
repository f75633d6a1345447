use crate::errors::AppError;
use uuid::Uuid;

/// The authenticated caller.
///
/// Constructed once by the auth middleware from a verified token plus a
/// fresh user-directory lookup, then passed to handlers through request
/// extensions. Replaces passing identity and role around as loose
/// key/value data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub is_admin: bool,
    pub is_active: bool,
}

impl Principal {
    /// Whether this caller may act on a resource owned by `owner`.
    pub fn owns_or_admin(&self, owner: Uuid) -> bool {
        self.is_admin || self.id == owner
    }

    /// Reject non-admin callers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Reject callers that are neither the owner nor an admin.
    pub fn require_self_or_admin(&self, owner: Uuid) -> Result<(), AppError> {
        if self.owns_or_admin(owner) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(is_admin: bool) -> Principal {
        Principal {
            id: Uuid::now_v7(),
            is_admin,
            is_active: true,
        }
    }

    #[test]
    fn test_admin_passes_all_guards() {
        let p = principal(true);
        assert!(p.require_admin().is_ok());
        assert!(p.require_self_or_admin(Uuid::now_v7()).is_ok());
    }

    #[test]
    fn test_non_admin_rejected_from_admin_guard() {
        assert!(principal(false).require_admin().is_err());
    }

    #[test]
    fn test_owner_passes_self_guard() {
        let p = principal(false);
        assert!(p.require_self_or_admin(p.id).is_ok());
        assert!(p.require_self_or_admin(Uuid::now_v7()).is_err());
    }
}
