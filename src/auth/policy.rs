//! Per-resource mutation policy: a principal may mutate an owned resource
//! when it is the owner or holds one of the elevated roles for that
//! endpoint. Elevated sets are per-endpoint configuration, passed in by the
//! caller; there is deliberately no shared policy table.

use crate::auth::token::Principal;
use crate::error::ApiError;
use crate::models::user::Role;

/// Roles that may manage problems and tags.
pub const CONTENT_MANAGERS: &[Role] = &[Role::Admin, Role::Interviewer];

/// Roles that may change user roles or deactivate accounts.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles that may adjust user ratings.
pub const RATING_MANAGERS: &[Role] = &[Role::Admin, Role::Interviewer];

/// Roles that may browse the user directory.
pub const USER_DIRECTORY: &[Role] = &[Role::Admin, Role::Interviewer];

/// Roles that bypass ownership on owned resources (comments, materials,
/// problems).
pub const OWNERSHIP_OVERRIDE: &[Role] = &[Role::Admin];

/// True iff the principal owns the resource or holds an elevated role.
/// Callers must pass the owner id as persisted, never as supplied by the
/// request body.
pub fn can_mutate(principal: &Principal, resource_owner_id: i64, elevated_roles: &[Role]) -> bool {
    principal.user_id == resource_owner_id || elevated_roles.contains(&principal.role)
}

/// `can_mutate` as a guard, failing with 403 and the given message.
pub fn ensure_can_mutate(
    principal: &Principal,
    resource_owner_id: i64,
    elevated_roles: &[Role],
    denied: &str,
) -> Result<(), ApiError> {
    if can_mutate(principal, resource_owner_id, elevated_roles) {
        Ok(())
    } else {
        Err(ApiError::forbidden(denied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(user_id: i64, role: Role) -> Principal {
        Principal { user_id, role }
    }

    #[test]
    fn owner_may_always_mutate() {
        for role in [Role::User, Role::Admin, Role::Interviewer] {
            assert!(can_mutate(&principal(5, role), 5, OWNERSHIP_OVERRIDE));
            assert!(can_mutate(&principal(5, role), 5, &[]));
        }
    }

    #[test]
    fn elevation_beats_ownership_mismatch() {
        assert!(can_mutate(&principal(1, Role::Admin), 2, OWNERSHIP_OVERRIDE));
        assert!(can_mutate(&principal(1, Role::Interviewer), 2, CONTENT_MANAGERS));
    }

    #[test]
    fn non_owner_without_elevation_is_denied() {
        assert!(!can_mutate(&principal(1, Role::User), 2, OWNERSHIP_OVERRIDE));
        assert!(!can_mutate(&principal(1, Role::Interviewer), 2, OWNERSHIP_OVERRIDE));
        assert!(!can_mutate(&principal(1, Role::User), 2, &[]));
    }

    // Exhaustive truth table over role x ownership for the default
    // elevated set {admin}.
    #[test]
    fn truth_table_for_admin_elevation() {
        let cases = [
            (Role::User, true, true),
            (Role::User, false, false),
            (Role::Admin, true, true),
            (Role::Admin, false, true),
            (Role::Interviewer, true, true),
            (Role::Interviewer, false, false),
        ];
        for (role, owns, expected) in cases {
            let owner_id = if owns { 10 } else { 99 };
            assert_eq!(
                can_mutate(&principal(10, role), owner_id, OWNERSHIP_OVERRIDE),
                expected,
                "role {:?}, owns {}",
                role,
                owns
            );
        }
    }

    #[test]
    fn ensure_translates_to_forbidden() {
        let err = ensure_can_mutate(&principal(1, Role::User), 2, OWNERSHIP_OVERRIDE, "Not authorized")
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(ensure_can_mutate(&principal(2, Role::User), 2, OWNERSHIP_OVERRIDE, "x").is_ok());
    }
}
