//! Access Gate
//! Mission: Pure capability predicates over the current profile
//!
//! No I/O. Protected views and admin-only actions ask this layer one
//! question: does the current profile satisfy the requirement.

use super::models::{Role, UserProfile};

/// Admin level at which a non-admin role still clears the admin gate.
pub const ADMIN_LEVEL_THRESHOLD: u32 = 50;

/// A named authorization requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Admin role, or an admin level at or above the threshold.
    AdminOnly,
    /// Exactly this role, nothing else.
    RoleExactly(Role),
    /// Admin level at or above the given tier.
    MinAdminLevel(u32),
    /// Always allowed, profile or not.
    PublicPage,
}

/// Evaluate a requirement against the current profile.
///
/// An absent profile fails every requirement except `PublicPage`.
pub fn can_access(profile: Option<&UserProfile>, requirement: Requirement) -> bool {
    match requirement {
        Requirement::PublicPage => true,
        Requirement::AdminOnly => profile
            .map_or(false, |p| p.role == Role::Admin || p.admin_level >= ADMIN_LEVEL_THRESHOLD),
        Requirement::RoleExactly(role) => profile.map_or(false, |p| p.role == role),
        Requirement::MinAdminLevel(level) => profile.map_or(false, |p| p.admin_level >= level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role, admin_level: u32) -> UserProfile {
        UserProfile {
            id: 1,
            username: "test".into(),
            email: String::new(),
            role,
            admin_level,
        }
    }

    #[test]
    fn test_admin_only_by_role() {
        let p = profile(Role::Admin, 0);
        assert!(can_access(Some(&p), Requirement::AdminOnly));
    }

    #[test]
    fn test_admin_only_level_boundary() {
        let at = profile(Role::Regular, 50);
        assert!(can_access(Some(&at), Requirement::AdminOnly));

        let below = profile(Role::Regular, 49);
        assert!(!can_access(Some(&below), Requirement::AdminOnly));
    }

    #[test]
    fn test_role_exactly() {
        let p = profile(Role::Nutritionist, 0);
        assert!(can_access(Some(&p), Requirement::RoleExactly(Role::Nutritionist)));
        assert!(!can_access(Some(&p), Requirement::RoleExactly(Role::Regulator)));
        // admin role does not stand in for other roles
        let admin = profile(Role::Admin, 99);
        assert!(!can_access(Some(&admin), Requirement::RoleExactly(Role::Nutritionist)));
    }

    #[test]
    fn test_min_admin_level() {
        let p = profile(Role::Regulator, 10);
        assert!(can_access(Some(&p), Requirement::MinAdminLevel(10)));
        assert!(!can_access(Some(&p), Requirement::MinAdminLevel(11)));
        assert!(can_access(Some(&p), Requirement::MinAdminLevel(0)));
    }

    #[test]
    fn test_absent_profile() {
        assert!(can_access(None, Requirement::PublicPage));
        assert!(!can_access(None, Requirement::AdminOnly));
        assert!(!can_access(None, Requirement::RoleExactly(Role::Regular)));
        assert!(!can_access(None, Requirement::MinAdminLevel(0)));
    }
}
