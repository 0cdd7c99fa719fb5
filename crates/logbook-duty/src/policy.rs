//! Authorization predicates for the command surface.
//!
//! Pure functions over a member's role names and the channel a command
//! arrived on. The ledger never checks authorization itself; every handler
//! composes these predicates before touching it. Failed checks are silent
//! to the user, so the command surface is not leaked to outsiders.

/// True when the member holds the configured admin role. Exact,
/// case-sensitive match on the role name.
pub fn is_admin(roles: &[String], admin_role: &str) -> bool {
    roles.iter().any(|r| r == admin_role)
}

/// True when the member holds the configured higher-ups role.
pub fn is_higher_up(roles: &[String], higherups_role: &str) -> bool {
    roles.iter().any(|r| r == higherups_role)
}

/// Override commands (force clock-in/out, single reports, voids) are open
/// to admins and higher-ups alike.
pub fn can_override(roles: &[String], admin_role: &str, higherups_role: &str) -> bool {
    is_admin(roles, admin_role) || is_higher_up(roles, higherups_role)
}

/// True when a command arrived on the channel it is bound to.
pub fn channel_allowed(channel_id: u64, expected_id: u64) -> bool {
    channel_id == expected_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn admin_requires_exact_role_name() {
        assert!(is_admin(&roles(&["admin"]), "admin"));
        assert!(is_admin(&roles(&["member", "admin"]), "admin"));
        assert!(!is_admin(&roles(&["Admin"]), "admin"));
        assert!(!is_admin(&roles(&["administrator"]), "admin"));
        assert!(!is_admin(&[], "admin"));
    }

    #[test]
    fn higher_up_is_distinct_from_admin() {
        assert!(is_higher_up(&roles(&["higherups"]), "higherups"));
        assert!(!is_higher_up(&roles(&["admin"]), "higherups"));
        assert!(!is_admin(&roles(&["higherups"]), "admin"));
    }

    #[test]
    fn override_accepts_either_role() {
        assert!(can_override(&roles(&["admin"]), "admin", "higherups"));
        assert!(can_override(&roles(&["higherups"]), "admin", "higherups"));
        assert!(can_override(
            &roles(&["admin", "higherups"]),
            "admin",
            "higherups"
        ));
        assert!(!can_override(&roles(&["member"]), "admin", "higherups"));
        assert!(!can_override(&[], "admin", "higherups"));
    }

    #[test]
    fn channel_gate_is_plain_equality() {
        assert!(channel_allowed(42, 42));
        assert!(!channel_allowed(42, 43));
    }
}
