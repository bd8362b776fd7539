//! Access decisions
//!
//! One pure policy function shared by every entry point into the console.

use crate::session::{Session, SessionPayload};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const NOT_ADMIN: &str = "User does not have admin role";
pub const BANNED: &str = "User is banned";

/// Outcome of checking a session against the console's access policy
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// No session, or the auth service returned half of one
    NotAuthenticated,
    AuthenticatedNonAdmin(Session),
    /// Admin role present but the user is banned
    AuthenticatedBanned { session: Session, reason: String },
    AuthenticatedAdmin(Session),
}

/// What a request gate does with a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Proceed,
    Login,
    Forbidden,
}

/// Apply the access policy to a fetched session.
///
/// The role is checked before the ban flag, so a banned non-admin is
/// reported as a non-admin.
pub fn evaluate_access(payload: Option<SessionPayload>) -> AccessDecision {
    let Some(session) = payload.and_then(SessionPayload::into_session) else {
        return AccessDecision::NotAuthenticated;
    };

    if !session.user.is_admin() {
        tracing::debug!("Access denied for user {}: not an admin", session.user.id);
        return AccessDecision::AuthenticatedNonAdmin(session);
    }

    if session.user.is_banned() {
        let reason = session
            .user
            .ban_reason
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| BANNED.to_string());
        tracing::debug!("Access denied for user {}: banned", session.user.id);
        return AccessDecision::AuthenticatedBanned { session, reason };
    }

    AccessDecision::AuthenticatedAdmin(session)
}

impl AccessDecision {
    pub fn gate_outcome(&self) -> GateOutcome {
        match self {
            AccessDecision::NotAuthenticated => GateOutcome::Login,
            AccessDecision::AuthenticatedNonAdmin(_) | AccessDecision::AuthenticatedBanned { .. } => {
                GateOutcome::Forbidden
            }
            AccessDecision::AuthenticatedAdmin(_) => GateOutcome::Proceed,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AccessDecision::NotAuthenticated)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AccessDecision::AuthenticatedAdmin(_))
    }

    /// Why access was refused, `None` for admins.
    pub fn error(&self) -> Option<&str> {
        match self {
            AccessDecision::NotAuthenticated => Some(NOT_AUTHENTICATED),
            AccessDecision::AuthenticatedNonAdmin(_) => Some(NOT_ADMIN),
            AccessDecision::AuthenticatedBanned { reason, .. } => Some(reason.as_str()),
            AccessDecision::AuthenticatedAdmin(_) => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AccessDecision::NotAuthenticated => None,
            AccessDecision::AuthenticatedNonAdmin(session)
            | AccessDecision::AuthenticatedBanned { session, .. }
            | AccessDecision::AuthenticatedAdmin(session) => Some(session),
        }
    }

    pub fn into_admin(self) -> Option<Session> {
        match self {
            AccessDecision::AuthenticatedAdmin(session) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionData, User};
    use pretty_assertions::assert_eq;

    fn payload(role: Option<&str>, banned: Option<bool>, reason: Option<&str>) -> SessionPayload {
        SessionPayload {
            user: Some(User {
                id: "u1".into(),
                role: role.map(String::from),
                banned,
                ban_reason: reason.map(String::from),
                ..Default::default()
            }),
            session: Some(SessionData {
                id: "s1".into(),
                user_id: "u1".into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_missing_session_is_not_authenticated() {
        let decision = evaluate_access(None);
        assert_eq!(decision, AccessDecision::NotAuthenticated);
        assert_eq!(decision.gate_outcome(), GateOutcome::Login);
        assert_eq!(decision.error(), Some("Not authenticated"));

        let half = SessionPayload {
            session: None,
            ..payload(Some("admin"), None, None)
        };
        assert_eq!(evaluate_access(Some(half)), AccessDecision::NotAuthenticated);
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let decision = evaluate_access(Some(payload(Some("user"), None, None)));
        assert!(matches!(decision, AccessDecision::AuthenticatedNonAdmin(_)));
        assert_eq!(decision.gate_outcome(), GateOutcome::Forbidden);
        assert_eq!(decision.error(), Some("User does not have admin role"));
        assert!(decision.is_authenticated());
        assert!(!decision.is_admin());
    }

    #[test]
    fn test_banned_admin_is_forbidden() {
        let decision = evaluate_access(Some(payload(Some("admin"), Some(true), None)));
        assert_eq!(decision.gate_outcome(), GateOutcome::Forbidden);
        assert_eq!(decision.error(), Some("User is banned"));

        let decision = evaluate_access(Some(payload(Some("admin"), Some(true), Some("Spam"))));
        assert_eq!(decision.error(), Some("Spam"));

        let decision = evaluate_access(Some(payload(Some("admin"), Some(true), Some(""))));
        assert_eq!(decision.error(), Some("User is banned"));
    }

    #[test]
    fn test_banned_non_admin_reports_role() {
        let decision = evaluate_access(Some(payload(Some("user"), Some(true), Some("Spam"))));
        assert!(matches!(decision, AccessDecision::AuthenticatedNonAdmin(_)));
    }

    #[test]
    fn test_admin_proceeds() {
        let decision = evaluate_access(Some(payload(Some("user, admin"), Some(false), None)));
        assert_eq!(decision.gate_outcome(), GateOutcome::Proceed);
        assert_eq!(decision.error(), None);
        assert_eq!(decision.into_admin().unwrap().user.id, "u1");
    }
}
