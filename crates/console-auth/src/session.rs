//! Session payloads returned by the auth service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::is_admin_role;

/// User record attached to a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Comma-separated roles
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub banned: Option<bool>,
    #[serde(default)]
    pub ban_reason: Option<String>,
    /// `None` with `banned` set means a permanent ban
    #[serde(default)]
    pub ban_expires: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        is_admin_role(self.role.as_deref())
    }

    pub fn is_banned(&self) -> bool {
        self.banned.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    /// Never echoed back to the browser
    #[serde(default, skip_serializing)]
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonated_by: Option<String>,
}

/// Raw `get-session` response body. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub session: Option<SessionData>,
}

impl SessionPayload {
    /// Complete session, if both the user and the session are present.
    pub fn into_session(self) -> Option<Session> {
        match (self.user, self.session) {
            (Some(user), Some(session)) => Some(Session { user, session }),
            _ => None,
        }
    }
}

impl From<Session> for SessionPayload {
    fn from(session: Session) -> Self {
        Self {
            user: Some(session.user),
            session: Some(session.session),
        }
    }
}

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub session: SessionData,
}
