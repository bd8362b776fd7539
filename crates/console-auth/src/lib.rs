//! Admin access for the forms console
//!
//! Every page and API call of the console requires an authenticated,
//! non-banned user holding the `admin` role. The policy lives in one place,
//! [`evaluate_access`]; the console's request gate, page guard and API guard
//! are thin adapters that fetch the session through [`SessionProvider`] and
//! act on the [`AccessDecision`].

pub mod access;
pub mod client;
pub mod config;
pub mod error;
pub mod role;
pub mod session;
pub mod session_store;

pub use access::{evaluate_access, AccessDecision, GateOutcome};
pub use client::{has_session_cookie, AuthClient, SessionProvider, SESSION_COOKIE};
pub use config::{AuthConfig, Environment};
pub use error::AuthError;
pub use role::is_admin_role;
pub use session::{Session, SessionData, SessionPayload, User};
pub use session_store::{SessionState, SessionStore};
