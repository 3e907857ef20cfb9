//! # Authentication
//!
//! Demo-grade login: credentials are stored and compared as typed, and the
//! session is a cookie whose value is the username.
//!
//! ## State Machine
//! ```text
//!                 login(ok)                       expiry / logout
//!  ┌───────────┐ ───────────► ┌──────────────────────┐ ───────────► ┌───────────┐
//!  │ LoggedOut │              │ LoggedIn(username)   │              │ LoggedOut │
//!  └───────────┘ ◄─────────── └──────────────────────┘              └───────────┘
//!                 login(bad): stays LoggedOut, InvalidCredentials
//! ```
//!
//! Signup only adds a credential record. It never logs anyone in.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::User;
use crate::validation::validate_credentials;
use crate::{SESSION_COOKIE_NAME, SESSION_TTL_DAYS};

// =============================================================================
// Session Cookie
// =============================================================================

/// `session=<username>; expires=<+1 day>; path=/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

impl SessionCookie {
    /// A fresh cookie for `username`, valid for one session lifetime.
    pub fn issue(username: &str, now: DateTime<Utc>) -> Self {
        SessionCookie {
            name: SESSION_COOKIE_NAME.to_string(),
            value: username.to_string(),
            path: "/".to_string(),
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        }
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; expires={}; path={}",
            self.name,
            self.value,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path
        )
    }
}

// =============================================================================
// Session
// =============================================================================

/// Who is using the app right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn { username: String },
}

impl Session {
    /// Reads the stored cookie. Missing, expired or foreign cookies mean
    /// nobody is logged in.
    pub fn resolve(cookie: Option<&SessionCookie>, now: DateTime<Utc>) -> Self {
        match cookie {
            Some(c) if c.name == SESSION_COOKIE_NAME && !c.is_expired(now) && !c.value.is_empty() => {
                Session::LoggedIn {
                    username: c.value.clone(),
                }
            }
            _ => Session::LoggedOut,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { username } => Some(username),
            Session::LoggedOut => None,
        }
    }

    /// The logged-in username, or `NotAuthenticated`.
    pub fn require_user(&self) -> CoreResult<&str> {
        self.username().ok_or(CoreError::NotAuthenticated)
    }
}

// =============================================================================
// Signup / Login
// =============================================================================

/// Registers a new member.
///
/// A taken username is reported before empty fields, so signing up as an
/// existing user with a blank password says "Username already exists."
pub fn signup(users: &mut Vec<User>, username: &str, password: &str) -> CoreResult<()> {
    if users.iter().any(|u| u.username == username) {
        return Err(CoreError::UsernameTaken(username.to_string()));
    }
    validate_credentials(username, password)?;

    users.push(User {
        username: username.to_string(),
        password: password.to_string(),
    });
    Ok(())
}

/// Checks credentials and issues a session cookie.
pub fn login(users: &[User], username: &str, password: &str, now: DateTime<Utc>) -> CoreResult<SessionCookie> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .map(|u| SessionCookie::issue(&u.username, now))
        .ok_or(CoreError::InvalidCredentials)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_signup_then_login() {
        let mut users = Vec::new();
        signup(&mut users, "alice", "pw1").unwrap();

        let cookie = login(&users, "alice", "pw1", now()).unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "alice");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.expires_at, now() + Duration::days(1));
    }

    #[test]
    fn test_wrong_password() {
        let mut users = Vec::new();
        signup(&mut users, "alice", "pw1").unwrap();

        let err = login(&users, "alice", "nope", now()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password.");
        assert!(login(&users, "bob", "pw1", now()).is_err());
    }

    #[test]
    fn test_duplicate_checked_before_empty_fields() {
        let mut users = Vec::new();
        signup(&mut users, "alice", "pw1").unwrap();

        let err = signup(&mut users, "alice", "").unwrap_err();
        assert!(matches!(err, CoreError::UsernameTaken(_)));

        let err = signup(&mut users, "bob", "").unwrap_err();
        assert_eq!(err.to_string(), "Please fill all fields.");
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_session_expires() {
        let cookie = SessionCookie::issue("alice", now());

        let session = Session::resolve(Some(&cookie), now() + Duration::hours(23));
        assert_eq!(session.require_user().unwrap(), "alice");

        let session = Session::resolve(Some(&cookie), now() + Duration::days(1));
        assert_eq!(session, Session::LoggedOut);
        assert!(matches!(session.require_user(), Err(CoreError::NotAuthenticated)));

        assert_eq!(Session::resolve(None, now()), Session::LoggedOut);
    }

    #[test]
    fn test_cookie_header() {
        let cookie = SessionCookie::issue("alice", now());
        assert_eq!(
            cookie.to_string(),
            "session=alice; expires=Sat, 06 Jan 2024 12:00:00 GMT; path=/"
        );
    }
}
