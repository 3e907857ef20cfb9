//! # Auth Commands
//!
//! Signup, login, logout and session lookup. The session lives in a single
//! stored cookie, so one member is logged in per database at a time.

use serde::{Deserialize, Serialize};
use shelf_core::auth::{self, Session};
use shelf_core::Clock;
use shelf_db::KvStore;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::DbState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub username: String,
    /// `session=<username>; expires=...; path=/`
    pub cookie: String,
    pub expires_at: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// Who was logged in, if anyone.
    pub username: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmIResponse {
    pub username: Option<String>,
}

/// Resolves the stored cookie into a session.
pub async fn current_session<S: KvStore>(
    db: &DbState<S>,
    clock: &dyn Clock,
) -> Result<Session, ApiError> {
    let cookie = db.inner().sessions().get().await?;
    Ok(Session::resolve(cookie.as_ref(), clock.now()))
}

/// The logged-in username, or `UNAUTHENTICATED`.
pub async fn current_user<S: KvStore>(db: &DbState<S>, clock: &dyn Clock) -> Result<String, ApiError> {
    let session = current_session(db, clock).await?;
    Ok(session.require_user()?.to_string())
}

/// Registers a member. Does not log them in.
pub async fn signup<S: KvStore>(
    db: &DbState<S>,
    username: String,
    password: String,
) -> Result<SignupResponse, ApiError> {
    debug!(username = %username, "signup command");

    let repo = db.inner().users();
    let mut users = repo.list().await?;

    if let Err(err) = auth::signup(&mut users, &username, &password) {
        warn!(username = %username, error = %err, "Signup rejected");
        return Err(err.into());
    }
    repo.save_all(&users).await?;

    info!(username = %username, members = users.len(), "Member registered");

    Ok(SignupResponse {
        username,
        message: "Signup successful! You can now log in.".to_string(),
    })
}

/// Checks credentials and stores a fresh session cookie.
pub async fn login<S: KvStore>(
    db: &DbState<S>,
    clock: &dyn Clock,
    username: String,
    password: String,
) -> Result<LoginResponse, ApiError> {
    debug!(username = %username, "login command");

    let users = db.inner().users().list().await?;
    let cookie = match auth::login(&users, &username, &password, clock.now()) {
        Ok(cookie) => cookie,
        Err(err) => {
            warn!(username = %username, "Login rejected");
            return Err(err.into());
        }
    };
    db.inner().sessions().set(&cookie).await?;

    info!(username = %username, expires_at = %cookie.expires_at, "Logged in");

    Ok(LoginResponse {
        username,
        cookie: cookie.to_string(),
        expires_at: cookie.expires_at.to_rfc3339(),
        message: "Login successful!".to_string(),
    })
}

/// Clears the session cookie. Logging out twice is harmless.
pub async fn logout<S: KvStore>(db: &DbState<S>, clock: &dyn Clock) -> Result<LogoutResponse, ApiError> {
    debug!("logout command");

    let session = current_session(db, clock).await?;
    db.inner().sessions().clear().await?;

    let username = session.username().map(str::to_string);
    if let Some(name) = &username {
        info!(username = %name, "Logged out");
    }

    Ok(LogoutResponse {
        message: match &username {
            Some(_) => "Logged out.".to_string(),
            None => "Nobody was logged in.".to_string(),
        },
        username,
    })
}

pub async fn whoami<S: KvStore>(db: &DbState<S>, clock: &dyn Clock) -> Result<WhoAmIResponse, ApiError> {
    let session = current_session(db, clock).await?;
    Ok(WhoAmIResponse {
        username: session.username().map(str::to_string),
    })
}
