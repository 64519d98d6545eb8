//! crates/backoffice_core/src/session.rs
//!
//! The authenticated caller. A `Session` is resolved once per request and handed
//! explicitly to every mutating store operation; there is no global "current user".

use crate::domain::User;
use crate::ports::{BackendService, PortError, PortResult};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Looks up the user behind a session token.
///
/// Returns `Ok(None)` when the token is unknown or expired, so callers can treat
/// "not signed in" as an ordinary outcome. Any other backend failure propagates.
pub async fn current_user(backend: &dyn BackendService, token: &str) -> PortResult<Option<User>> {
    let user_id = match backend.validate_auth_session(token).await {
        Ok(user_id) => user_id,
        Err(PortError::NotFound(_)) | Err(PortError::Unauthorized) => {
            debug!("Session token rejected");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match backend.get_user(user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(PortError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolves a token into a full `Session`.
pub async fn resolve(backend: &dyn BackendService, token: &str) -> PortResult<Option<Session>> {
    Ok(current_user(backend, token).await?.map(|user| Session {
        token: token.to_string(),
        user,
    }))
}
