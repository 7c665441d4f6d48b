//! Session lookup.
//!
//! Sessions are issued by the external identity provider, which writes the
//! `users` and `sessions` tables. This service only reads them: a bearer
//! token resolves to the user it belongs to and whether that user is an
//! administrator.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Longest token accepted before touching the database.
pub const MAX_TOKEN_LEN: usize = 512;

/// User row returned from session validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    /// Administrators may delete any ad and are exempt from the ad quota.
    pub is_admin: bool,
}

/// Trim a raw token and reject values that can never be valid.
#[must_use]
pub fn normalize_token(raw: &str) -> Option<&str> {
    let token = raw.trim();
    if token.is_empty() || token.len() > MAX_TOKEN_LEN || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Validate a session token and return the associated user.
///
/// # Errors
///
/// Returns the database error if the lookup fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.name, u.is_admin
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    row.map(|r| -> Result<SessionUser, sqlx::Error> {
        Ok(SessionUser { id: r.try_get("id")?, name: r.try_get("name")?, is_admin: r.try_get("is_admin")? })
    })
    .transpose()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
