//! User domain type.

use chrono::{DateTime, Utc};

use bramble_core::{Email, UserId};

/// A registered user.
///
/// The password is only ever stored as an argon2 hash; responses expose the
/// user through a DTO that omits it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Argon2 hash of the user's password.
    pub hashed_password: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
