use sqlx::PgPool;
use tracing::{error, warn};

use crate::auth::password;
use crate::auth::repo_types::{Role, User};
use crate::error::ApiError;

fn map_store_error(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return ApiError::DuplicateIdentity;
        }
    }
    error!(error = %e, "identity store error");
    ApiError::StoreUnavailable
}

impl User {
    /// Find a user by phone number.
    pub async fn find_by_phone(db: &PgPool, phone: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone, pin_hash, name, role, notification_token, created_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(db)
        .await
        .map_err(map_store_error)?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: uuid::Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, phone, pin_hash, name, role, notification_token, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(map_store_error)?;
        Ok(user)
    }

    /// Create a new user. The plaintext PIN is hashed here, before the
    /// write; the unique index on `phone` is the race guard for concurrent
    /// registrations and surfaces as `DuplicateIdentity`.
    pub async fn create(
        db: &PgPool,
        phone: &str,
        pin: &str,
        name: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        let pin_hash = password::hash_pin(pin).map_err(|e| {
            error!(error = %e, "hash_pin failed");
            ApiError::Internal
        })?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, pin_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, phone, pin_hash, name, role, notification_token, created_at
            "#,
        )
        .bind(phone)
        .bind(&pin_hash)
        .bind(name)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(map_store_error)?;
        Ok(user)
    }

    /// Verify a submitted PIN against the stored hash. A wrong PIN is
    /// `false`, never an error; a malformed stored hash also verifies
    /// as `false` and is logged.
    pub fn verify_pin(&self, pin: &str) -> bool {
        match password::verify_pin(pin, &self.pin_hash) {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, user_id = %self.id, "stored pin hash unreadable");
                false
            }
        }
    }

    /// Re-persist the mutable fields of an existing user. The credential
    /// value passes through the hash-on-write transform, so saving an
    /// unchanged record leaves `pin_hash` exactly as it was. `id`,
    /// `phone` and `created_at` are never written.
    pub async fn save(&self, db: &PgPool) -> Result<User, ApiError> {
        let pin_hash = password::ensure_hashed(&self.pin_hash).map_err(|e| {
            error!(error = %e, "ensure_hashed failed");
            ApiError::Internal
        })?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, notification_token = $3, pin_hash = $4
            WHERE id = $1
            RETURNING id, phone, pin_hash, name, role, notification_token, created_at
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.notification_token)
        .bind(&pin_hash)
        .fetch_one(db)
        .await
        .map_err(map_store_error)?;
        Ok(user)
    }
}
