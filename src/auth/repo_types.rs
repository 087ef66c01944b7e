use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role tag assigned at registration. Nothing in scope ever changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                          // assigned by the store, immutable
    pub phone: String,                     // unique login identifier
    #[serde(skip_serializing)]
    pub pin_hash: String,                  // Argon2 PHC string, never plaintext
    pub name: String,
    pub role: Role,
    pub notification_token: Option<String>, // push delivery, outside auth scope
    pub created_at: OffsetDateTime,        // set once at creation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_user_never_contains_pin_hash() {
        let user = User {
            id: Uuid::new_v4(),
            phone: "+15550001".into(),
            pin_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            name: "Ann".into(),
            role: Role::Patient,
            notification_token: None,
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("pin_hash"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn role_defaults_to_patient_and_serializes_lowercase() {
        assert_eq!(Role::default(), Role::Patient);
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"patient\"");
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
    }
}
