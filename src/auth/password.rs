use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_pin(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_pin error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_pin(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Whether a stored credential value is already a PHC-format hash.
pub fn is_phc_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}

/// Hash-on-write transform for the store: plaintext is hashed, a value
/// that is already a PHC string passes through unchanged. Keeps re-saving
/// a user from re-hashing the stored hash.
pub fn ensure_hashed(value: &str) -> anyhow::Result<String> {
    if is_phc_hash(value) {
        Ok(value.to_string())
    } else {
        hash_pin(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let pin = "1234";
        let hash = hash_pin(pin).expect("hashing should succeed");
        assert_ne!(hash, pin);
        assert!(verify_pin(pin, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_pin() {
        let hash = hash_pin("1234").expect("hashing should succeed");
        assert!(!verify_pin("9999", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_pin("1234", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn ensure_hashed_hashes_plaintext_once() {
        let first = ensure_hashed("1234").expect("hash plaintext");
        assert!(is_phc_hash(&first));
        // An already-hashed value must pass through byte for byte
        let second = ensure_hashed(&first).expect("pass through");
        assert_eq!(first, second);
        assert!(verify_pin("1234", &second).expect("verify should succeed"));
    }

    #[test]
    fn plaintext_is_not_mistaken_for_a_hash() {
        assert!(!is_phc_hash("1234"));
        assert!(!is_phc_hash(""));
    }
}
