use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

fn hash_failure(stage: &'static str) -> impl Fn(argon2::password_hash::Error) -> anyhow::Error {
    move |e| {
        error!(error = %e, stage, "argon2 failure");
        anyhow::anyhow!(e.to_string())
    }
}

/// Salted argon2 hash suitable for storage; a fresh salt per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(hash_failure("hash"))?;
    Ok(hash.to_string())
}

/// Check a candidate against a stored hash. Errors only when the stored
/// hash itself does not parse; a wrong password is `Ok(false)`.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(hash_failure("parse"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password("longpass1").expect("hash");
        assert!(verify_password("longpass1", &hash).expect("verify"));
    }

    #[test]
    fn wrong_password_is_rejected_without_error() {
        let hash = hash_password("first choice").expect("hash");
        assert!(!verify_password("second guess", &hash).expect("verify"));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let a = hash_password("repeatable").expect("hash");
        let b = hash_password("repeatable").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn unparseable_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-left-in-db").is_err());
    }
}
