use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(HashError),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(HashError),
}

/// Argon2id with the default cost parameters (m=19456, t=2, p=1).
#[derive(Clone)]
pub(crate) struct Passwords {
    argon2: Argon2<'static>,
}

impl Default for Passwords {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }
}

impl Passwords {
    // Verified against when the account does not exist, so both paths cost the same.
    const DUMMY_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn hash(&self, raw_password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::Hashing)
    }

    pub(crate) fn verify(&self, raw_password: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored).map_err(PasswordError::MalformedHash)?;
        match self.argon2.verify_password(raw_password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(PasswordError::Hashing(err)),
        }
    }

    pub(crate) fn verify_dummy(&self, raw_password: &str) {
        let _ = self.verify(raw_password, Self::DUMMY_HASH);
    }
}

#[cfg(test)]
mod tests {
    use super::{PasswordError, Passwords};

    #[test]
    fn hash_then_verify() {
        let passwords = Passwords::default();
        let hash = passwords.hash("correct horse").expect("must hash");

        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert!(passwords.verify("correct horse", &hash).expect("must verify"));
        assert!(!passwords.verify("battery staple", &hash).expect("must verify"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let passwords = Passwords::default();
        let first = passwords.hash("repeat").expect("must hash");
        let second = passwords.hash("repeat").expect("must hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = Passwords::default()
            .verify("anything", "plaintext-password")
            .expect_err("must not parse");
        assert!(matches!(err, PasswordError::MalformedHash(_)));
    }

    #[test]
    fn dummy_hash_is_well_formed() {
        let parsed = argon2::PasswordHash::new(Passwords::DUMMY_HASH);
        assert!(parsed.is_ok());
    }
}
