//! # Password hashing and verification — Argon2id
//!
//! - [`hash_password`] salts with [`OsRng`] and hashes with the default Argon2id
//!   parameters. The cost is fixed here and not configurable. The PHC string
//!   (`$argon2id$v=19$m=19456,t=2,p=1$...`) is what lands in `users.password_hash`.
//! - [`verify_password`] returns `Ok(false)` on mismatch and `Err` only when the
//!   stored hash cannot be parsed.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
