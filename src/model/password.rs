//! One-way password hashing.
//!
//! Hashes are Argon2 encoded strings, which carry their own salt and
//! parameters, so verifying needs nothing but the stored string.

use argon2::Config;
use log::warn;
use rand::Rng;

use crate::error::Result;

/// Hash a password with a freshly generated salt.
pub fn hash<T: AsRef<[u8]>>(password: T) -> Result<String> {
    // 16 bytes is recommended for password hashing:
    //  https://en.wikipedia.org/wiki/Argon2
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill(&mut salt);
    let encoded = argon2::hash_encoded(password.as_ref(), &salt, &Config::default())?;
    Ok(encoded)
}

/// Check a password against a stored hash.
///
/// A hash that cannot be decoded never matches.
pub fn verify<T: AsRef<[u8]>>(password: T, hash: &str) -> bool {
    match argon2::verify_encoded(hash, password.as_ref()) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Unreadable password hash: {e}");
            false
        }
    }
}
