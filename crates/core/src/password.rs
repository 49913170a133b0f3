//! Password hashing for user accounts.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a random 32-byte salt, stored as
//! `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>` so the iteration count can be raised
//! without invalidating existing accounts.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
pub const SALT_LENGTH: usize = 32;
pub const HASH_LENGTH: usize = 32;

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Checks `password` against an encoded hash.
///
/// Returns `None` if `encoded` is not a hash produced by [`hash_password`].
pub fn verify_password(password: &str, encoded: &str) -> Option<bool> {
    let mut parts = encoded.split('$');
    let scheme = parts.next()?;
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex::decode(parts.next()?).ok()?;
    let expected = hex::decode(parts.next()?).ok()?;
    if scheme != SCHEME || parts.next().is_some() || iterations == 0 {
        return None;
    }

    let actual = derive(password, &salt, iterations);
    Some(bool::from(actual.as_slice().ct_eq(expected.as_slice())))
}
