use base64::{engine::general_purpose::STANDARD, Engine};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Generate a random salt from the OS CSPRNG
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Text form of a salt for persistence
pub fn encode_salt(salt: &[u8]) -> String {
    STANDARD.encode(salt)
}

pub fn decode_salt(encoded: &str) -> Option<Vec<u8>> {
    STANDARD.decode(encoded).ok()
}

/// SHA-256 over the password bytes followed by the salt, base64-encoded
pub fn hash_password(password: &str, salt: &[u8]) -> String {
    STANDARD.encode(digest(password, salt))
}

/// Verify a candidate password against a stored hash and base64 salt.
///
/// A stored value that fails to decode never verifies.
pub fn verify_password(password: &str, stored_hash: &str, stored_salt: &str) -> bool {
    let Some(salt) = decode_salt(stored_salt) else {
        return false;
    };
    let Ok(expected) = STANDARD.decode(stored_hash) else {
        return false;
    };

    constant_time_eq(&digest(password, &salt), &expected)
}

fn digest(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
