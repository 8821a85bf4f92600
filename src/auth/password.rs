//! bcrypt password hashes (`$2b$<cost>$...`). The cost is carried in the hash itself.

pub use bcrypt::{BcryptError, DEFAULT_COST};

/// Lowest cost bcrypt accepts (mirrors the crate-private `bcrypt::MIN_COST`).
pub const MIN_COST: u32 = 4;

/// Hash `password` with a fresh random salt at `cost` rounds
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}
