use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a plaintext password with bcrypt at the given work factor.
///
/// The output encodes the salt and cost, so verification is self-describing
/// and needs no extra state.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(password, cost)?)
}

/// Verifies a candidate password against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; only a malformed or corrupt stored hash is an
/// error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}
