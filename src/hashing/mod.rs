//! Password hashing
//!
//! The credential store only ever writes the output of a [`PasswordHasher`].
//! Hash strings are self-describing (algorithm, work factor and salt are
//! embedded) so verification needs nothing but the stored string.

use base64::prelude::*;
use sha2::{Digest, Sha256};

use crate::error::HashError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Salted, deliberately slow password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashError>;
}

/// bcrypt with a configurable work factor
///
/// bcrypt only reads the first 72 bytes of its input, so the plaintext is
/// first reduced to a base64 SHA-256 digest. Every byte of the password then
/// affects the stored hash.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(prehash(plaintext), self.cost)?)
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashError> {
        Ok(bcrypt::verify(prehash(plaintext), hashed)?)
    }
}

// 44 bytes of base64 with no NUL, well inside bcrypt's input limit
fn prehash(plaintext: &str) -> String {
    BASE64_STANDARD.encode(Sha256::digest(plaintext.as_bytes()))
}
