//! Secret hashing and verification for mailgate.
//!
//! Account secrets are stored as Argon2id PHC strings; the plaintext never
//! touches the database.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::config::AuthConfig;

/// Maximum secret length accepted for hashing or verification.
pub const MAX_SECRET_LENGTH: usize = 256;

/// Secret-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Secret is empty.
    #[error("secret must not be empty")]
    Empty,

    /// Secret is too long.
    #[error("secret must be at most {MAX_SECRET_LENGTH} bytes")]
    TooLong,

    /// Hashing failed or the parameters were rejected.
    #[error("secret hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid secret hash format")]
    InvalidHash,

    /// Secret does not match the stored hash.
    #[error("secret verification failed")]
    VerificationFailed,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Time cost (iterations).
    pub iterations: u32,
    /// Parallelism (lanes).
    pub parallelism: u32,
}

impl HashParams {
    /// Cheap parameters for fixtures and tests. Never use for real accounts.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl Default for HashParams {
    /// 64 MB memory, 3 iterations, 4 lanes.
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl From<&AuthConfig> for HashParams {
    fn from(config: &AuthConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Argon2id hasher bound to a fixed set of cost parameters.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    /// Create a hasher, rejecting parameters Argon2 does not accept.
    pub fn new(params: HashParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a secret, returning a PHC string with salt and parameters embedded.
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        validate_secret(secret)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;

        Ok(hash.to_string())
    }
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher").finish_non_exhaustive()
    }
}

/// Verify a secret against a stored PHC hash.
///
/// Cost parameters come from the hash itself, so hashes produced under older
/// settings keep verifying.
pub fn verify_secret(secret: &str, hash: &str) -> Result<(), PasswordError> {
    if secret.len() > MAX_SECRET_LENGTH {
        return Err(PasswordError::TooLong);
    }

    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Validate secret requirements: non-empty and at most [`MAX_SECRET_LENGTH`] bytes.
pub fn validate_secret(secret: &str) -> Result<(), PasswordError> {
    if secret.is_empty() {
        return Err(PasswordError::Empty);
    }
    if secret.len() > MAX_SECRET_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
