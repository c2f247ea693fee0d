//! Authentication module for mailgate.
//!
//! This module provides secret hashing and the credential authenticator
//! that gates the public lookup endpoints.

mod credential;
mod password;

pub use credential::CredentialAuthenticator;
pub use password::{
    validate_secret, verify_secret, HashParams, PasswordError, SecretHasher, MAX_SECRET_LENGTH,
};
