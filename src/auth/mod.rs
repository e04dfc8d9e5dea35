//! Authentication module for snippetd.
//!
//! Two components: the credential store (password hashing and
//! verification) and the session token issuer (signed, time-bounded
//! bearer tokens).

mod password;
mod token;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use token::{
    SessionClaims, TokenError, TokenService, DEFAULT_ROLE, TOKEN_ISSUER, TOKEN_TTL_SECS,
};
