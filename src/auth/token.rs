//! Session token issuance and validation for snippetd.
//!
//! Tokens are compact HS256 JWTs carrying the subject email, a coarse
//! role, and a fixed one-hour expiry. Possession of a valid token is the
//! only authorization proof; there is no server-side session store and no
//! revocation list.

use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issuer claim embedded in every token.
pub const TOKEN_ISSUER: &str = "snippet-app";

/// Token lifetime in seconds (fixed, not configurable).
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Role assigned to subjects without an entry in the role table.
pub const DEFAULT_ROLE: &str = "default";

/// Token-related errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// The signing secret is missing. A startup fault, not a per-request
    /// condition.
    #[error("signing secret is not configured")]
    Config,

    /// Token creation failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The token string cannot be parsed.
    #[error("malformed token")]
    Malformed,

    /// The signature does not verify against the current secret.
    #[error("invalid token signature")]
    Signature,

    /// The token is well-signed but past its expiry.
    #[error("expired token")]
    Expired,
}

/// Claims embedded in a session token.
///
/// Immutable once minted; re-authentication produces a new claims set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (email).
    pub sub: String,
    /// Issuing service.
    pub iss: String,
    /// Coarse role ("admin" or "default"), resolved at issuance.
    pub aud: String,
    /// Issued-at timestamp (Unix seconds).
    pub iat: u64,
    /// Expiry timestamp (Unix seconds).
    pub exp: u64,
}

impl SessionClaims {
    /// The role carried by this token.
    pub fn role(&self) -> &str {
        &self.aud
    }

    /// Whether this token carries the elevated role.
    pub fn is_admin(&self) -> bool {
        self.aud == "admin"
    }
}

/// Issues and validates session tokens with a process-wide secret.
///
/// The secret is read once at construction; both operations are pure over
/// their inputs afterwards and safe to call concurrently from handler
/// tasks.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    roles: HashMap<String, String>,
}

impl TokenService {
    /// Create a token service from a signing secret and a role table.
    ///
    /// Fails with `TokenError::Config` when the secret is empty, so a
    /// misconfigured deployment is caught at startup rather than on the
    /// first request.
    pub fn new(secret: &str, roles: HashMap<String, String>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Config);
        }

        let mut validation = Validation::default();
        validation.validate_exp = true;
        // The aud claim carries our role, not an audience list.
        validation.validate_aud = false;
        // No leeway: exp <= now is invalid.
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            roles,
        })
    }

    /// Resolve the role for a subject from the configured table.
    pub fn resolve_role(&self, subject: &str) -> &str {
        self.roles
            .get(subject)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ROLE)
    }

    /// Mint a signed token asserting the given subject.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: self.resolve_role(subject).to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Parse and verify a token, returning its claims.
    ///
    /// A well-signed but expired token is rejected with `Expired`; a bad
    /// signature with `Signature`; anything unparsable with `Malformed`.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::Signature,
                _ => TokenError::Malformed,
            })?;

        // jsonwebtoken still accepts exp == now; the expiry instant
        // itself is already invalid here.
        if claims.exp <= Utc::now().timestamp() as u64 {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_EMAIL: &str = "damien.z.hall@gmail.com";

    fn test_service() -> TokenService {
        let mut roles = HashMap::new();
        roles.insert(ADMIN_EMAIL.to_string(), "admin".to_string());
        TokenService::new("test-secret", roles).unwrap()
    }

    fn encode_claims(secret: &str, claims: &SessionClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let result = TokenService::new("", HashMap::new());
        assert_eq!(result.err(), Some(TokenError::Config));
    }

    #[test]
    fn test_issue_then_validate_roundtrip() {
        let service = test_service();

        let token = service.issue("user@example.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.role(), DEFAULT_ROLE);
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_role_table_resolution() {
        let service = test_service();

        let token = service.issue(ADMIN_EMAIL).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.role(), "admin");
        assert!(claims.is_admin());

        let token = service.issue("anyone@else.com").unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.role(), "default");
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_expired_token() {
        let service = test_service();

        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: "user@example.com".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: DEFAULT_ROLE.to_string(),
            iat: now - 7200,
            exp: now - 3600, // Expired 1 hour ago
        };
        let token = encode_claims("test-secret", &claims);

        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_expiring_this_second_is_rejected() {
        let service = test_service();

        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: "user@example.com".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: DEFAULT_ROLE.to_string(),
            iat: now - TOKEN_TTL_SECS,
            exp: now, // Expires right now: already invalid
        };
        let token = encode_claims("test-secret", &claims);

        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_signature_error() {
        let service = test_service();

        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: "user@example.com".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: DEFAULT_ROLE.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let token = encode_claims("other-secret", &claims);

        assert_eq!(service.validate(&token), Err(TokenError::Signature));
    }

    #[test]
    fn test_truncated_token_is_malformed() {
        let service = test_service();

        let token = service.issue("user@example.com").unwrap();
        let truncated = token.rsplit_once('.').map(|(head, _)| head).unwrap();

        assert_eq!(service.validate(truncated), Err(TokenError::Malformed));
        assert_eq!(service.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(service.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_token_is_three_dot_separated_segments() {
        let service = test_service();
        let token = service.issue("user@example.com").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
