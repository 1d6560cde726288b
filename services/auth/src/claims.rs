//! Decoding of session tokens
//!
//! The booking service issues signed JWTs. The client holds no key to verify
//! them, so it only reads the embedded claims: the subject and the expiry.
//! Whether the token is still valid is judged later by the guard.

use std::collections::HashSet;

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

/// JWT claims the client relies on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the user the token was issued for)
    pub sub: String,
    /// Expiration time, seconds since the epoch
    pub exp: i64,
    /// Issued at time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

fn claims_validation() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);
    validation
}

/// Read the claims of `token` without verifying its signature or expiry
pub fn decode_claims(token: &str) -> Result<Claims, CredentialError> {
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &claims_validation())
        .map_err(CredentialError::Malformed)?;
    Ok(token_data.claims)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    /// Mint a token the way the booking service would, with an arbitrary key
    pub(crate) fn mint(sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            iat: Some(exp - 3600),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .expect("Failed to encode test token")
    }

    #[test]
    fn test_decode_claims_reads_subject_and_expiry() {
        let token = mint("john_doe", 1_900_000_000);
        let claims = decode_claims(&token).expect("token should decode");
        assert_eq!(claims.sub, "john_doe");
        assert_eq!(claims.exp, 1_900_000_000);
    }

    #[test]
    fn test_decode_claims_ignores_expiry() {
        let token = mint("john_doe", 10);
        let claims = decode_claims(&token).expect("expired token should still decode");
        assert_eq!(claims.exp, 10);
    }

    #[test]
    fn test_decode_claims_rejects_garbage() {
        assert!(matches!(
            decode_claims("not-a-jwt"),
            Err(CredentialError::Malformed(_))
        ));
        assert!(decode_claims("").is_err());
    }

    #[test]
    fn test_decode_claims_requires_expiry() {
        #[derive(Serialize)]
        struct NoExpiry {
            sub: String,
        }

        let token = encode(
            &Header::default(),
            &NoExpiry {
                sub: "john_doe".to_string(),
            },
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .expect("Failed to encode test token");

        assert!(decode_claims(&token).is_err());
    }
}
