//! HS256 JWT implementation of the token issuer port.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use userdeck_application::{IdentityClaims, TokenIssuer};
use userdeck_core::{AppError, AppResult};
use userdeck_domain::UserId;

/// Clock-skew tolerance applied when validating `exp`.
const LEEWAY_SECONDS: u64 = 30;

/// Wire shape of the signed token payload.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    given_name: String,
    family_name: String,
    name: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// HS256 token issuer with a symmetric signing key and configured
/// issuer/audience/lifetime.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: TimeDelta,
}

impl JwtTokenIssuer {
    /// Creates an issuer from the shared signing key and token settings.
    #[must_use]
    pub fn new(
        signing_key: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expires_minutes: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            issuer: issuer.into(),
            audience: audience.into(),
            lifetime: TimeDelta::minutes(expires_minutes),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, claims: &IdentityClaims) -> AppResult<String> {
        let now = Utc::now();

        let payload = TokenClaims {
            sub: claims.user_id.to_string(),
            email: claims.email.clone(),
            given_name: claims.given_name.clone(),
            family_name: claims.family_name.clone(),
            name: claims.display_name.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))
    }

    fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECONDS;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("token has expired".to_owned())
                }
                _ => AppError::Unauthorized("invalid token".to_owned()),
            })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map(UserId::from_i64)
            .map_err(|_| AppError::Unauthorized("invalid token subject".to_owned()))?;

        Ok(IdentityClaims {
            user_id,
            email: data.claims.email,
            given_name: data.claims.given_name,
            family_name: data.claims.family_name,
            display_name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> IdentityClaims {
        IdentityClaims {
            user_id: UserId::from_i64(5),
            email: "ada@example.com".to_owned(),
            given_name: "Ada".to_owned(),
            family_name: "Lovelace".to_owned(),
            display_name: "Ada Lovelace".to_owned(),
        }
    }

    fn issuer(key: &[u8], expires_minutes: i64) -> JwtTokenIssuer {
        JwtTokenIssuer::new(key, "userdeck.api", "userdeck.clients", expires_minutes)
    }

    #[test]
    fn issued_token_verifies_with_matching_claims() {
        let token_issuer = issuer(b"0123456789abcdef0123456789abcdef", 60);

        let token = token_issuer.issue(&claims());
        assert!(token.is_ok());

        if let Ok(token) = token {
            let verified = token_issuer.verify(&token);
            assert!(verified.is_ok());
            if let Ok(verified) = verified {
                assert_eq!(verified.user_id, UserId::from_i64(5));
                assert_eq!(verified.email, "ada@example.com");
                assert_eq!(verified.given_name, "Ada");
                assert_eq!(verified.family_name, "Lovelace");
                assert_eq!(verified.display_name, "Ada Lovelace");
            }
        }
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let signer = issuer(b"0123456789abcdef0123456789abcdef", 60);
        let verifier = issuer(b"another-key-another-key-another!", 60);

        let token = signer.issue(&claims());
        assert!(token.is_ok());
        if let Ok(token) = token {
            assert!(matches!(
                verifier.verify(&token),
                Err(AppError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn issuer_mismatch_is_rejected() {
        let signer =
            JwtTokenIssuer::new(b"0123456789abcdef0123456789abcdef", "other.api", "aud", 60);
        let verifier = issuer(b"0123456789abcdef0123456789abcdef", 60);

        let token = signer.issue(&claims());
        assert!(token.is_ok());
        if let Ok(token) = token {
            assert!(verifier.verify(&token).is_err());
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let token_issuer = issuer(b"0123456789abcdef0123456789abcdef", -10);

        let token = token_issuer.issue(&claims());
        assert!(token.is_ok());
        if let Ok(token) = token {
            assert!(matches!(
                token_issuer.verify(&token),
                Err(AppError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn garbage_token_is_rejected() {
        let token_issuer = issuer(b"0123456789abcdef0123456789abcdef", 60);

        assert!(token_issuer.verify("not-a-token").is_err());
    }
}
