use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
};

/// Claims carried by the managed identity provider's tokens. `admin` is a
/// custom claim the provider sets from its role mapping.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub admin: bool,
    pub exp: usize,
}

/// The verified caller identity, as handlers see it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_admin: bool,
}

/// Verifies tokens issued by the managed identity provider. Sign-in and
/// account management happen on the provider's side; this server only
/// checks signatures, expiry and issuer.
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.jwt_issuer.as_str()]);

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthContext> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized
            })?;

        let claims = token_data.claims;
        Ok(AuthContext {
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            is_admin: claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "repset";

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            jwt_issuer: ISSUER.to_string(),
        })
    }

    fn mint(secret: &str, issuer: &str, admin: bool, exp_offset_secs: i64) -> String {
        let claims = Claims {
            sub: "user-1".to_string(),
            iss: issuer.to_string(),
            email: Some("admin@repset.fit".to_string()),
            name: Some("Admin".to_string()),
            admin,
            exp: (Utc::now().timestamp() + exp_offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let token = mint(SECRET, ISSUER, true, 3600);
        let ctx = verifier().verify(&token).unwrap();

        assert_eq!(ctx.subject, "user-1");
        assert!(ctx.is_admin);
    }

    #[test]
    fn test_non_admin_claim() {
        let token = mint(SECRET, ISSUER, false, 3600);
        let ctx = verifier().verify(&token).unwrap();
        assert!(!ctx.is_admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint("other-secret", ISSUER, true, 3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = mint(SECRET, "someone-else", true, 3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint(SECRET, ISSUER, true, -3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AppError::Unauthorized)
        ));
    }
}
