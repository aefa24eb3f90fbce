use super::model::AuthenticatedUser;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Validates admin bearer tokens signed with the shared HS256 secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    roles: Vec<String>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?
            .claims;

        Ok(AuthenticatedUser {
            sub: claims.sub,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{issue_token, test_auth_config};
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_valid_token() {
        let config = test_auth_config();
        let token = issue_token(&config, "alice", &["admin"], 3600);

        let user = assert_ok!(JwtValidator::new(&config).validate_token(&token));
        assert_eq!(user.sub, "alice");
        assert!(user.is_admin());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_auth_config();
        let other = AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            ..test_auth_config()
        };
        let token = issue_token(&other, "alice", &["admin"], 3600);

        let result = JwtValidator::new(&config).validate_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_auth_config();
        let other = AuthConfig {
            issuer: "someone-else".to_string(),
            ..test_auth_config()
        };
        let token = issue_token(&other, "alice", &["admin"], 3600);

        assert_err!(JwtValidator::new(&config).validate_token(&token));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_auth_config();
        let token = issue_token(&config, "alice", &["admin"], -3600);

        assert!(JwtValidator::new(&config).validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let config = test_auth_config();
        assert!(JwtValidator::new(&config)
            .validate_token("not-a-token")
            .is_err());
    }
}
