use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Claims of the access tokens issued by the account service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
pub fn issue_test_token(user_id: Uuid, email: &str, token_type: TokenType, config: &Config) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(900)).timestamp(),
        iat: now.timestamp(),
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_round_trip() {
        let config = Config::for_tests();
        let user = Uuid::new_v4();
        let token = issue_test_token(user, "a@x.com", TokenType::Access, &config);

        let data = verify_token(&token, &config).unwrap();

        assert_eq!(data.claims.sub, user);
        assert_eq!(data.claims.email, "a@x.com");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let config = Config::for_tests();
        let token = issue_test_token(Uuid::new_v4(), "a@x.com", TokenType::Access, &config);

        let mut other = Config::for_tests();
        other.jwt_secret = "another-secret".into();

        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthorized)));
    }
}
