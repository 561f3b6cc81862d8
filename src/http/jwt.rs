use chrono::{NaiveDateTime, Utc};
use error_stack::{Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::UserId;
use crate::App;

/// Session token claims. The caller identity every authenticated
/// route receives resolves from `user_id`.
#[derive(Debug, Deserialize, Serialize)]
pub struct Jwt {
    pub created_at: NaiveDateTime,
    pub issuer: String,
    pub exp_secs_until: u64,
    pub user_id: UserId,
}

#[derive(Debug, Error)]
#[error("Could not decode session token")]
pub struct DecodeError;

#[derive(Debug, Error)]
#[error("Could not create session token")]
pub struct EncodeError;

impl Jwt {
    const ISSUER: &'static str = "ripple";
    const EXP_SECS_UNTIL: u64 = 1_000_000;

    #[tracing::instrument(skip_all)]
    pub fn decode(token: &str, app: &App) -> Result<Self, DecodeError> {
        let key = DecodingKey::from_secret(app.config.jwt_secret.as_str().as_bytes());
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = jsonwebtoken::decode::<Self>(token, &key, &validation)
            .change_context(DecodeError)?;

        Ok(data.claims)
    }

    #[tracing::instrument(skip_all)]
    pub async fn encode(user_id: UserId, app: &App) -> Result<String, EncodeError> {
        let secret = app.config.jwt_secret.as_str().to_owned();
        tokio::task::spawn_blocking(move || {
            let header = Header {
                alg: Algorithm::HS512,
                ..Default::default()
            };
            let claims = Self {
                created_at: Utc::now().naive_utc(),
                issuer: Self::ISSUER.into(),
                exp_secs_until: Self::EXP_SECS_UNTIL,
                user_id,
            };
            let key = EncodingKey::from_secret(secret.as_bytes());
            jsonwebtoken::encode(&header, &claims, &key).change_context(EncodeError)
        })
        .await
        .change_context(EncodeError)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config, App};
    use std::num::{NonZeroU32, NonZeroU64};

    async fn build_test_app() -> App {
        let config = config::Server {
            db: config::Database {
                primary: config::DbPoolConfig {
                    readonly: false,
                    min_idle: None,
                    pool_size: NonZeroU32::new(1).unwrap(),
                    url: "postgres://localhost:1/unreachable".to_string().into(),
                },
                replica: None,
                enforce_tls: false,
                timeout_secs: NonZeroU64::new(1).unwrap(),
            },
            jwt_secret: "super-secret-key".to_string().into(),
            ip: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 3000,
            workers: 1,
        };

        // pools connect lazily, so no database is needed here
        App::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_encode_then_decode() {
        let app = build_test_app().await;
        let user_id = UserId::new(581);

        let token = Jwt::encode(user_id, &app).await.unwrap();
        let claims = Jwt::decode(&token, &app).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.issuer, "ripple");
    }

    #[tokio::test]
    async fn test_decode_rejects_tampered_tokens() {
        let app = build_test_app().await;
        let token = Jwt::encode(UserId::new(581), &app).await.unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(Jwt::decode(&tampered, &app).is_err());
        assert!(Jwt::decode("garbage.token.here", &app).is_err());
    }
}
