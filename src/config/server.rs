use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::{extras, Validate, ValidateError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport, Sensitive};

#[derive(Debug, Deserialize)]
pub struct Server {
    pub db: super::Database,
    /// Secret key used to sign and verify session tokens.
    ///
    /// **Environment variables**:
    /// - `RIPPLE_JWT_SECRET`
    pub jwt_secret: Sensitive<String>,
    /// **Environment variables**:
    /// - `RIPPLE_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variables**:
    /// - `RIPPLE_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// **Environment variables**:
    /// - `RIPPLE_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
}

impl Validate for Server {
    fn validate(&self) -> std::result::Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        if let Err(error) = self.db.validate() {
            fields.insert("db", error);
        }
        fields.insert("jwt_secret", {
            let mut error = ValidateError::msg_builder();
            if !extras::validate_length(&self.jwt_secret, Some(12), Some(1024)) {
                error.insert("Invalid JWT secret key");
            }
            error.build()
        });
        fields.build().into_result()
    }
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "ripple.toml";
    const DEFAULT_PORT: u16 = 3000;

    // Required by serde
    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism().map(usize::from).unwrap_or(1)
    }

    /// Creates a default [`figment::Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // One big con about figment (env provider to be specific) especially
            // these fields with underscore in it.
            .merge(Env::prefixed("RIPPLE_").map(|v| match v.as_str() {
                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

                "JWT_SECRET" => "jwt_secret".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(Env::raw().map(|v| match v.as_str() {
                "DATABASE_URL" => "db.primary.url".into(),
                _ => v.into(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "hello world!");

            jail.set_env("RIPPLE_JWT_SECRET", "super-secret-key");

            jail.set_env("RIPPLE_DB_PRIMARY_MIN_IDLE", "100");
            jail.set_env("RIPPLE_DB_PRIMARY_POOL_SIZE", "100");

            jail.set_env("RIPPLE_DB_REPLICA_URL", "required");
            jail.set_env("RIPPLE_DB_REPLICA_MIN_IDLE", "589");
            jail.set_env("RIPPLE_DB_REPLICA_POOL_SIZE", "589");

            jail.set_env("RIPPLE_DB_ENFORCE_TLS", "false");
            jail.set_env("RIPPLE_DB_TIMEOUT_SECS", "3030");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.primary.url.as_str(), "hello world!");
            assert_eq!(
                config.db.primary.min_idle.unwrap(),
                NonZeroU32::new(100).unwrap()
            );
            assert_eq!(config.db.primary.pool_size, NonZeroU32::new(100).unwrap());
            assert_eq!(
                config.db.replica.as_ref().unwrap().min_idle.unwrap(),
                NonZeroU32::new(589).unwrap()
            );
            assert_eq!(
                config.db.replica.as_ref().unwrap().pool_size,
                NonZeroU32::new(589).unwrap()
            );

            assert_eq!(config.jwt_secret.as_str(), "super-secret-key");
            assert_eq!(config.db.enforce_tls, false);
            assert_eq!(config.db.timeout_secs, NonZeroU64::new(3030).unwrap());

            Ok(())
        });
    }

    #[test]
    fn listen_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/ripple");
            jail.set_env("RIPPLE_JWT_SECRET", "super-secret-key");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.ip, Server::default_ip());
            assert_eq!(config.port, 3000);
            assert!(config.workers >= 1);

            Ok(())
        });
    }
}
