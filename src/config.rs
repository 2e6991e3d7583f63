// Application configuration, built once at startup from the environment and
// passed into the components that need it.

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("environment variable {0} has an invalid value")]
    InvalidVar(&'static str),
}

/// Settings for the token service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds. Default one hour.
    pub token_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

impl AppConfig {
    /// Read configuration from the environment. DATABASE_URL and JWT_SECRET
    /// are required; host, port, and token TTL have defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar("PORT"))?,
            Err(_) => DEFAULT_PORT,
        };
        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar("TOKEN_TTL_SECS"))?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            database_url,
            host,
            port,
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so all cases run in one test
    // to avoid interference under the parallel test runner.
    #[test]
    fn test_from_env() {
        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("TOKEN_TTL_SECS");

        // Missing required variables fail with a clear error.
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("DATABASE_URL"))
        ));

        env::set_var("DATABASE_URL", "postgres://localhost/campus");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("JWT_SECRET"))
        ));

        // Defaults apply once required variables are present.
        env::set_var("JWT_SECRET", "secret");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.auth.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");

        // Explicit values override defaults.
        env::set_var("PORT", "9000");
        env::set_var("TOKEN_TTL_SECS", "120");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth.token_ttl_secs, 120);

        // Unparseable values are rejected, not silently defaulted.
        env::set_var("PORT", "not-a-port");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidVar("PORT"))
        ));

        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("PORT");
        env::remove_var("TOKEN_TTL_SECS");
    }
}
