use std::env;
use std::fmt;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Runtime settings read from the environment (and `.env` via `dotenv` in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC secret used to sign and verify bearer tokens. There is no fallback.
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `JWT_SECRET` is unset or empty.
    MissingSecret,
    /// `SERVER_PORT` is not a valid port number.
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingSecret => write!(f, "JWT_SECRET must be set to a non-empty value"),
            ConfigError::InvalidPort(raw) => write!(f, "SERVER_PORT must be a number, got {:?}", raw),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Lets `main` abort startup with `?` on a bad configuration.
impl From<ConfigError> for std::io::Error {
    fn from(error: ConfigError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, error)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            jwt_secret,
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
