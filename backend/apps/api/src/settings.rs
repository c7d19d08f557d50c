//! Server settings from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;

/// Process-wide settings
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Decoded `TOKEN_SECRET`
    pub token_secret: Option<[u8; 32]>,
    pub token_ttl_secs: u64,
    pub password_pepper: Option<Vec<u8>>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` (blank values count as unset)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = get("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins: Vec<String> = get("FRONTEND_ORIGINS")
            .as_deref()
            .unwrap_or(DEFAULT_FRONTEND_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        // Credentialed CORS cannot answer with a wildcard origin
        if frontend_origins.iter().any(|origin| origin == "*") {
            bail!("FRONTEND_ORIGINS must list explicit origins, '*' is not allowed");
        }

        let upload_dir = PathBuf::from(get("UPLOAD_DIR").as_deref().unwrap_or(DEFAULT_UPLOAD_DIR));

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let token_secret = get("TOKEN_SECRET")
            .map(|raw| decode_secret(raw.trim()))
            .transpose()?;

        let token_ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("TOKEN_TTL_SECS must be a number of seconds")?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let password_pepper = get("PASSWORD_PEPPER").map(String::into_bytes);

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            frontend_origins,
            upload_dir,
            max_upload_bytes,
            token_secret,
            token_ttl_secs,
            password_pepper,
        })
    }

    /// Auth configuration; without `TOKEN_SECRET` a random key is used
    /// only when `allow_random_secret` is set
    pub fn auth_config(&self, allow_random_secret: bool) -> anyhow::Result<Arc<AuthConfig>> {
        let token_secret = match self.token_secret {
            Some(secret) => secret,
            None if allow_random_secret => {
                tracing::warn!("TOKEN_SECRET not set, using a random per-process secret");
                platform::crypto::random_key()
            }
            None => bail!("TOKEN_SECRET must be set in production"),
        };

        Ok(Arc::new(AuthConfig {
            token_secret,
            token_ttl: Duration::from_secs(self.token_ttl_secs),
            password_pepper: self.password_pepper.clone(),
        }))
    }
}

fn decode_secret(raw: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = Engine::decode(&general_purpose::STANDARD, raw)
        .context("TOKEN_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("TOKEN_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[("DATABASE_URL", "postgres://localhost/growth")]).unwrap();

        assert_eq!(s.database_max_connections, 5);
        assert_eq!(s.bind_addr.port(), 3001);
        assert_eq!(
            s.frontend_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(s.upload_dir, PathBuf::from("uploads"));
        assert_eq!(s.max_upload_bytes, 10_485_760);
        assert_eq!(s.token_ttl_secs, 86_400);
        assert!(s.token_secret.is_none());
        assert!(s.password_pepper.is_none());
    }

    #[test]
    fn test_database_url_required() {
        assert!(settings(&[]).is_err());
        assert!(settings(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        assert!(settings(&[("DATABASE_URL", "x"), ("FRONTEND_ORIGINS", "*")]).is_err());
        assert!(
            settings(&[
                ("DATABASE_URL", "x"),
                ("FRONTEND_ORIGINS", "https://app.example, *"),
            ])
            .is_err()
        );

        let s = settings(&[("DATABASE_URL", "x"), ("FRONTEND_ORIGINS", "https://app.example")])
            .unwrap();
        assert_eq!(s.frontend_origins, vec!["https://app.example".to_string()]);
    }

    #[test]
    fn test_token_secret_decoding() {
        let key = general_purpose::STANDARD.encode([7u8; 32]);
        let s = settings(&[("DATABASE_URL", "x"), ("TOKEN_SECRET", &key)]).unwrap();
        assert_eq!(s.token_secret, Some([7u8; 32]));

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(settings(&[("DATABASE_URL", "x"), ("TOKEN_SECRET", &short)]).is_err());
        assert!(settings(&[("DATABASE_URL", "x"), ("TOKEN_SECRET", "not base64!")]).is_err());
    }

    #[test]
    fn test_release_requires_secret() {
        let s = settings(&[("DATABASE_URL", "x")]).unwrap();
        assert!(s.auth_config(false).is_err());
        assert!(s.auth_config(true).is_ok());
    }

    #[test]
    fn test_auth_config_from_settings() {
        let key = general_purpose::STANDARD.encode([1u8; 32]);
        let s = settings(&[
            ("DATABASE_URL", "x"),
            ("TOKEN_SECRET", &key),
            ("TOKEN_TTL_SECS", "60"),
            ("PASSWORD_PEPPER", "pepper"),
        ])
        .unwrap();

        let config = s.auth_config(false).unwrap();
        assert_eq!(config.token_secret, [1u8; 32]);
        assert_eq!(config.token_ttl_secs(), 60);
        assert_eq!(config.pepper(), Some(b"pepper".as_slice()));
    }
}
