use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub key_file: PathBuf,
    pub font_dir: PathBuf,
    pub fallback_font: Option<PathBuf>,
    pub public_url: Option<String>,
    pub image_requires_unlock: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset or empty variables take their
    /// default; malformed numbers and flags are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("KEEPSAKE_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("KEEPSAKE_PORT is not a port number: {:?}", raw))?,
            None => 5000,
        };

        let image_requires_unlock = match var("KEEPSAKE_IMAGE_REQUIRES_UNLOCK") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("KEEPSAKE_IMAGE_REQUIRES_UNLOCK is not a boolean: {:?}", raw))?,
            None => false,
        };

        Ok(Self {
            host: var("KEEPSAKE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://keepsake.db".into()),
            key_file: var("KEEPSAKE_KEY_FILE").unwrap_or_else(|| "secret.key".into()).into(),
            font_dir: var("KEEPSAKE_FONT_DIR").unwrap_or_else(|| "static/fonts".into()).into(),
            fallback_font: var("KEEPSAKE_FALLBACK_FONT").map(PathBuf::from),
            public_url: var("KEEPSAKE_PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            image_requires_unlock,
        })
    }

    /// Listen address. `host` is an IPv4 or IPv6 literal, e.g. `0.0.0.0` or `::`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .with_context(|| format!("KEEPSAKE_HOST is not an IP address: {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected true or false"),
    }
}
