use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR {0:?}: {1}")]
    InvalidBindAddr(String, std::net::AddrParseError),
    #[error("Invalid DEBUG_ROUTES {0:?}: expected true or false")]
    InvalidFlag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub seed_file: PathBuf,
    pub debug_routes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "flashcards.db".into());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".into());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| ConfigError::InvalidBindAddr(bind_addr.clone(), e))?;

        let seed_file = lookup("SEED_FILE")
            .unwrap_or_else(|| "data/seed_words.json".into())
            .into();

        let debug_routes = match lookup("DEBUG_ROUTES") {
            None => false,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => return Err(ConfigError::InvalidFlag(value)),
            },
        };

        Ok(Config {
            database_url,
            bind_addr,
            seed_file,
            debug_routes,
        })
    }
}
