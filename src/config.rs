//! Runtime configuration, read from the environment.
//!
//! | Variable             | Required | Default                        |
//! |----------------------|----------|--------------------------------|
//! | `DISCORD_TOKEN`      | yes      |                                |
//! | `DISCORD_CLIENT_ID`  | yes      |                                |
//! | `DISCORD_PUBLIC_KEY` | yes      |                                |
//! | `DISCORD_API_BASE`   | no       | `https://discord.com/api/v10`  |
//! | `PORT`               | no       | `3000`                         |
//!
//! The Discord variables are only required for Discord: without them the
//! liveness route is still served.

use crate::discord::{
    api::API_BASE,
    auth::{BotToken, PublicKey},
};
use std::{env, fmt};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;

pub struct Config {
    pub port: u16,
    pub discord: Result<DiscordConfig, ConfigError>,
}

pub struct DiscordConfig {
    pub token: BotToken,
    pub application_id: String,
    pub public_key: PublicKey,
    pub api_base: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "missing ${}", var),
            ConfigError::Invalid(var) => write!(f, "invalid ${}", var),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|k| env::var(k).ok())
    }

    /// As [Config::from_env], reading variables through `lookup`. Empty values
    /// count as missing.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Config {
        let var = |k: &str| lookup(k).filter(|x| !x.trim().is_empty());

        let port = match var("PORT").map(|x| x.parse::<u16>()) {
            None => DEFAULT_PORT,
            Some(Ok(x)) => x,
            Some(Err(_)) => {
                warn!("Could not parse $PORT, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        Config {
            port,
            discord: discord_config(&var),
        }
    }
}

fn discord_config<F: Fn(&str) -> Option<String>>(var: &F) -> Result<DiscordConfig, ConfigError> {
    let token = var("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
    let application_id =
        var("DISCORD_CLIENT_ID").ok_or(ConfigError::Missing("DISCORD_CLIENT_ID"))?;
    let public_key = var("DISCORD_PUBLIC_KEY").ok_or(ConfigError::Missing("DISCORD_PUBLIC_KEY"))?;

    if !application_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Invalid("DISCORD_CLIENT_ID"));
    }

    let public_key =
        PublicKey::from_hex(&public_key).ok_or(ConfigError::Invalid("DISCORD_PUBLIC_KEY"))?;

    Ok(DiscordConfig {
        token: BotToken(token.trim().to_owned()),
        application_id,
        public_key,
        api_base: var("DISCORD_API_BASE").unwrap_or_else(|| API_BASE.to_owned()),
    })
}
