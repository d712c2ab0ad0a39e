use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use agent::{AGENT_TIMEOUT, AGENT_URL};
use anyhow::{Error, anyhow};
use tracing::{info, warn};
use url::Url;

pub const ILLUSTRATION_URL: &str = "https://i.ibb.co/TTH7Grb/farcaster.png";
pub const ILLUSTRATION_TIMEOUT: Duration = Duration::from_secs(4);
pub const CONVERSE_URL: &str = "https://converse.xyz/dm/0x0EDf09105b3875855F62bAEc1d8A412fDC7D607b";

pub struct Config {
    pub port: u16,
    pub origin: String,
    pub agent_url: String,
    pub agent_timeout: Duration,
    pub illustration_url: String,
    pub illustration_timeout: Duration,
    pub converse_url: String,
    pub font_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let port: u16 = try_load("RUST_PORT", "3000")?;

        let origin: Url = try_load("FRAME_ORIGIN", &format!("http://localhost:{port}"))?;

        Ok(Self {
            port,
            origin: origin.as_str().trim_end_matches('/').to_string(),
            agent_url: try_load("AGENT_URL", AGENT_URL)?,
            agent_timeout: millis("AGENT_TIMEOUT_MS", AGENT_TIMEOUT)?,
            illustration_url: try_load("ILLUSTRATION_URL", ILLUSTRATION_URL)?,
            illustration_timeout: millis("ILLUSTRATION_TIMEOUT_MS", ILLUSTRATION_TIMEOUT)?,
            converse_url: try_load("CONVERSE_URL", CONVERSE_URL)?,
            font_dir: try_load("FONT_DIR", ".")?,
        })
    }
}

fn millis(key: &str, default: Duration) -> Result<Duration, Error> {
    try_load(key, &default.as_millis().to_string()).map(Duration::from_millis)
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agent::AGENT_TIMEOUT;

    use super::{millis, try_load};

    #[test]
    fn test_default() {
        let port: u16 = try_load("FRAME_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_default_agent_timeout() {
        let timeout = millis("FRAME_TEST_UNSET_TIMEOUT", AGENT_TIMEOUT).unwrap();
        assert_eq!(timeout, Duration::from_millis(4000));
    }

    #[test]
    fn test_invalid_default() {
        let port = try_load::<u16>("FRAME_TEST_UNSET_PORT", "not a port");
        assert!(port.is_err());
    }
}
