use std::{net::SocketAddr, time::Duration};

use mergington_dependencies::{envy, url::Url};

use crate::error::BoardResult;

/// Prefix of every environment variable read into the [`Configuration`].
pub const ENV_PREFIX: &str = "MERGINGTON_";

fn default_api_base() -> Url {
    Url::parse("http://localhost:8000/").expect("static default url must parse")
}

fn default_listen_on() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_notice_hide_after_ms() -> u64 {
    5000
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Root of the activities API. `activities` is resolved relative to it, so a base with a
    /// path prefix must end in a slash.
    #[serde(default = "default_api_base")]
    pub api_base: Url,
    #[serde(default = "default_listen_on")]
    pub listen_on: SocketAddr,
    /// How long a signup notice stays visible.
    #[serde(default = "default_notice_hide_after_ms")]
    pub notice_hide_after_ms: u64,
    /// Limits only how long connecting to the API may take. Requests themselves never time out.
    pub connect_timeout_ms: Option<u64>,
    /// Outgoing proxy for API calls, `socks5://` is supported.
    pub proxy: Option<Url>,
    /// Sent with every API call. Defaults to the client library's name and version.
    pub user_agent: Option<String>,
}

impl Configuration {
    /// Reads `MERGINGTON_*` variables, anything unset keeps its default.
    pub fn from_env() -> BoardResult<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Configuration>()?)
    }

    pub fn notice_hide_after(&self) -> Duration {
        Duration::from_millis(self.notice_hide_after_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            listen_on: default_listen_on(),
            notice_hide_after_ms: default_notice_hide_after_ms(),
            connect_timeout_ms: None,
            proxy: None,
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_defaults_from_empty_env() -> Result<(), envy::Error> {
        let config: Configuration =
            envy::prefixed(ENV_PREFIX).from_iter(Vec::<(String, String)>::new())?;
        assert_eq!(Configuration::default(), config);
        assert_eq!(Duration::from_secs(5), config.notice_hide_after());
        assert_eq!(None, config.connect_timeout());
        assert_eq!("127.0.0.1:8080", config.listen_on.to_string());
        assert_eq!(None, config.user_agent);
        Ok(())
    }

    #[test]
    pub fn test_env_overrides() -> Result<(), envy::Error> {
        let config: Configuration = envy::prefixed(ENV_PREFIX).from_iter(vec![
            (
                "MERGINGTON_API_BASE".to_string(),
                "http://api.mergington.edu/school/".to_string(),
            ),
            ("MERGINGTON_NOTICE_HIDE_AFTER_MS".to_string(), "250".to_string()),
            ("MERGINGTON_CONNECT_TIMEOUT_MS".to_string(), "1500".to_string()),
            ("UNRELATED".to_string(), "ignored".to_string()),
        ])?;
        assert_eq!("api.mergington.edu", config.api_base.host_str().unwrap_or_default());
        assert_eq!(Duration::from_millis(250), config.notice_hide_after());
        assert_eq!(Some(Duration::from_millis(1500)), config.connect_timeout());
        assert_eq!(default_listen_on(), config.listen_on);
        Ok(())
    }
}
