#[macro_use]
extern crate tracing;

use mergington_dependencies::reqwest::{self, header::HeaderMap, Proxy};

use crate::config::Configuration;
use crate::error::BoardResult;

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod notice;
pub mod render;
#[cfg(any(test, feature = "test-upstream"))]
pub mod testing;

pub use api::{ActivityApi, HttpActivityApi};
pub use board::{ActionOutcome, ActivityBoard, Interaction, Listing, SignupForm};

/// Client for the activities API.
///
/// Only the connect phase may time out; a request that is under way is always waited for.
pub fn http_client(config: &Configuration) -> BoardResult<reqwest::Client> {
    let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
    let client = match config.connect_timeout() {
        Some(timeout) => client.connect_timeout(timeout),
        None => client,
    };
    let client = if let Some(proxy) = &config.proxy {
        client.proxy(Proxy::all(proxy.clone())?)
    } else {
        client
    };
    Ok(client.default_headers(common_headers(config)).build()?)
}

fn common_headers(config: &Configuration) -> HeaderMap {
    let mut hm = HeaderMap::new();
    let user_agent = match &config.user_agent {
        Some(user_agent) => user_agent.clone(),
        None => format!("{} v{}", package_name(), package_version()),
    };
    trace!("new user agent with value {}", user_agent);
    if let Ok(value) = user_agent.parse() {
        hm.append(reqwest::header::USER_AGENT, value);
    }
    hm
}

const fn package_name() -> &'static str {
    const NAME: &str = env!("CARGO_PKG_NAME");
    NAME
}

const fn package_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    VERSION
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_user_agent() {
        let hm = common_headers(&Configuration::default());
        assert_eq!(
            Some(format!("mergington-core v{}", package_version()).as_str()),
            hm.get(reqwest::header::USER_AGENT).and_then(|v| v.to_str().ok())
        );
        let config = Configuration {
            user_agent: Some("mergington-server v9".to_string()),
            ..Default::default()
        };
        let hm = common_headers(&config);
        assert_eq!(
            Some("mergington-server v9"),
            hm.get(reqwest::header::USER_AGENT).and_then(|v| v.to_str().ok())
        );
    }
}
