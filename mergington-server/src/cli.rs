use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};
use mergington_core::config::Configuration;
use mergington_dependencies::url::Url;

pub mod server;
pub mod show;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Extracurricular activities of Mergington High School", long_about = None)]
pub struct AppCli {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(flatten)]
    pub overrides: ConfigOverrides,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the activity board
    Server(ServerCli),
    /// Fetch the activities once and print them
    Show(ShowCli),
}

/// Flags taking precedence over `MERGINGTON_*` variables.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Root of the activities API
    #[clap(long, global = true, value_name = "URL")]
    pub api_base: Option<Url>,
    /// Address the board is served on
    #[clap(long, global = true, value_name = "ADDR")]
    pub listen_on: Option<SocketAddr>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: Configuration) -> Configuration {
        let config = match &self.api_base {
            Some(api_base) => config.with_api_base(api_base.clone()),
            None => config,
        };
        Configuration {
            listen_on: self.listen_on.unwrap_or(config.listen_on),
            ..config
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ServerCli {
    /// How long signup notices stay visible, in milliseconds
    #[clap(long, value_name = "MS")]
    pub notice_hide_after_ms: Option<u64>,
}

impl ServerCli {
    pub fn apply(&self, config: Configuration) -> Configuration {
        Configuration {
            notice_hide_after_ms: self
                .notice_hide_after_ms
                .unwrap_or(config.notice_hide_after_ms),
            ..config
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ShowCli {
    /// Only show this activity
    #[clap(long, short)]
    pub activity: Option<String>,
    /// Print the roster as the API returned it
    #[clap(long)]
    pub json: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_flags_override_environment() -> Result<(), clap::Error> {
        let cli = AppCli::try_parse_from([
            "mergington",
            "server",
            "--api-base",
            "http://api.internal:9000/school/",
            "--notice-hide-after-ms",
            "250",
        ])?;
        let config = cli.overrides.apply(Configuration::default());
        let config = match &cli.command {
            Command::Server(server) => server.apply(config),
            Command::Show(_) => panic!("parsed the wrong subcommand"),
        };
        assert_eq!("http://api.internal:9000/school/", config.api_base.as_str());
        assert_eq!(250, config.notice_hide_after_ms);
        assert_eq!(Configuration::default().listen_on, config.listen_on);
        Ok(())
    }

    #[test]
    pub fn test_show_flags() -> Result<(), clap::Error> {
        let cli = AppCli::try_parse_from([
            "mergington",
            "show",
            "-a",
            "Chess Club",
            "--json",
            "--listen-on",
            "0.0.0.0:9999",
        ])?;
        let config = cli.overrides.apply(Configuration::default());
        assert_eq!("0.0.0.0:9999", config.listen_on.to_string());
        match cli.command {
            Command::Show(show) => {
                assert_eq!(Some("Chess Club".to_string()), show.activity);
                assert!(show.json);
            }
            Command::Server(_) => panic!("parsed the wrong subcommand"),
        }
        Ok(())
    }

    #[test]
    pub fn test_bad_api_base_is_refused() {
        assert!(AppCli::try_parse_from(["mergington", "show", "--api-base", "not a url"]).is_err());
    }
}
