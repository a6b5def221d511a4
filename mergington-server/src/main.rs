#[macro_use]
extern crate tracing;

use std::time::Duration;

use clap::Parser;
use mergington_core::config::Configuration;

use crate::cli::{AppCli, Command};

mod cli;
mod init;
mod pages;
mod state;

pub const fn package_name() -> &'static str {
    const NAME: &str = env!("CARGO_PKG_NAME");
    NAME
}

pub fn package_full() -> String {
    format!("{} v{}", package_name(), env!("CARGO_PKG_VERSION"))
}

fn thread_name(id: usize) -> String {
    format!("{}-{}", package_name(), id)
}

fn main() -> anyhow::Result<()> {
    crate::init::logging();
    let cli = AppCli::parse();
    let config = cli.overrides.apply(Configuration::from_env()?);
    let config = Configuration {
        user_agent: config.user_agent.or_else(|| Some(package_full())),
        ..config
    };

    use tokio::runtime::Builder;
    let runtime = Builder::new_multi_thread()
        .thread_name_fn(|| {
            use std::sync::atomic::{AtomicUsize, Ordering};
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            thread_name(ATOMIC_ID.fetch_add(1, Ordering::SeqCst))
        })
        .enable_all()
        .build()?;

    match cli.command {
        Command::Server(server) => {
            info!("Starting {}", package_full());
            let config = server.apply(config);
            runtime.block_on(crate::cli::server::server_start(config))?;
            runtime.shutdown_timeout(Duration::from_secs(10));
        }
        Command::Show(show) => {
            runtime.block_on(crate::cli::show::show(config, show))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_names_come_from_the_binary_crate() {
        assert_eq!("mergington-server", package_name());
        assert_eq!("mergington-server-3", thread_name(3));
        assert!(package_full().starts_with("mergington-server v"));
    }
}
