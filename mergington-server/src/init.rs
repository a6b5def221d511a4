use tracing_subscriber::EnvFilter;

use mergington_dependencies::{better_panic, kankyo};

/// Installs the panic handler, loads `.env` and sets up the subscriber.
///
/// `RUST_LOG` is honored when set, otherwise everything at `info` and above is logged.
pub fn logging() {
    better_panic::install();
    let dotenv = kankyo::load(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Err(e) = dotenv {
        info!("couldn't load .env file: {}, this is probably fine", e);
    }
}
