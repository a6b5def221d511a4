use axum::Router;
use mergington_core::config::Configuration;

use crate::{
    package_name,
    pages::{self, not_found_page},
    state::BoardState,
};

pub fn setup_all_routes(router: Router<BoardState>) -> Router<BoardState> {
    let router = pages::board::board_pages(router);

    router
}

pub fn axum_setup(state: BoardState) -> Router {
    let router = Router::new();

    let router = setup_all_routes(router);

    router.fallback(not_found_page).with_state(state)
}

pub async fn server_start(config: Configuration) -> anyhow::Result<()> {
    info!("Starting with config {:?}", config);
    let state = BoardState::new(config.clone())?;
    debug!("Configuring application server");
    let app = axum_setup(state);

    let server = axum::Server::try_bind(&config.listen_on)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());
    info!("Listening on {}, activities from {}", config.listen_on, config.api_base);
    if let Err(e) = server.await {
        error!("server error exit: {:?}", e);
        return Err(e.into());
    }
    println!("{} exited.", package_name());
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => error!("could not listen for shutdown signal: {}", e),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_verify_routes_build() {
        let router = axum::Router::new();

        super::setup_all_routes(router);
    }

    #[tokio::test]
    async fn test_setup_with_default_config() -> anyhow::Result<()> {
        let state = BoardState::new(Configuration::default())?;
        assert_eq!("/signup", state.routes.signup);
        assert_eq!("/unregister", state.routes.unregister);
        axum_setup(state);
        Ok(())
    }
}
