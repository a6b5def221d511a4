use axum_extra::routing::TypedPath;
use mergington_core::{
    config::Configuration, error::BoardResult, render::BoardRoutes, ActivityBoard,
    HttpActivityApi, Interaction,
};

use crate::pages::board::{PathSignup, PathUnregister};

/// Shared by every request. Boards themselves are per request.
#[derive(Clone, Debug)]
pub struct BoardState {
    pub config: Configuration,
    pub api: HttpActivityApi,
    pub routes: BoardRoutes,
}

impl BoardState {
    pub fn new(config: Configuration) -> BoardResult<Self> {
        let api = HttpActivityApi::new(&config)?;
        let routes = BoardRoutes {
            signup: PathSignup {}.to_uri().to_string(),
            unregister: PathUnregister {}.to_uri().to_string(),
        };
        Ok(Self {
            config,
            api,
            routes,
        })
    }

    pub fn board<I: Interaction>(&self, interaction: I) -> ActivityBoard<HttpActivityApi, I> {
        ActivityBoard::new(self.api.clone(), interaction)
            .with_hide_after(self.config.notice_hide_after())
    }
}
