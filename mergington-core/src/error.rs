use mergington_dependencies::{
    axum::{
        headers::{ContentType, HeaderMapExt},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
    },
    envy, reqwest, serde_json, url,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Network Error talking to activities API: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Could not decode API response: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Could not build API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API base URL {0:?} cannot carry path segments")]
    CannotBeABase(String),
    #[error("Could not read configuration: {0}")]
    Envy(#[from] envy::Error),
    #[error("API rejected the request with status {status}: {detail:?}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("Invalid board event: {0}")]
    Event(#[from] crate::events::EventError),
}

impl BoardError {
    /// True for failures the API reported itself, as opposed to transport or decoding failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BoardError::Rejected { .. })
    }

    /// The API's own wording of a rejection, if it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BoardError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

pub type BoardResult<T> = std::result::Result<T, BoardError>;

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::Event(_) => StatusCode::BAD_REQUEST,
            BoardError::Reqwest(_) | BoardError::SerdeJson(_) | BoardError::Rejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let c = match &self {
            BoardError::Event(e) => maud::html! {
                "Bad Request"
                br;
                b { (e.to_string()) }
            },
            _ => {
                error!("Error presented to user: {:?}", self);
                maud::html! {
                    "Internal Error"
                    br;
                }
            }
        };
        let c: String = c.into_string();
        let mut hm = HeaderMap::new();
        hm.typed_insert(ContentType::html());
        (status, hm, c).into_response()
    }
}
