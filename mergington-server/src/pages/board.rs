use async_trait::async_trait;
use axum::{extract::State, Form, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use maud::{html, Markup};
use mergington_core::{
    error::BoardResult,
    events::{BoardEvent, EventError, ACTION_SIGNUP, ACTION_UNREGISTER},
    render::{self, BoardView},
    ActionOutcome, Interaction, Listing,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    pages::{frontmatter, HtmlResponse},
    state::BoardState,
};

/// Form field answering the removal prompt.
pub const FIELD_CONFIRMED: &str = "confirmed";
pub const CONFIRMED_YES: &str = "yes";

pub fn board_pages(r: Router<BoardState>) -> Router<BoardState> {
    r.typed_get(index)
        .typed_get(fragment)
        .typed_post(signup)
        .typed_post(unregister)
}

/// Answers the board's prompts from what came with the request and collects its alerts for
/// the page.
#[derive(Debug, Default)]
pub struct PageInteraction {
    confirmed: bool,
    prompt: Option<String>,
    alerts: Vec<String>,
}

impl PageInteraction {
    pub fn confirming(confirmed: bool) -> Self {
        Self {
            confirmed,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Interaction for PageInteraction {
    async fn confirm(&mut self, prompt: &str) -> bool {
        self.prompt = Some(prompt.to_string());
        self.confirmed
    }

    async fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

fn alerts(alerts: &[String]) -> Markup {
    html! {
        @if !alerts.is_empty() {
            div.alerts role="alert" {
                @for alert in alerts {
                    p.alert { (alert) }
                }
            }
        }
    }
}

fn board_page(state: &BoardState, view: &BoardView<'_>, raised: &[String]) -> Markup {
    frontmatter(html! {
        (alerts(raised))
        (render::board(&state.routes, view))
    })
}

/// Asks again, as a form that repeats the event with the answer attached.
fn confirm_page(action: &str, prompt: &str, event: &BoardEvent) -> Markup {
    frontmatter(html! {
        section.confirm {
            h3 { "Please confirm" }
            p { (prompt) }
            form method="post" action=(action) {
                @for (name, value) in event.attributes() {
                    input type="hidden" name=(name.strip_prefix("data-").unwrap_or(name)) value=(value);
                }
                input type="hidden" name=(FIELD_CONFIRMED) value=(CONFIRMED_YES);
                button type="submit" { "Yes" }
                a href=(PathBoardIndex {}.to_uri()) { "Cancel" }
            }
        }
    })
}

#[derive(TypedPath, Deserialize, Debug)]
#[typed_path("/")]
pub struct PathBoardIndex {}

#[instrument(skip_all)]
pub async fn index(_: PathBoardIndex, State(state): State<BoardState>) -> HtmlResponse {
    let mut board = state.board(PageInteraction::default());
    board.load_activities().await;
    board_page(&state, &board.view(), &[]).into()
}

#[derive(TypedPath, Deserialize, Debug)]
#[typed_path("/board")]
pub struct PathBoardFragment {}

/// Activity list and selector options without the page around them.
#[instrument(skip_all)]
pub async fn fragment(_: PathBoardFragment, State(state): State<BoardState>) -> HtmlResponse {
    let mut board = state.board(PageInteraction::default());
    board.load_activities().await;
    let body = html! {
        (render::activity_list_with(&state.routes, board.listing()))
        (render::activity_select(board.listing(), &board.form().activity))
    };
    body.into()
}

#[derive(TypedPath, Deserialize, Debug)]
#[typed_path("/signup")]
pub struct PathSignup {}

#[instrument(skip_all)]
pub async fn signup(
    _: PathSignup,
    State(state): State<BoardState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> BoardResult<HtmlResponse> {
    run_event(&state, ACTION_SIGNUP, fields).await
}

#[derive(TypedPath, Deserialize, Debug)]
#[typed_path("/unregister")]
pub struct PathUnregister {}

#[instrument(skip_all)]
pub async fn unregister(
    _: PathUnregister,
    State(state): State<BoardState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> BoardResult<HtmlResponse> {
    run_event(&state, ACTION_UNREGISTER, fields).await
}

/// Decodes the posted fields into an event for the route's action and runs it on a fresh board.
async fn run_event(
    state: &BoardState,
    route_action: &'static str,
    fields: Vec<(String, String)>,
) -> BoardResult<HtmlResponse> {
    let confirmed = fields
        .iter()
        .any(|(k, v)| k == FIELD_CONFIRMED && v == CONFIRMED_YES);
    let fields = std::iter::once(("action".to_string(), route_action.to_string()))
        .chain(fields.into_iter().filter(|(k, _)| k != FIELD_CONFIRMED));
    let event = BoardEvent::from_attributes(fields)?;
    if event.action() != route_action {
        return Err(EventError::UnknownAction(event.action().to_string()).into());
    }

    let mut board = state.board(PageInteraction::confirming(confirmed));
    if let BoardEvent::Signup { .. } = event {
        // a rejected signup keeps the selection, so the options must be there before it
        board.load_activities().await;
    }
    let outcome = board.dispatch(event.clone()).await;
    debug!("{} finished with {:?}", route_action, outcome);

    if outcome == ActionOutcome::Declined {
        let prompt = board.interaction().prompt.clone().unwrap_or_default();
        return Ok(confirm_page(&state.routes.unregister, &prompt, &event).into());
    }
    if matches!(board.listing(), Listing::Loading) {
        board.load_activities().await;
    }
    Ok(board_page(state, &board.view(), &board.interaction().alerts).into())
}
