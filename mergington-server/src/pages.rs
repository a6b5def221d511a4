use axum::{
    headers::{ContentType, HeaderMapExt},
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};

pub mod board;

const STYLESHEET: &str = include_str!("../res/board.css");

pub struct HtmlResponse {
    pub content: String,
}

impl IntoResponse for HtmlResponse {
    fn into_response(self) -> axum::response::Response {
        let mut hm = HeaderMap::new();
        hm.typed_insert(ContentType::html());
        (hm, self.content).into_response()
    }
}

impl From<String> for HtmlResponse {
    fn from(s: String) -> Self {
        Self { content: s }
    }
}

impl From<maud::PreEscaped<String>> for HtmlResponse {
    fn from(s: maud::PreEscaped<String>) -> Self {
        Self { content: s.0 }
    }
}

/// Document shell around every page.
pub fn frontmatter(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Mergington High School Activities" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                header {
                    h1 { "Mergington High School" }
                    h2 { "Extracurricular Activities" }
                }
                main { (body) }
                footer {
                    p { "© 2023 Mergington High School" }
                }
            }
        }
    }
}

pub fn error_page(error: &str) -> Markup {
    frontmatter(html! {
        div.error.wrapper {
            h3.error.title { "An error occured while processing your request" }
            p { (error) }
            a href="/" { "Back to the activities" }
        }
    })
}

pub async fn not_found_page(uri: Uri) -> (StatusCode, HtmlResponse) {
    debug!("no route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        error_page(&format!("Page not found: {}", uri.path())).into(),
    )
}
