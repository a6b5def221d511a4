//! In-process stand-in for the activities API, used by tests.
//!
//! Serves the same routes, bodies and status codes as the real API, seeded with the school's
//! activity list, and records every request line it receives.

use std::{
    net::{SocketAddr, TcpListener},
    sync::{Arc, Mutex, MutexGuard},
};

use mergington_dependencies::{
    axum::{
        self,
        extract::{Path, State},
        http::{StatusCode, Uri},
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    },
    serde_json::{json, Value},
    url::Url,
};
use mergington_models::{Activity, ActivityRoster, ApiDetail, ApiMessage, EmailBody};
use tokio::{sync::oneshot, task::JoinHandle};

const SCHOOL_DOMAIN: &str = "@mergington.edu";

pub fn seed_activities() -> Vec<Activity> {
    vec![
        Activity::new("Chess Club")
            .with_description("Learn strategies and compete in chess tournaments")
            .with_schedule("Fridays, 3:30 PM - 5:00 PM")
            .with_capacity(12)
            .with_participant("michael@mergington.edu")
            .with_participant("daniel@mergington.edu"),
        Activity::new("Programming Class")
            .with_description("Learn programming fundamentals and build software projects")
            .with_schedule("Tuesdays and Thursdays, 3:30 PM - 4:30 PM")
            .with_capacity(20)
            .with_participant("emma@mergington.edu")
            .with_participant("sophia@mergington.edu"),
        Activity::new("Basketball Team")
            .with_description("Competitive basketball training and games")
            .with_schedule("Tuesdays and Thursdays, 4:00 PM - 6:00 PM")
            .with_capacity(15),
        Activity::new("Art Studio")
            .with_description("Express creativity through painting and drawing")
            .with_schedule("Wednesdays, 3:30 PM - 5:00 PM")
            .with_capacity(1)
            .with_participant("olivia@mergington.edu"),
    ]
}

#[derive(Default)]
struct Inner {
    activities: Vec<Activity>,
    requests: Vec<String>,
    garbage: bool,
    canned: Option<(StatusCode, Value)>,
}

#[derive(Clone, Default)]
struct UpstreamState {
    inner: Arc<Mutex<Inner>>,
}

impl UpstreamState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct FakeUpstream {
    addr: SocketAddr,
    state: UpstreamState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        Self::start_with(seed_activities()).await
    }

    pub async fn start_with(activities: Vec<Activity>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("could not bind fake upstream");
        let addr = listener.local_addr().expect("bound listener has an address");
        let state = UpstreamState::default();
        state.lock().activities = activities;

        let router = Router::new()
            .route("/activities", get(list_activities))
            .route("/activities/:name/signup", post(signup))
            .route("/activities/:name/unregister", post(unregister))
            .with_state(state.clone());
        let (tx, rx) = oneshot::channel::<()>();
        let server = axum::Server::from_tcp(listener)
            .expect("fake upstream listener usable")
            .serve(router.into_make_service())
            .with_graceful_shutdown(async {
                rx.await.ok();
            });
        let handle = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("fake upstream exited: {}", e);
            }
        });
        debug!("fake upstream listening on {}", addr);
        Self {
            addr,
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("socket address forms a url")
    }

    /// Request lines received so far, as `METHOD /raw/path`.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn count_requests(&self, line: &str) -> usize {
        self.state.lock().requests.iter().filter(|r| *r == line).count()
    }

    pub fn participants(&self, activity: &str) -> Vec<String> {
        self.state
            .lock()
            .activities
            .iter()
            .find(|a| a.name == activity)
            .map(|a| a.participants.clone())
            .unwrap_or_default()
    }

    /// Makes `GET /activities` answer with a body that is not JSON.
    pub fn serve_garbage(&self, garbage: bool) {
        self.state.lock().garbage = garbage;
    }

    /// Makes signup and unregister answer with `status` and `body` instead of acting.
    pub fn answer_actions_with(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state.lock().canned = Some((status, body));
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(handle) = self.handle.take() {
            handle.await.ok();
        }
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn reject(status: StatusCode, detail: &str) -> Response {
    (status, Json(ApiDetail::from_message(detail))).into_response()
}

async fn list_activities(State(state): State<UpstreamState>, uri: Uri) -> Response {
    let mut inner = state.lock();
    inner.requests.push(format!("GET {}", uri.path()));
    if inner.garbage {
        return (StatusCode::OK, "<html>Bad Gateway</html>").into_response();
    }
    let roster: ActivityRoster = inner.activities.iter().cloned().collect();
    Json(roster).into_response()
}

fn canned(inner: &Inner) -> Option<Response> {
    inner
        .canned
        .as_ref()
        .map(|(status, body)| (*status, Json(body.clone())).into_response())
}

fn check_domain(email: &str) -> Option<Response> {
    if email.ends_with(SCHOOL_DOMAIN) {
        return None;
    }
    let body = json!({
        "detail": [{
            "type": "value_error",
            "loc": ["body", "email"],
            "msg": "Value error, Email must be from @mergington.edu domain",
        }]
    });
    Some((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
}

async fn signup(
    State(state): State<UpstreamState>,
    Path(name): Path<String>,
    uri: Uri,
    Json(body): Json<EmailBody>,
) -> Response {
    let mut inner = state.lock();
    inner.requests.push(format!("POST {}", uri.path()));
    if let Some(answer) = canned(&inner) {
        return answer;
    }
    if let Some(rejection) = check_domain(&body.email) {
        return rejection;
    }
    let Some(activity) = inner.activities.iter_mut().find(|a| a.name == name) else {
        return reject(StatusCode::NOT_FOUND, "Activity not found");
    };
    if activity.is_registered(&body.email) {
        return reject(
            StatusCode::BAD_REQUEST,
            "Student already signed up for this activity",
        );
    }
    if activity.spots_left() == 0 {
        return reject(StatusCode::BAD_REQUEST, "Activity is at maximum capacity");
    }
    activity.participants.push(body.email.clone());
    Json(ApiMessage {
        message: format!("Signed up {} for {}", body.email, name),
    })
    .into_response()
}

async fn unregister(
    State(state): State<UpstreamState>,
    Path(name): Path<String>,
    uri: Uri,
    Json(body): Json<EmailBody>,
) -> Response {
    let mut inner = state.lock();
    inner.requests.push(format!("POST {}", uri.path()));
    if let Some(answer) = canned(&inner) {
        return answer;
    }
    if let Some(rejection) = check_domain(&body.email) {
        return rejection;
    }
    let Some(activity) = inner.activities.iter_mut().find(|a| a.name == name) else {
        return reject(StatusCode::NOT_FOUND, "Activity not found");
    };
    if !activity.is_registered(&body.email) {
        return reject(
            StatusCode::BAD_REQUEST,
            "Student not registered for this activity",
        );
    }
    activity.participants.retain(|p| p != &body.email);
    Json(ApiMessage {
        message: format!("Unregistered {} from {}", body.email, name),
    })
    .into_response()
}
