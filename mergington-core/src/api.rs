use async_trait::async_trait;
use mergington_dependencies::{
    reqwest::{self, StatusCode},
    serde_json::{self, Value},
    url::Url,
};
use mergington_models::{ActivityRoster, ApiDetail, ApiMessage, EmailBody};
use tracing::instrument;

use crate::{
    config::Configuration,
    error::{BoardError, BoardResult},
    http_client,
};

/// The activities API as seen by the board.
///
/// Every call is a single request with no retry. `Err(BoardError::Rejected)` means the API
/// answered with a non-2xx status; every other error is a transport or decoding failure.
#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn activities(&self) -> BoardResult<ActivityRoster>;
    async fn signup(&self, activity: &str, email: &str) -> BoardResult<ApiMessage>;
    async fn unregister(&self, activity: &str, email: &str) -> BoardResult<ApiMessage>;
}

#[derive(Clone, Debug)]
pub struct HttpActivityApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpActivityApi {
    pub fn new(config: &Configuration) -> BoardResult<Self> {
        Ok(Self::with_client(http_client(config)?, config.api_base.clone()))
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn activities_url(&self) -> BoardResult<Url> {
        Ok(self.base.join("activities")?)
    }

    /// `/activities/{activity}/{action}` with the activity name escaped as one path segment.
    fn action_url(&self, activity: &str, action: &str) -> BoardResult<Url> {
        let mut url = self.activities_url()?;
        url.path_segments_mut()
            .map_err(|_| BoardError::CannotBeABase(self.base.to_string()))?
            .push(activity)
            .push(action);
        Ok(url)
    }

    async fn post_email(&self, url: Url, email: &str) -> BoardResult<ApiMessage> {
        debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .json(&EmailBody::new(email))
            .send()
            .await?;
        read_message(resp).await
    }
}

/// Any JSON body is read; only a body that is not JSON at all is a decoding failure.
async fn read_body(resp: reqwest::Response) -> BoardResult<(StatusCode, Value)> {
    let status: StatusCode = resp.status();
    let body = resp.bytes().await?;
    Ok((status, serde_json::from_slice(&body)?))
}

fn rejection(status: StatusCode, body: Value) -> BoardError {
    let detail = ApiDetail::from_value(body);
    trace!("API rejected request: {} {:?}", status, detail);
    BoardError::Rejected {
        status: status.as_u16(),
        detail: detail.message(),
    }
}

async fn read_message(resp: reqwest::Response) -> BoardResult<ApiMessage> {
    match read_body(resp).await? {
        (status, body) if status.is_success() => Ok(ApiMessage::from_value(body)),
        (status, body) => Err(rejection(status, body)),
    }
}

#[async_trait]
impl ActivityApi for HttpActivityApi {
    #[instrument(skip(self))]
    async fn activities(&self) -> BoardResult<ActivityRoster> {
        let url = self.activities_url()?;
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        match read_body(resp).await? {
            (status, body) if status.is_success() => Ok(serde_json::from_value(body)?),
            (status, body) => Err(rejection(status, body)),
        }
    }

    #[instrument(skip(self))]
    async fn signup(&self, activity: &str, email: &str) -> BoardResult<ApiMessage> {
        let url = self.action_url(activity, "signup")?;
        self.post_email(url, email).await
    }

    #[instrument(skip(self))]
    async fn unregister(&self, activity: &str, email: &str) -> BoardResult<ApiMessage> {
        let url = self.action_url(activity, "unregister")?;
        self.post_email(url, email).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::FakeUpstream;

    fn api_for(upstream: &FakeUpstream) -> HttpActivityApi {
        HttpActivityApi::new(&Configuration::default().with_api_base(upstream.base_url()))
            .expect("client builds")
    }

    #[test]
    pub fn test_action_url_escapes_name_as_one_segment() -> BoardResult<()> {
        let api = HttpActivityApi::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:8000/")?,
        );
        assert_eq!(
            "http://localhost:8000/activities/Chess%20Club/signup",
            api.action_url("Chess Club", "signup")?.as_str()
        );
        assert_eq!(
            "http://localhost:8000/activities/Arts%2FCrafts%3F/unregister",
            api.action_url("Arts/Crafts?", "unregister")?.as_str()
        );
        Ok(())
    }

    #[test]
    pub fn test_base_with_path_prefix() -> BoardResult<()> {
        let api = HttpActivityApi::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:8000/school/")?,
        );
        assert_eq!(
            "http://localhost:8000/school/activities",
            api.activities_url()?.as_str()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_roster() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        let roster = api_for(&upstream).activities().await?;
        let chess = roster.get("Chess Club").expect("seeded activity");
        assert_eq!(12, chess.max_participants);
        assert_eq!(
            vec!["michael@mergington.edu", "daniel@mergington.edu"],
            chess.participants
        );
        assert_eq!(Some("Chess Club"), roster.names().next());
        Ok(())
    }

    #[tokio::test]
    async fn test_signup_and_unregister_cycle() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        let api = api_for(&upstream);
        let msg = api.signup("Basketball Team", "tester@mergington.edu").await?;
        assert_eq!(
            "Signed up tester@mergington.edu for Basketball Team",
            msg.message
        );
        assert!(upstream.participants("Basketball Team").contains(&"tester@mergington.edu".to_string()));

        api.unregister("Basketball Team", "tester@mergington.edu").await?;
        assert!(upstream.participants("Basketball Team").is_empty());
        assert!(upstream
            .requests()
            .contains(&"POST /activities/Basketball%20Team/unregister".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_carries_detail() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        let api = api_for(&upstream);
        let err = api
            .signup("Chess Club", "michael@mergington.edu")
            .await
            .expect_err("duplicate signup must be rejected");
        assert!(err.is_rejection());
        assert_eq!(
            Some("Student already signed up for this activity"),
            err.detail()
        );

        let err = api
            .unregister("Underwater Basket Weaving", "michael@mergington.edu")
            .await
            .expect_err("unknown activity must be rejected");
        match err {
            BoardError::Rejected { status, detail } => {
                assert_eq!(404, status);
                assert_eq!(Some("Activity not found".to_string()), detail);
            }
            other => panic!("unexpected error {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_any_json_body_decides_by_status() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        let api = api_for(&upstream);

        upstream.answer_actions_with(200, serde_json::json!({}));
        let msg = api.signup("Chess Club", "a@mergington.edu").await?;
        assert_eq!("", msg.message);

        for body in [serde_json::json!("x"), serde_json::json!([]), Value::Null] {
            upstream.answer_actions_with(400, body);
            match api.unregister("Chess Club", "a@mergington.edu").await {
                Err(BoardError::Rejected { status, detail }) => {
                    assert_eq!(400, status);
                    assert_eq!(None, detail);
                }
                other => panic!("expected a rejection, got {:?}", other),
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_api_is_not_a_rejection() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        let base = upstream.base_url();
        upstream.shutdown().await;
        let api = HttpActivityApi::new(&Configuration::default().with_api_base(base))?;
        let err = api.activities().await.expect_err("nothing is listening");
        assert!(!err.is_rejection());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_failure() -> BoardResult<()> {
        let upstream = FakeUpstream::start().await;
        upstream.serve_garbage(true);
        let err = api_for(&upstream)
            .activities()
            .await
            .expect_err("garbage must not decode");
        assert!(matches!(err, BoardError::SerdeJson(_)));
        Ok(())
    }
}
