//! Request dispatcher shared by every API facade.
//!
//! A [`Requester`] pairs a [`Session`] with a service base URL. Each call
//! goes through [`RequestBuilder::send`], which
//! * starts from a snapshot of the session headers and overlays per-call headers
//! * performs exactly one round trip, with no retries
//! * renders the exchange to the diagnostic transcript
//! * enforces the expected status before handing the response back
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{de::DeserializeOwned, Serialize};
use tracing::*;

use crate::{schema::Validate, session::Session, status::ExpectedStatus, transcript, Error, Result};

pub use reqwest::{Method, StatusCode, Url};

#[derive(Debug, Clone)]
pub struct LogRequest {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct LogResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// One completed request/response pair.
#[derive(Debug, Clone)]
pub struct Log {
    pub request: LogRequest,
    pub response: LogResponse,
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Body parsed as JSON, `None` when empty or not JSON.
    pub fn parsed_body(&self) -> Option<serde_json::Value> {
        if self.text.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.text).ok()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Deserializes the body and checks it against its field constraints.
    pub fn validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let value: T = self.json()?;
        value.validate()?;
        Ok(value)
    }

    async fn from(res: reqwest::Response) -> Result<Self> {
        let status = res.status();
        let headers = res.headers().clone();
        let text = res.text().await?;
        Ok(Response {
            status,
            headers,
            text,
        })
    }
}

/// Session plus base URL of one remote service.
#[derive(Debug, Clone, Copy)]
pub struct Requester<'a> {
    session: &'a Session,
    base_url: &'a str,
}

impl<'a> Requester<'a> {
    pub fn new(session: &'a Session, base_url: &'a str) -> Requester<'a> {
        Requester { session, base_url }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    pub fn base_url(&self) -> &'a str {
        self.base_url
    }

    /// Starts a request to `base_url + endpoint`. The path is appended as is.
    pub fn request(&self, method: Method, endpoint: &str) -> RequestBuilder<'a> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!("Requesting {method} {url}");
        RequestBuilder {
            inner: self.session.client().request(method, url),
            session: self.session,
            headers: self.session.headers().clone(),
            expected: ExpectedStatus::default(),
            log: true,
            error: None,
        }
    }

    pub fn get(&self, endpoint: &str) -> RequestBuilder<'a> {
        self.request(Method::GET, endpoint)
    }

    pub fn post(&self, endpoint: &str) -> RequestBuilder<'a> {
        self.request(Method::POST, endpoint)
    }

    pub fn put(&self, endpoint: &str) -> RequestBuilder<'a> {
        self.request(Method::PUT, endpoint)
    }

    pub fn patch(&self, endpoint: &str) -> RequestBuilder<'a> {
        self.request(Method::PATCH, endpoint)
    }

    pub fn delete(&self, endpoint: &str) -> RequestBuilder<'a> {
        self.request(Method::DELETE, endpoint)
    }
}

/// A request under construction. Errors raised while building (bad header,
/// unserializable body) are held back and returned by [`RequestBuilder::send`].
#[must_use = "a request does nothing until `send` is awaited"]
pub struct RequestBuilder<'a> {
    inner: reqwest::RequestBuilder,
    session: &'a Session,
    headers: HeaderMap,
    expected: ExpectedStatus,
    log: bool,
    error: Option<Error>,
}

impl<'a> RequestBuilder<'a> {
    /// JSON body. Optional model fields left as `None` are not sent.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> RequestBuilder<'a> {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.inner = self.inner.body(bytes),
            Err(e) => {
                self.error.get_or_insert(Error::Serialize(e));
            }
        }
        self
    }

    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> RequestBuilder<'a> {
        self.inner = self.inner.query(query);
        self
    }

    /// Per-call header; replaces a session header with the same name.
    pub fn header<K, V>(mut self, key: K, value: V) -> RequestBuilder<'a>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: std::fmt::Display,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: std::fmt::Display,
    {
        let name = HeaderName::try_from(key).map_err(|e| Error::InvalidHeader(e.to_string()));
        let value = HeaderValue::try_from(value).map_err(|e| Error::InvalidHeader(e.to_string()));
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) | (_, Err(e)) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> RequestBuilder<'a> {
        for (name, value) in headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn expect_status(mut self, expected: impl Into<ExpectedStatus>) -> RequestBuilder<'a> {
        self.expected = expected.into();
        self
    }

    pub fn without_logging(mut self) -> RequestBuilder<'a> {
        self.log = false;
        self
    }

    pub fn expected(&self) -> &ExpectedStatus {
        &self.expected
    }

    pub async fn send(self) -> Result<Response> {
        let RequestBuilder {
            inner,
            session,
            headers,
            expected,
            log,
            error,
        } = self;
        if let Some(e) = error {
            return Err(e);
        }
        expected.ensure_non_empty()?;

        let req = inner.headers(headers).build()?;
        let log_request = LogRequest {
            url: req.url().clone(),
            method: req.method().clone(),
            headers: req.headers().clone(),
            body: req.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
        };

        let res = match session.client().execute(req).await {
            Ok(res) => Response::from(res).await?,
            Err(e) => {
                debug!(
                    "{} {} failed before a response arrived: {e}",
                    log_request.method, log_request.url
                );
                return Err(e.into());
            }
        };

        if log {
            transcript::emit(&Log {
                request: log_request,
                response: LogResponse {
                    status: res.status,
                    headers: res.headers.clone(),
                    body: res.text.clone(),
                },
            });
        }

        expected.check(res.status)?;
        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Serialize)]
    struct Partial {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        rating: Option<u8>,
    }

    #[tokio::test]
    async fn sends_session_headers_and_body() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/genres")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_header("authorization", "Bearer token")
            .match_body(Matcher::JsonString(r#"{"name":"Drama"}"#.into()))
            .with_status(201)
            .with_body(r#"{"id":1,"name":"Drama"}"#)
            .create_async()
            .await;

        let session = Session::new().with_bearer("token")?;
        let base_url = server.url();
        let requester = Requester::new(&session, &base_url);
        let res = requester
            .post("/genres")
            .json(&Partial {
                name: "Drama".into(),
                rating: None,
            })
            .expect_status(201u16)
            .send()
            .await?;

        m.assert_async().await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.parsed_body().unwrap()["name"], "Drama");
        Ok(())
    }

    #[tokio::test]
    async fn status_mismatch_is_raised_after_round_trip() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/genres/7")
            .with_status(404)
            .with_body(r#"{"message":"not found"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        let err = Requester::new(&session, &base_url)
            .get("/genres/7")
            .send()
            .await
            .unwrap_err();

        m.assert_async().await;
        assert_eq!(err.unexpected_status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Unexpected status code: 404. Expected: 200");
        Ok(())
    }

    #[tokio::test]
    async fn negative_scenarios_pass_with_explicit_expectation() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(401)
            .with_body(r#"{"error":"Unauthorized","message":"Неверный логин"}"#)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        let res = Requester::new(&session, &base_url)
            .post("/login")
            .json(&serde_json::json!({}))
            .expect_status([400u16, 401])
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.parsed_body().unwrap()["error"], "Unauthorized");
        Ok(())
    }

    #[tokio::test]
    async fn call_headers_do_not_leak_into_session() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/movies")
            .match_header("authorization", "Bearer one-off")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let session = Session::new().with_bearer("session")?;
        let base_url = server.url();
        let requester = Requester::new(&session, &base_url);
        requester
            .get("/movies")
            .header("authorization", "Bearer one-off")
            .send()
            .await?;
        first.assert_async().await;

        let second = server
            .mock("GET", "/movies")
            .match_header("authorization", "Bearer session")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        requester.get("/movies").send().await?;
        second.assert_async().await;

        assert_eq!(session.headers().get("authorization").unwrap(), "Bearer session");
        Ok(())
    }

    #[tokio::test]
    async fn query_parameters_are_encoded() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/find-all")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("page_size".into(), "5".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        Requester::new(&session, &base_url)
            .get("/find-all")
            .query(&[("page", "2"), ("page_size", "5")])
            .without_logging()
            .send()
            .await?;

        m.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn identical_gets_yield_identical_bodies() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/genres/3")
            .with_status(200)
            .with_body(r#"{"id":3,"name":"Comedy"}"#)
            .expect(2)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        let requester = Requester::new(&session, &base_url);
        let first = requester.get("/genres/3").send().await?;
        let second = requester.get("/genres/3").send().await?;

        assert_eq!(first.parsed_body(), second.parsed_body());
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_is_not_a_status_mismatch() {
        let session = Session::new();
        // Port 9 (discard) is closed on test machines.
        let err = Requester::new(&session, "http://127.0.0.1:9")
            .get("/genres")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[tokio::test]
    async fn empty_expectation_is_rejected_before_dispatch() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("DELETE", "/movies/1")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        let err = Requester::new(&session, &base_url)
            .delete("/movies/1")
            .expect_status(Vec::<u16>::new())
            .send()
            .await
            .unwrap_err();

        m.assert_async().await;
        assert!(matches!(err, Error::EmptyExpectedStatus));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_header_surfaces_on_send() {
        let session = Session::new();
        let err = Requester::new(&session, "http://127.0.0.1:9")
            .get("/genres")
            .header("x-bad", "line\nbreak")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn validated_separates_schema_errors() -> eyre::Result<()> {
        #[derive(Debug, Deserialize)]
        struct Named {
            name: String,
        }
        impl Validate for Named {
            fn validate(&self) -> std::result::Result<(), crate::schema::ValidationError> {
                crate::schema::Checker::new("Named")
                    .length("name", &self.name, 1, Some(10))
                    .finish()
            }
        }

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/named")
            .with_status(200)
            .with_body(r#"{"name":""}"#)
            .create_async()
            .await;

        let session = Session::new();
        let base_url = server.url();
        let res = Requester::new(&session, &base_url).get("/named").send().await?;
        let err = res.validated::<Named>().unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        Ok(())
    }
}
