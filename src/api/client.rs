//! HTTP/JSON client for the recommendation backend
//!
//! Every request carries `Content-Type: application/json` and an
//! `x-request-id`. Authenticated requests also carry the session's bearer
//! token; a 401 on those is reported as [`ClientError::AuthFailure`] so the
//! caller can redirect to the login page. Unauthenticated endpoints (signup,
//! login) surface a 401 as an ordinary service error with the server message.
use reqwest::{header, Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{instrument, Instrument};

use crate::{
    api::{
        request_id::{make_span_with_request_id, RequestId, REQUEST_ID_HEADER},
        AuthGateway, RecommendationService,
    },
    error::{ClientError, ClientResult},
    models::{
        AuthGrant, Credentials, ErrorBody, HealthStatus, Movie, MovieId, Recommendation,
        RecommendationQuery, Session, SurveyReceipt, WiliResult,
    },
};

#[derive(Debug, Deserialize)]
struct MoviesResponse {
    movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    recommendations: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    api_url: String,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_http_client(HttpClient::new(), api_url)
    }

    pub fn with_http_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Backend liveness probe (GET /health)
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.call(Method::GET, "/health", None, |req| req).await
    }

    /// Builds, sends and decodes one request
    ///
    /// `session` decides both whether the bearer token is attached and how a
    /// 401 is classified.
    async fn call<T, F>(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        build: F,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let body = self.call_raw(method, path, session, build).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn call_raw<F>(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        build: F,
    ) -> ClientResult<String>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request_id = RequestId::new();
        let span = make_span_with_request_id(&method, path, &request_id);

        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .http_client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if let Some(session) = session {
            request = request.header(header::AUTHORIZATION, session.bearer());
        }
        let request = build(request);

        async move {
            let response = request.send().await.map_err(|e| {
                tracing::warn!(error = %e, "Request failed before a response arrived");
                ClientError::from(e)
            })?;

            let status = response.status();
            let body = response.text().await?;

            if status.is_success() {
                tracing::debug!(status = status.as_u16(), "API call succeeded");
                return Ok(body);
            }

            if status == StatusCode::UNAUTHORIZED && session.is_some() {
                tracing::info!("Session rejected by server");
                return Err(ClientError::AuthFailure);
            }

            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            tracing::warn!(
                status = status.as_u16(),
                error = message.as_deref().unwrap_or(""),
                "API returned an error status"
            );
            Err(ClientError::Service { status, message })
        }
        .instrument(span)
        .await
    }
}

#[async_trait::async_trait]
impl AuthGateway for ApiClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn signup(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.call(Method::POST, "/auth/signup", None, |req| req.json(credentials))
            .await
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.call(Method::POST, "/auth/login", None, |req| req.json(credentials))
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn verify(&self, session: &Session) -> ClientResult<()> {
        self.call_raw(Method::GET, "/auth/verify", Some(session), |req| req)
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl RecommendationService for ApiClient {
    #[instrument(skip(self, session, exclude), fields(excluded = exclude.len()))]
    async fn survey_movies(
        &self,
        session: &Session,
        exclude: &[MovieId],
    ) -> ClientResult<Vec<Movie>> {
        let exclude_param = join_ids(exclude);
        let response: MoviesResponse = self
            .call(Method::GET, "/survey/movies", Some(session), |req| {
                req.query(&[("exclude", exclude_param.as_str())])
            })
            .await?;

        tracing::info!(movie_count = response.movies.len(), "Survey batch fetched");
        Ok(response.movies)
    }

    #[instrument(skip(self, session, movie_ids), fields(selected = movie_ids.len()))]
    async fn submit_survey(
        &self,
        session: &Session,
        movie_ids: &[MovieId],
    ) -> ClientResult<SurveyReceipt> {
        let body = serde_json::json!({ "movie_ids": movie_ids });
        let reply = self
            .call_raw(Method::POST, "/survey/submit", Some(session), |req| req.json(&body))
            .await?;

        // Any 2xx means the survey was stored; the receipt body is optional
        Ok(parse_receipt(&reply))
    }

    #[instrument(skip(self, session))]
    async fn wili_check(&self, session: &Session, movie_title: &str) -> ClientResult<WiliResult> {
        let body = serde_json::json!({ "movie_title": movie_title });
        self.call(Method::POST, "/wili/check", Some(session), |req| req.json(&body))
            .await
    }

    #[instrument(skip(self, session, query), fields(prompt = %query.prompt))]
    async fn recommendations(
        &self,
        session: &Session,
        query: &RecommendationQuery,
    ) -> ClientResult<Vec<Recommendation>> {
        let response: RecommendationsResponse = self
            .call(Method::POST, "/recommendations", Some(session), |req| req.json(query))
            .await?;

        tracing::info!(
            results = response.recommendations.len(),
            "Recommendations fetched"
        );
        Ok(response.recommendations)
    }
}

fn parse_receipt(body: &str) -> SurveyReceipt {
    match serde_json::from_str::<Option<SurveyReceipt>>(body) {
        Ok(receipt) => receipt.unwrap_or_default(),
        Err(e) => {
            if !body.trim().is_empty() {
                tracing::debug!(error = %e, "Survey receipt not understood, ignoring it");
            }
            SurveyReceipt::default()
        }
    }
}

/// Comma-separated id list for the `exclude` query parameter
pub fn join_ids(ids: &[MovieId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
