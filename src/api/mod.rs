//! Remote collaborators of the client
//!
//! The backend exposes two logical services: an auth gateway that issues and
//! validates bearer tokens, and a recommendation service that serves survey
//! candidates, Wili checks and recommendations. Both are traits so the
//! survey and dashboard logic can run against mocks; [`ApiClient`] implements
//! them over HTTP/JSON.
use crate::{
    error::ClientResult,
    models::{
        AuthGrant, Credentials, Movie, MovieId, Recommendation, RecommendationQuery, Session,
        SurveyReceipt, WiliResult,
    },
};

pub mod client;
pub mod request_id;

pub use client::ApiClient;

/// Token issuance and validation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Registers a new account. Unauthenticated.
    async fn signup(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    /// Exchanges credentials for a token. Unauthenticated.
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    /// Succeeds iff the session token is still accepted by the server
    async fn verify(&self, session: &Session) -> ClientResult<()>;
}

/// Survey, Wili and recommendation endpoints. Every call is authenticated.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationService: Send + Sync {
    /// Fetches a batch of survey candidates, skipping every id in `exclude`
    async fn survey_movies(&self, session: &Session, exclude: &[MovieId])
        -> ClientResult<Vec<Movie>>;

    /// Submits the completed survey selection, in selection order
    async fn submit_survey(
        &self,
        session: &Session,
        movie_ids: &[MovieId],
    ) -> ClientResult<SurveyReceipt>;

    /// Likelihood that the user enjoys a single movie
    async fn wili_check(&self, session: &Session, movie_title: &str) -> ClientResult<WiliResult>;

    /// Ranked recommendations for a free-text prompt and optional filters
    async fn recommendations(
        &self,
        session: &Session,
        query: &RecommendationQuery,
    ) -> ClientResult<Vec<Recommendation>>;
}
