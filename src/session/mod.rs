//! Login session lifecycle
//!
//! [`AuthSession`] wraps the [`AuthGateway`] collaborator: it persists what
//! signup/login return, guards pages by verifying the stored token, and
//! clears everything on logout.
use std::sync::Arc;

use crate::{
    api::AuthGateway,
    error::{ClientError, ClientResult},
    models::{Credentials, Session},
    ui::{Navigator, Page},
};

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

pub const SIGNUP_FAILED: &str = "Signup failed";
pub const LOGIN_FAILED: &str = "Login failed";

pub struct AuthSession {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthSession {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            store,
            navigator,
        }
    }

    /// Creates an account and stores the returned token
    pub async fn signup(&self, username: &str, password: &str) -> ClientResult<Session> {
        let credentials = validated_credentials(username, password)?;
        let grant = self.gateway.signup(&credentials).await?;
        let session = Session::from(grant);
        self.store.save(&session)?;
        tracing::info!(user_id = %session.user_id, "Signed up");
        Ok(session)
    }

    /// Logs in and stores the token together with the embedding flag
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let credentials = validated_credentials(username, password)?;
        let grant = self.gateway.login(&credentials).await?;
        let session = Session::from(grant);
        self.store.save(&session)?;
        tracing::info!(
            user_id = %session.user_id,
            has_embedding = ?session.has_embedding,
            "Logged in"
        );
        Ok(session)
    }

    /// Where to go after authenticating: users without a taste profile take
    /// the survey first
    pub fn landing_page(session: &Session) -> Page {
        match session.has_embedding {
            Some(false) => Page::Survey,
            _ => Page::Dashboard,
        }
    }

    /// Clears all session state and returns to the index page
    pub fn logout(&self) -> ClientResult<()> {
        self.store.clear()?;
        tracing::info!("Logged out");
        self.navigator.navigate(Page::Index);
        Ok(())
    }

    pub fn current(&self) -> ClientResult<Option<Session>> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(), Ok(Some(_)))
    }

    /// True iff a token is stored and the server still accepts it
    pub async fn verify(&self) -> bool {
        match self.store.load() {
            Ok(Some(session)) => self.verify_session(&session).await,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session");
                false
            }
        }
    }

    async fn verify_session(&self, session: &Session) -> bool {
        match self.gateway.verify(session).await {
            Ok(()) => true,
            Err(ClientError::AuthFailure) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed");
                false
            }
        }
    }

    /// Page guard: returns the session, or redirects to login
    pub async fn protect_page(&self) -> Option<Session> {
        if let Ok(Some(session)) = self.store.load() {
            if self.verify_session(&session).await {
                return Some(session);
            }
        }
        self.navigator.navigate(Page::Login);
        None
    }
}

fn validated_credentials(username: &str, password: &str) -> ClientResult<Credentials> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Username and password are required".to_string(),
        ));
    }
    Ok(Credentials::new(username.trim(), password))
}
