//! Interaction seams between page logic and whatever presents it
//!
//! Page logic never prints or redirects directly. It posts notices, asks a
//! [`Confirmer`] and tells a [`Navigator`] where to go.
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::ClientError;

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Login,
    Survey,
    Dashboard,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Page::Index => "index",
            Page::Login => "login",
            Page::Survey => "survey",
            Page::Dashboard => "dashboard",
        };
        write!(f, "{}", name)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page);
}

/// Blocking yes/no confirmation step
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Navigator that only records where it was sent
#[derive(Debug, Default)]
pub struct NavigationLog {
    visited: Mutex<Vec<Page>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Page> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Page> {
        self.visited().last().copied()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, page: Page) {
        tracing::info!(page = %page, "Navigating");
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(page);
        }
    }
}

/// Confirmer that always gives the same answer (non-interactive runs)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt = %prompt, answer = self.0, "Confirmation answered automatically");
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// Transient alert shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_visible_at(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        now >= self.posted_at && now - self.posted_at < window
    }
}

/// Notices posted by page logic, auto-dismissed after a fixed window
#[derive(Debug)]
pub struct NoticeBoard {
    window: chrono::Duration,
    notices: Vec<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NoticeBoard {
    pub fn new(window: Duration) -> Self {
        Self {
            window: chrono::Duration::from_std(window).unwrap_or(chrono::Duration::seconds(5)),
            notices: Vec::new(),
        }
    }

    /// Posts a notice and dismisses every notice whose window has passed
    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            NoticeKind::Error => tracing::warn!(message = %message, "Error notice"),
            NoticeKind::Success => tracing::info!(message = %message, "Success notice"),
        }
        let now = Utc::now();
        self.dismiss_expired(now);
        self.notices.push(Notice {
            kind,
            message,
            posted_at: now,
        });
    }

    /// Drops notices no longer visible at `now`
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.notices.retain(|n| n.is_visible_at(now, window));
    }

    /// Notices still on screen at `now`
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|n| n.is_visible_at(now, self.window))
            .collect()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Hands every pending notice to the caller for display
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Handle to a delayed, fire-and-forget navigation
#[derive(Debug)]
pub struct ScheduledNavigation {
    pub page: Page,
    handle: JoinHandle<()>,
}

impl ScheduledNavigation {
    /// Waits until the navigation has happened
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, page = %self.page, "Scheduled navigation task failed");
        }
    }
}

/// Per-page interaction context: notices, confirmation and navigation
pub struct Interaction {
    notices: NoticeBoard,
    navigator: Arc<dyn Navigator>,
    confirmer: Arc<dyn Confirmer>,
    redirect_delay: Duration,
}

impl Interaction {
    pub fn new(navigator: Arc<dyn Navigator>, confirmer: Arc<dyn Confirmer>) -> Self {
        Self::from_config(&Config::default(), navigator, confirmer)
    }

    pub fn from_config(
        config: &Config,
        navigator: Arc<dyn Navigator>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            notices: NoticeBoard::new(config.notice_duration()),
            navigator,
            confirmer,
            redirect_delay: config.redirect_delay(),
        }
    }

    /// Error boundary for interaction handlers
    ///
    /// Auth failures redirect to the login page without a notice; everything
    /// else becomes an error notice.
    pub fn report(&mut self, error: &ClientError, fallback: &str) {
        if error.is_auth_failure() {
            tracing::info!("Not authenticated, redirecting to login");
            self.navigator.navigate(Page::Login);
            return;
        }
        tracing::debug!(error = %error, "Reporting error to user");
        self.notices.post(NoticeKind::Error, error.user_message(fallback));
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notices.post(NoticeKind::Success, message);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notices.post(NoticeKind::Error, message);
    }

    pub fn confirm(&self, prompt: &str) -> bool {
        self.confirmer.confirm(prompt)
    }

    /// Navigates to `page` after the configured redirect delay
    pub fn schedule_redirect(&self, page: Page) -> ScheduledNavigation {
        self.schedule_navigation(page, self.redirect_delay)
    }

    pub fn schedule_navigation(&self, page: Page, delay: Duration) -> ScheduledNavigation {
        let navigator = Arc::clone(&self.navigator);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(page);
        });
        ScheduledNavigation { page, handle }
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }
}
