//! Dashboard forms: the Wili check and prompt-based recommendations
use std::sync::Arc;

use crate::{
    api::RecommendationService,
    error::{ClientError, ClientResult},
    models::{RecommendationQuery, Session},
    ui::{Interaction, NoticeBoard},
    view::{RecommendationsView, WiliView},
};

const WILI_FAILED: &str = "Failed to check movie";
const RECOMMENDATIONS_FAILED: &str = "Failed to get recommendations";

/// Raw inputs of the recommendations form; empty fields mean "no filter"
#[derive(Debug, Clone, Default)]
pub struct RecommendationForm {
    pub prompt: String,
    pub min_rating: String,
    pub min_year: String,
    pub genre: String,
}

impl RecommendationForm {
    pub fn into_query(self) -> ClientResult<RecommendationQuery> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(ClientError::Validation("Prompt is required".to_string()));
        }

        let min_rating = match self.min_rating.trim() {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|_| {
                ClientError::Validation(format!("Minimum rating must be a number, got '{}'", raw))
            })?),
        };

        Ok(RecommendationQuery {
            prompt: prompt.to_string(),
            min_rating,
            min_release_date: non_empty(&self.min_year),
            genre: non_empty(&self.genre),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct Dashboard {
    session: Session,
    service: Arc<dyn RecommendationService>,
    ui: Interaction,
}

impl Dashboard {
    pub fn new(
        session: Session,
        service: Arc<dyn RecommendationService>,
        ui: Interaction,
    ) -> Self {
        Self {
            session,
            service,
            ui,
        }
    }

    /// Name shown in the header
    pub fn display_name(&self) -> &str {
        match self.session.username.trim() {
            "" => "User",
            name => name,
        }
    }

    /// Will-I-like-it check for a single title
    pub async fn wili_check(&mut self, movie_title: &str) -> ClientResult<WiliView> {
        let title = movie_title.trim();
        if title.is_empty() {
            let err = ClientError::Validation("Movie title is required".to_string());
            self.ui.report(&err, WILI_FAILED);
            return Err(err);
        }

        match self.service.wili_check(&self.session, title).await {
            Ok(result) => {
                tracing::info!(
                    movie_title = %result.movie_title,
                    likelihood = result.likelihood,
                    "Wili check completed"
                );
                Ok(WiliView::from(&result))
            }
            Err(e) => {
                self.ui.report(&e, WILI_FAILED);
                Err(e)
            }
        }
    }

    pub async fn recommendations(
        &mut self,
        form: RecommendationForm,
    ) -> ClientResult<RecommendationsView> {
        let query = match form.into_query() {
            Ok(query) => query,
            Err(e) => {
                self.ui.report(&e, RECOMMENDATIONS_FAILED);
                return Err(e);
            }
        };

        match self.service.recommendations(&self.session, &query).await {
            Ok(recommendations) => Ok(RecommendationsView::new(&recommendations)),
            Err(e) => {
                self.ui.report(&e, RECOMMENDATIONS_FAILED);
                Err(e)
            }
        }
    }

    pub fn notices(&self) -> &NoticeBoard {
        self.ui.notices()
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        self.ui.notices_mut()
    }
}
