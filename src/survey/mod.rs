//! Movie survey used to bootstrap a user's taste profile
//!
//! The user picks exactly [`CAPACITY`] movies from successive batches of
//! candidates. Every movie shown is excluded from later batches, whether it
//! was picked or not, so nothing is offered twice in one survey.
use std::sync::Arc;

use crate::{
    api::RecommendationService,
    error::{ClientError, ClientResult},
    models::{Movie, MovieId, Session},
    ui::{Interaction, NoticeBoard, Page, ScheduledNavigation},
};

pub mod selection;

pub use selection::{ExclusionSet, Progress, SelectionSet, Toggle, CAPACITY};

const LOAD_FAILED: &str = "Failed to load movies";
const SUBMIT_FAILED: &str = "Failed to submit survey";

/// Where the survey stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    Empty,
    Partial,
    Full,
    /// Submitted successfully; terminal
    Submitted,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The user declined the confirmation; nothing was sent
    Cancelled,
    /// Accepted by the server; the dashboard redirect is pending
    Submitted(ScheduledNavigation),
}

pub struct SurveySelector {
    session: Session,
    service: Arc<dyn RecommendationService>,
    ui: Interaction,
    selection: SelectionSet,
    excluded: ExclusionSet,
    current: Vec<Movie>,
    submitted: bool,
}

impl SurveySelector {
    pub fn new(
        session: Session,
        service: Arc<dyn RecommendationService>,
        ui: Interaction,
    ) -> Self {
        Self {
            session,
            service,
            ui,
            selection: SelectionSet::new(),
            excluded: ExclusionSet::new(),
            current: Vec::new(),
            submitted: false,
        }
    }

    /// Ids sent as the `exclude` filter: everything shown, plus selections
    fn exclusion_filter(&self) -> Vec<MovieId> {
        let mut ids = self.excluded.ids().to_vec();
        ids.extend(
            self.selection
                .ids()
                .into_iter()
                .filter(|id| !self.excluded.contains(id)),
        );
        ids
    }

    /// Replaces the displayed batch with fresh, never-shown candidates
    ///
    /// On failure the displayed batch is left as it was and the error is
    /// reported to the user before being returned.
    pub async fn load_next_movies(&mut self) -> ClientResult<&[Movie]> {
        let exclude = self.exclusion_filter();
        tracing::debug!(excluded = exclude.len(), "Loading next survey batch");

        let movies = match self.service.survey_movies(&self.session, &exclude).await {
            Ok(movies) => movies,
            Err(e) => {
                self.ui.report(&e, LOAD_FAILED);
                return Err(e);
            }
        };

        let mut batch = Vec::with_capacity(movies.len());
        for movie in movies {
            if self.excluded.contains(&movie.movie_id) {
                tracing::warn!(movie_id = %movie.movie_id, "Server re-offered an excluded movie");
                continue;
            }
            // Duplicates within one batch are shown once
            if self.excluded.insert(movie.movie_id.clone()) {
                batch.push(movie);
            }
        }

        tracing::info!(
            shown = batch.len(),
            excluded_total = self.excluded.len(),
            "Survey batch displayed"
        );
        self.current = batch;
        Ok(self.current.as_slice())
    }

    /// Selects or deselects `movie`
    pub fn toggle_selection(&mut self, movie: &Movie) -> ClientResult<Toggle> {
        if self.submitted {
            return Err(ClientError::Validation(
                "Survey has already been submitted".to_string(),
            ));
        }

        let outcome = self.selection.toggle(movie);
        match outcome {
            Toggle::AtCapacity => {
                self.ui
                    .notify_error(format!("You can only select {} movies", CAPACITY));
            }
            Toggle::Added | Toggle::Removed => {
                let progress = self.progress();
                tracing::debug!(
                    movie_id = %movie.movie_id,
                    ?outcome,
                    count = progress.count,
                    percent = progress.rounded_percent(),
                    "Selection changed"
                );
            }
        }
        Ok(outcome)
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && self.selection.len() == CAPACITY
    }

    /// Sends the selection after explicit confirmation
    ///
    /// Makes a network call only when exactly [`CAPACITY`] movies are selected
    /// and the user confirms. A failed submission keeps the selection.
    pub async fn submit_survey(&mut self) -> ClientResult<SubmitOutcome> {
        if !self.can_submit() {
            let err = ClientError::Validation(format!("Please select exactly {} movies", CAPACITY));
            self.ui.report(&err, SUBMIT_FAILED);
            return Err(err);
        }

        let prompt = format!(
            "You've selected {} movies. Submit survey and compute your preferences?",
            CAPACITY
        );
        if !self.ui.confirm(&prompt) {
            tracing::debug!("Survey submission declined");
            return Ok(SubmitOutcome::Cancelled);
        }

        let movie_ids = self.selection.ids();
        if let Err(e) = self.service.submit_survey(&self.session, &movie_ids).await {
            self.ui.report(&e, SUBMIT_FAILED);
            return Err(e);
        }

        tracing::info!(selected = movie_ids.len(), "Survey submitted");
        self.ui
            .notify_success("Survey completed successfully! Redirecting to dashboard...");
        self.selection.clear();
        self.submitted = true;
        Ok(SubmitOutcome::Submitted(self.ui.schedule_redirect(Page::Dashboard)))
    }

    pub fn phase(&self) -> SurveyPhase {
        if self.submitted {
            return SurveyPhase::Submitted;
        }
        match self.selection.len() {
            0 => SurveyPhase::Empty,
            n if n == CAPACITY => SurveyPhase::Full,
            _ => SurveyPhase::Partial,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            count: self.selection.len(),
            capacity: CAPACITY,
        }
    }

    pub fn current_movies(&self) -> &[Movie] {
        &self.current
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<MovieId> {
        self.selection.ids()
    }

    pub fn excluded_ids(&self) -> &[MovieId] {
        self.excluded.ids()
    }

    pub fn is_selected(&self, id: &MovieId) -> bool {
        self.selection.contains(id)
    }

    pub fn notices(&self) -> &NoticeBoard {
        self.ui.notices()
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        self.ui.notices_mut()
    }
}
