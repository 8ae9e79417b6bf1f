//! Pure state → view-model mapping
//!
//! Nothing here knows how it is drawn. Every missing value is rendered as
//! `N/A`.
use crate::{
    models::{movie::year_label, Movie, MovieId, MovieInfo, Recommendation, WiliResult},
    survey::{Progress, SurveySelector},
};

const NOT_AVAILABLE: &str = "N/A";

pub const NO_RECOMMENDATIONS: &str = "No recommendations found. Try adjusting your filters.";

fn number_label(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
    pub rating: String,
    pub year: String,
    pub selected: bool,
}

impl MovieCard {
    pub fn new(movie: &Movie, selected: bool) -> Self {
        Self {
            id: movie.movie_id.clone(),
            title: movie.title.clone(),
            genre: movie.genre.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: number_label(movie.rating).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            year: year_label(movie.release_date.as_ref()),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub count: usize,
    pub capacity: usize,
    pub percent_label: String,
    pub submit_enabled: bool,
}

impl From<Progress> for ProgressView {
    fn from(progress: Progress) -> Self {
        Self {
            count: progress.count,
            capacity: progress.capacity,
            percent_label: format!("{}%", progress.rounded_percent()),
            submit_enabled: progress.count == progress.capacity,
        }
    }
}

/// Everything the survey page shows
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyView {
    pub cards: Vec<MovieCard>,
    pub progress: ProgressView,
}

impl SurveyView {
    pub fn from_selector(selector: &SurveySelector) -> Self {
        let cards = selector
            .current_movies()
            .iter()
            .map(|m| MovieCard::new(m, selector.is_selected(&m.movie_id)))
            .collect();
        Self {
            cards,
            progress: selector.progress().into(),
        }
    }
}

/// Movie details block shared by Wili results and recommendations
#[derive(Debug, Clone, PartialEq)]
pub struct InfoView {
    pub genre: String,
    pub rating: String,
    pub year: String,
    pub runtime: String,
}

impl From<&MovieInfo> for InfoView {
    fn from(info: &MovieInfo) -> Self {
        Self {
            genre: info.genre.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: number_label(info.rating)
                .map(|r| format!("{}/10", r))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            year: year_label(info.release_date.as_ref()),
            runtime: number_label(info.runtime_min)
                .map(|r| format!("{} min", r))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// How strongly a Wili check suggests the user will enjoy the movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikelihoodBand {
    Love,
    Maybe,
    Unlikely,
}

impl LikelihoodBand {
    pub fn from_likelihood(likelihood: f64) -> Self {
        if likelihood >= 70.0 {
            LikelihoodBand::Love
        } else if likelihood >= 50.0 {
            LikelihoodBand::Maybe
        } else {
            LikelihoodBand::Unlikely
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            LikelihoodBand::Love => "You'll likely love this!",
            LikelihoodBand::Maybe => "You might like this",
            LikelihoodBand::Unlikely => "Probably not your style",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WiliView {
    pub movie_title: String,
    pub likelihood: f64,
    pub score: String,
    pub band: LikelihoodBand,
    pub verdict: &'static str,
    pub info: InfoView,
}

impl From<&WiliResult> for WiliView {
    fn from(result: &WiliResult) -> Self {
        let band = LikelihoodBand::from_likelihood(result.likelihood);
        Self {
            movie_title: result.movie_title.clone(),
            likelihood: result.likelihood,
            score: format!("{}% Match", result.likelihood),
            band,
            verdict: band.verdict(),
            info: InfoView::from(&result.movie_info),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCard {
    /// 1-based position in the ranking
    pub rank: usize,
    pub movie_title: String,
    pub score: String,
    pub info: InfoView,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsView {
    pub cards: Vec<RecommendationCard>,
    /// Shown instead of cards when nothing matched
    pub empty_message: Option<&'static str>,
}

impl RecommendationsView {
    pub fn new(recommendations: &[Recommendation]) -> Self {
        let cards: Vec<RecommendationCard> = recommendations
            .iter()
            .enumerate()
            .map(|(index, rec)| RecommendationCard {
                rank: index + 1,
                movie_title: rec.movie_title.clone(),
                score: format!("{}% Match", rec.similarity_score),
                info: InfoView::from(&rec.movie_info),
                explanation: rec.explanation.clone(),
            })
            .collect();

        let empty_message = cards.is_empty().then_some(NO_RECOMMENDATIONS);
        Self {
            cards,
            empty_message,
        }
    }
}
