use serde::{Deserialize, Serialize};

use super::MovieInfo;

/// Response from POST /wili/check
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WiliResult {
    pub movie_title: String,
    /// Likelihood to enjoy, 0-100
    pub likelihood: f64,
    #[serde(default)]
    pub movie_info: MovieInfo,
}

/// Request body for POST /recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationQuery {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl RecommendationQuery {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            min_rating: None,
            min_release_date: None,
            genre: None,
        }
    }
}

/// One ranked entry from POST /recommendations
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recommendation {
    pub movie_title: String,
    /// Similarity as a percentage
    pub similarity_score: f64,
    #[serde(default)]
    pub movie_info: MovieInfo,
    #[serde(default)]
    pub explanation: String,
}

/// Response from POST /survey/submit
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SurveyReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub embedding_computed: Option<bool>,
}
