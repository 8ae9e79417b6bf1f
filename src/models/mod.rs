use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod movie;
pub mod recommendation;

pub use auth::{AuthGrant, Credentials, Session, UserId};
pub use movie::{Movie, MovieId, MovieInfo, ReleaseDate};
pub use recommendation::{
    Recommendation, RecommendationQuery, SurveyReceipt, WiliResult,
};

/// Body the API attaches to every non-2xx response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from GET /health
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

// ============================================================================
// Lenient wire helpers
//
// The backend fills missing payload fields with "N/A" and mixes numbers and
// strings for the same field, so optional display fields are normalized here.
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserializes a number that may arrive as a JSON number, a numeric string,
/// `"N/A"` or null
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Deserializes optional text, treating empty strings and `"N/A"` as absent
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !is_placeholder(s)))
}

pub(crate) fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A")
}
