use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::{is_placeholder, lenient_number, lenient_text};

/// Identifier of a movie as the API hands it out
///
/// Kept in its wire form (number or string) so it can be echoed back in
/// exclusion lists and survey submissions unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Number(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Release date, normalized once at ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDate {
    /// Bare year, from an integer or a 4-digit string
    Year(i32),
    /// Full ISO date (`YYYY-MM-DD`)
    Date(NaiveDate),
    /// Anything else the server sent
    Other(String),
}

impl ReleaseDate {
    /// Parses the textual forms the API uses. Placeholders yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if is_placeholder(value) {
            return None;
        }

        if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = value.parse() {
                return Some(ReleaseDate::Year(year));
            }
        }

        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(ReleaseDate::Date(date)),
            Err(_) => Some(ReleaseDate::Other(value.to_string())),
        }
    }

    /// Year as shown on movie cards
    pub fn year_label(&self) -> String {
        match self {
            ReleaseDate::Year(year) => year.to_string(),
            ReleaseDate::Date(date) => format!("{:04}", date.year()),
            ReleaseDate::Other(text) => text.split('-').next().unwrap_or(text).to_string(),
        }
    }
}

/// Year label for an optional release date, `N/A` when absent
pub fn year_label(date: Option<&ReleaseDate>) -> String {
    date.map(ReleaseDate::year_label)
        .unwrap_or_else(|| "N/A".to_string())
}

fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<ReleaseDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::Int(year)) => i32::try_from(year)
            .ok()
            .map(ReleaseDate::Year)
            .or_else(|| Some(ReleaseDate::Other(year.to_string()))),
        Some(Raw::Float(year)) if year.is_finite() && year.fract() == 0.0 => {
            Some(ReleaseDate::Year(year as i32))
        }
        Some(Raw::Float(other)) => Some(ReleaseDate::Other(other.to_string())),
        Some(Raw::Text(text)) => ReleaseDate::parse(&text),
    })
}

/// A survey candidate returned by GET /survey/movies
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<ReleaseDate>,
}

/// Movie details attached to Wili checks and recommendations
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MovieInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<ReleaseDate>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub runtime_min: Option<f64>,
}
