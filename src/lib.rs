//! Client for the Wili movie-recommendation service
//!
//! Covers the taste survey, the "will I like it" check and prompt-based
//! recommendations, on top of token-authenticated HTTP/JSON calls.
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod session;
pub mod survey;
pub mod ui;
pub mod view;

pub use api::{ApiClient, AuthGateway, RecommendationService};
pub use config::Config;
pub use error::{ClientError, ClientResult};
