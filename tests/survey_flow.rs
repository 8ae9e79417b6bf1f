mod common;

use std::collections::HashSet;
use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};
use wili_client::{
    models::{MovieId, Session, UserId},
    session::{AuthSession, MemorySessionStore},
    survey::{SubmitOutcome, SurveyPhase, SurveySelector, Toggle, CAPACITY},
    ui::{FixedAnswer, Interaction, NavigationLog, NoticeKind, Page},
    view::SurveyView,
    ApiClient, ClientError, Config,
};

use common::{spawn_backend, BATCH_SIZE, VALID_TOKEN};

fn config() -> Config {
    Config {
        redirect_delay_ms: 0,
        ..Config::default()
    }
}

fn session(token: &str) -> Session {
    Session {
        token: token.to_string(),
        user_id: UserId("11".to_string()),
        username: "gloria".to_string(),
        has_embedding: Some(false),
    }
}

fn selector(
    api_url: &str,
    session: Session,
    confirm: bool,
    navigator: Arc<NavigationLog>,
) -> SurveySelector {
    let ui = Interaction::from_config(&config(), navigator, Arc::new(FixedAnswer(confirm)));
    SurveySelector::new(session, Arc::new(ApiClient::new(api_url)), ui)
}

#[tokio::test]
async fn test_login_then_complete_survey() {
    let (api_url, backend) = spawn_backend().await;
    let api = Arc::new(ApiClient::new(&api_url));
    let navigator = Arc::new(NavigationLog::new());
    let auth = AuthSession::new(
        api.clone(),
        Arc::new(MemorySessionStore::new()),
        navigator.clone(),
    );

    let session = assert_ok!(auth.login("gloria", "secret1").await);
    assert_eq!(AuthSession::landing_page(&session), Page::Survey);
    let session = auth.protect_page().await.expect("fresh token verifies");

    let ui = Interaction::from_config(&config(), navigator.clone(), Arc::new(FixedAnswer(true)));
    let mut survey = SurveySelector::new(session, api, ui);

    // First batch: A, B, C; pick A and B
    let first = assert_ok!(survey.load_next_movies().await).to_vec();
    let first_ids: Vec<MovieId> = first.iter().map(|m| m.movie_id.clone()).collect();
    assert_eq!(
        first_ids,
        vec![MovieId::Number(1), MovieId::Number(2), MovieId::Number(3)]
    );
    survey.toggle_selection(&first[0]).unwrap();
    survey.toggle_selection(&first[1]).unwrap();

    // Second batch excludes everything shown so far
    let second = assert_ok!(survey.load_next_movies().await).to_vec();
    assert_eq!(second[0].movie_id, MovieId::Number(4));
    assert_eq!(backend.exclude_history()[1], vec!["1", "2", "3"]);

    for movie in &second {
        survey.toggle_selection(movie).unwrap();
    }
    while survey.progress().count < CAPACITY {
        let batch = assert_ok!(survey.load_next_movies().await).to_vec();
        for movie in &batch {
            if survey.progress().count < CAPACITY {
                assert_eq!(assert_ok!(survey.toggle_selection(movie)), Toggle::Added);
            }
        }
    }
    assert!(survey.can_submit());
    assert_eq!(SurveyView::from_selector(&survey).progress.percent_label, "100%");

    let expected_ids: Vec<serde_json::Value> = survey
        .selected_ids()
        .iter()
        .map(|id| serde_json::to_value(id).unwrap())
        .collect();

    match assert_ok!(survey.submit_survey().await) {
        SubmitOutcome::Submitted(redirect) => redirect.wait().await,
        SubmitOutcome::Cancelled => panic!("confirmation was given"),
    }

    assert_eq!(backend.submissions(), vec![expected_ids]);
    assert_eq!(survey.phase(), SurveyPhase::Submitted);
    assert!(survey.selection().is_empty());
    assert_eq!(navigator.last(), Some(Page::Dashboard));
    assert_eq!(
        survey.notices().latest().unwrap().message,
        "Survey completed successfully! Redirecting to dashboard..."
    );
}

#[tokio::test]
async fn test_no_movie_is_offered_twice() {
    let (api_url, backend) = spawn_backend().await;
    let mut survey = selector(
        &api_url,
        session(VALID_TOKEN),
        true,
        Arc::new(NavigationLog::new()),
    );

    let mut seen = HashSet::new();
    for _ in 0..6 {
        let batch = assert_ok!(survey.load_next_movies().await).to_vec();
        assert_eq!(batch.len(), BATCH_SIZE);
        for movie in batch {
            assert!(seen.insert(movie.movie_id.clone()), "{} offered twice", movie.movie_id);
        }
    }

    // Exclusion lists only ever grow, each a prefix of the next
    let history = backend.exclude_history();
    for pair in history.windows(2) {
        assert!(pair[1].len() > pair[0].len());
        assert_eq!(pair[1][..pair[0].len()], pair[0][..]);
    }
    assert_eq!(survey.excluded_ids().len(), 6 * BATCH_SIZE);
}

#[tokio::test]
async fn test_expired_token_redirects_to_login() {
    let (api_url, _backend) = spawn_backend().await;
    let navigator = Arc::new(NavigationLog::new());
    let mut survey = selector(&api_url, session("expired"), true, navigator.clone());

    let err = assert_err!(survey.load_next_movies().await);
    assert!(matches!(err, ClientError::AuthFailure));
    assert!(survey.notices().is_empty());
    assert!(survey.current_movies().is_empty());
    assert_eq!(navigator.visited(), vec![Page::Login]);
}

#[tokio::test]
async fn test_submit_without_confirmation_sends_nothing() {
    let (api_url, backend) = spawn_backend().await;
    let mut survey = selector(
        &api_url,
        session(VALID_TOKEN),
        false,
        Arc::new(NavigationLog::new()),
    );

    while survey.progress().count < CAPACITY {
        let batch = assert_ok!(survey.load_next_movies().await).to_vec();
        for movie in batch.iter().take(CAPACITY - survey.progress().count) {
            survey.toggle_selection(movie).unwrap();
        }
    }

    let outcome = assert_ok!(survey.submit_survey().await);
    assert!(matches!(outcome, SubmitOutcome::Cancelled));
    assert!(backend.submissions().is_empty());
    assert_eq!(survey.phase(), SurveyPhase::Full);
}

#[tokio::test]
async fn test_failed_submit_keeps_selection_and_uses_fallback() {
    let (api_url, backend) = spawn_backend().await;
    backend.fail_next_submissions();
    let navigator = Arc::new(NavigationLog::new());
    let mut survey = selector(&api_url, session(VALID_TOKEN), true, navigator.clone());

    while survey.progress().count < CAPACITY {
        let batch = assert_ok!(survey.load_next_movies().await).to_vec();
        for movie in batch.iter().take(CAPACITY - survey.progress().count) {
            survey.toggle_selection(movie).unwrap();
        }
    }
    let before = survey.selected_ids();

    let err = assert_err!(survey.submit_survey().await);
    assert!(matches!(err, ClientError::Service { .. }));
    assert_eq!(survey.selected_ids(), before);
    assert!(survey.can_submit());

    let notice = survey.notices().latest().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Failed to submit survey");
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_submit_accepted_with_empty_reply() {
    let (api_url, backend) = spawn_backend().await;
    backend.answer_submissions_with_no_content();
    let navigator = Arc::new(NavigationLog::new());
    let mut survey = selector(&api_url, session(VALID_TOKEN), true, navigator.clone());

    while survey.progress().count < CAPACITY {
        let batch = assert_ok!(survey.load_next_movies().await).to_vec();
        for movie in batch.iter().take(CAPACITY - survey.progress().count) {
            survey.toggle_selection(movie).unwrap();
        }
    }

    match assert_ok!(survey.submit_survey().await) {
        SubmitOutcome::Submitted(redirect) => redirect.wait().await,
        SubmitOutcome::Cancelled => panic!("confirmation was given"),
    }

    assert_eq!(backend.submissions().len(), 1);
    assert_eq!(survey.phase(), SurveyPhase::Submitted);
    let notice = survey.notices().latest().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(navigator.last(), Some(Page::Dashboard));
}

#[tokio::test]
async fn test_cards_normalize_release_dates() {
    let (api_url, _backend) = spawn_backend().await;
    let mut survey = selector(
        &api_url,
        session(VALID_TOKEN),
        true,
        Arc::new(NavigationLog::new()),
    );

    // Movies 1-3 arrive as ISO date, bare year string and "N/A"
    survey.load_next_movies().await.unwrap();
    let view = SurveyView::from_selector(&survey);
    let years: Vec<&str> = view.cards.iter().map(|c| c.year.as_str()).collect();
    assert_eq!(years, vec!["1941", "1942", "N/A"]);
    assert_eq!(view.cards[0].genre, "N/A");
    assert_eq!(view.cards[1].genre, "Drama");

    // Movie 4 arrives as an integer year
    survey.load_next_movies().await.unwrap();
    let view = SurveyView::from_selector(&survey);
    assert_eq!(view.cards[0].id, MovieId::Number(4));
    assert_eq!(view.cards[0].title, "Feature #4");
    assert_eq!(view.cards[0].year, "1944");
}
