use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use wili_client::{
    dashboard::{Dashboard, RecommendationForm},
    session::{AuthSession, FileSessionStore, LOGIN_FAILED, SIGNUP_FAILED},
    survey::{SubmitOutcome, SurveySelector},
    ui::{Confirmer, FixedAnswer, Interaction, NavigationLog, Navigator, Notice, NoticeKind, Page},
    view::{InfoView, LikelihoodBand, RecommendationsView, SurveyView, WiliView},
    ApiClient, Config,
};

/// wili - movie survey, "will I like it" checks and recommendations
#[derive(Parser)]
#[command(name = "wili")]
#[command(about = "Client for the Wili movie recommendation service", long_about = None)]
struct Cli {
    /// API base URL (overrides API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Check whether the stored token is still valid
    Verify,

    /// Check that the backend is reachable
    Health,

    /// Take the 10-movie taste survey
    Survey {
        /// Submit without asking for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Will I like it? Check a single movie
    Wili {
        /// Movie title to check
        #[arg(long)]
        title: String,
    },

    /// Get recommendations for a free-text prompt
    Recommend {
        #[arg(long)]
        prompt: String,

        /// Minimum rating (0-10)
        #[arg(long)]
        min_rating: Option<String>,

        /// Earliest release year
        #[arg(long)]
        min_year: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },
}

/// Prints redirects instead of following them
#[derive(Default)]
struct TerminalNavigator {
    log: NavigationLog,
}

impl TerminalNavigator {
    fn sent_to_login(&self) -> bool {
        self.log.visited().contains(&Page::Login)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, page: Page) {
        let hint = match page {
            Page::Login => " (run `wili login`)",
            Page::Survey => " (run `wili survey`)",
            Page::Dashboard => " (try `wili wili` or `wili recommend`)",
            Page::Index => "",
        };
        println!("{} {}{}", "→".cyan(), page.to_string().bold(), hint.dimmed());
        self.log.navigate(page);
    }
}

/// Asks on stdin
struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let api = Arc::new(ApiClient::new(config.api_url.clone()));
    let navigator = Arc::new(TerminalNavigator::default());
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let auth = AuthSession::new(api.clone(), store, navigator.clone());

    match cli.command {
        Commands::Signup { username, password } => {
            handle_signup(&auth, &navigator, &username, &password).await
        }
        Commands::Login { username, password } => {
            handle_login(&auth, &navigator, &username, &password).await
        }
        Commands::Logout => {
            auth.logout().context("Failed to clear session")?;
            println!("{} Logged out", "✓".green());
            Ok(())
        }
        Commands::Verify => handle_verify(&auth).await,
        Commands::Health => handle_health(&api).await,
        Commands::Survey { yes } => {
            let Some(session) = auth.protect_page().await else {
                return Ok(());
            };
            let confirmer: Arc<dyn Confirmer> = if yes {
                Arc::new(FixedAnswer(true))
            } else {
                Arc::new(TerminalConfirmer)
            };
            let ui = Interaction::from_config(&config, navigator.clone(), confirmer);
            let selector = SurveySelector::new(session, api.clone(), ui);
            handle_survey(selector, &navigator).await
        }
        Commands::Wili { title } => {
            let Some(session) = auth.protect_page().await else {
                return Ok(());
            };
            let ui = Interaction::from_config(&config, navigator.clone(), Arc::new(TerminalConfirmer));
            let mut dashboard = Dashboard::new(session, api.clone(), ui);
            if let Ok(view) = dashboard.wili_check(&title).await {
                print_wili(&view);
            }
            print_notices(dashboard.notices_mut().drain());
            Ok(())
        }
        Commands::Recommend {
            prompt,
            min_rating,
            min_year,
            genre,
        } => {
            let Some(session) = auth.protect_page().await else {
                return Ok(());
            };
            let ui = Interaction::from_config(&config, navigator.clone(), Arc::new(TerminalConfirmer));
            let mut dashboard = Dashboard::new(session, api.clone(), ui);
            println!("Hi {}!", dashboard.display_name().bold());

            let form = RecommendationForm {
                prompt,
                min_rating: min_rating.unwrap_or_default(),
                min_year: min_year.unwrap_or_default(),
                genre: genre.unwrap_or_default(),
            };
            if let Ok(view) = dashboard.recommendations(form).await {
                print_recommendations(&view);
            }
            print_notices(dashboard.notices_mut().drain());
            Ok(())
        }
    }
}

/// Handle the 'signup' command
async fn handle_signup(
    auth: &AuthSession,
    navigator: &TerminalNavigator,
    username: &str,
    password: &str,
) -> Result<()> {
    match auth.signup(username, password).await {
        Ok(session) => {
            println!("{} Welcome, {}!", "✓".green(), session.username.bold());
            // New accounts have no taste profile yet
            navigator.navigate(Page::Survey);
        }
        Err(e) => print_error(&e.user_message(SIGNUP_FAILED)),
    }
    Ok(())
}

/// Handle the 'login' command
async fn handle_login(
    auth: &AuthSession,
    navigator: &TerminalNavigator,
    username: &str,
    password: &str,
) -> Result<()> {
    match auth.login(username, password).await {
        Ok(session) => {
            println!("{} Logged in as {}", "✓".green(), session.username.bold());
            navigator.navigate(AuthSession::landing_page(&session));
        }
        Err(e) => print_error(&e.user_message(LOGIN_FAILED)),
    }
    Ok(())
}

/// Handle the 'verify' command
async fn handle_verify(auth: &AuthSession) -> Result<()> {
    let session = auth.current().context("Failed to read session")?;
    let valid = session.is_some() && auth.verify().await;
    match session {
        Some(session) if valid => {
            println!(
                "{} Authenticated as {} (user {})",
                "✓".green(),
                session.username.bold(),
                session.user_id
            );
        }
        Some(_) => println!("{} Stored token was rejected", "✗".red()),
        None => println!("{} Not logged in", "✗".red()),
    }
    Ok(())
}

/// Handle the 'health' command
async fn handle_health(api: &ApiClient) -> Result<()> {
    let status = api
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", api.api_url()))?;
    println!("{} {} is {}", "✓".green(), api.api_url(), status.status.bold());
    Ok(())
}

/// Handle the 'survey' command
async fn handle_survey(mut selector: SurveySelector, navigator: &TerminalNavigator) -> Result<()> {
    println!("{}", "Pick the 10 movies that best match your taste.".bold());
    load_batch(&mut selector).await;

    let stdin = io::stdin();
    loop {
        print_notices(selector.notices_mut().drain());
        if navigator.sent_to_login() {
            return Ok(());
        }
        print_survey(&SurveyView::from_selector(&selector));

        print!("Toggle by number (e.g. `1 3`), [n]ext batch, [s]ubmit, [q]uit: ");
        io::stdout().flush().context("Failed to write prompt")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            return Ok(());
        }

        match line.trim() {
            "q" => return Ok(()),
            "n" => load_batch(&mut selector).await,
            "s" => {
                if let Ok(SubmitOutcome::Submitted(redirect)) = selector.submit_survey().await {
                    print_notices(selector.notices_mut().drain());
                    redirect.wait().await;
                    return Ok(());
                }
            }
            choices => {
                let cards = SurveyView::from_selector(&selector).cards;
                for choice in choices.split_whitespace() {
                    let movie = choice
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| cards.get(i))
                        .and_then(|card| {
                            selector
                                .current_movies()
                                .iter()
                                .find(|m| m.movie_id == card.id)
                                .cloned()
                        });
                    match movie {
                        Some(movie) => {
                            selector.toggle_selection(&movie)?;
                        }
                        None => print_error(&format!("No movie numbered '{}'", choice)),
                    }
                }
            }
        }
    }
}

/// Fetches the next batch; failures were already posted as notices
async fn load_batch(selector: &mut SurveySelector) {
    if let Err(e) = selector.load_next_movies().await {
        tracing::debug!(error = %e, "Survey batch not loaded");
    }
}

fn print_survey(view: &SurveyView) {
    println!();
    for (index, card) in view.cards.iter().enumerate() {
        let marker = if card.selected {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!(
            "{} {}. {} {}",
            marker,
            index + 1,
            card.title.bold(),
            format!("({}, {}, rated {})", card.year, card.genre, card.rating).dimmed()
        );
    }
    let progress = &view.progress;
    let status = format!(
        "Selected {}/{} ({})",
        progress.count, progress.capacity, progress.percent_label
    );
    if progress.submit_enabled {
        println!("{} - ready to submit", status.green());
    } else {
        println!("{}", status.cyan());
    }
}

fn print_info(info: &InfoView) {
    println!("  {}Genre: {}", "• ".cyan(), info.genre);
    println!("  {}Rating: {}", "• ".cyan(), info.rating);
    println!("  {}Year: {}", "• ".cyan(), info.year);
    println!("  {}Runtime: {}", "• ".cyan(), info.runtime);
}

fn print_wili(view: &WiliView) {
    let score = match view.band {
        LikelihoodBand::Love => view.score.green(),
        LikelihoodBand::Maybe => view.score.yellow(),
        LikelihoodBand::Unlikely => view.score.red(),
    };
    println!("{}", view.movie_title.bold().blue());
    println!("{}  {}", score.bold(), view.verdict);
    print_info(&view.info);
}

fn print_recommendations(view: &RecommendationsView) {
    if let Some(message) = view.empty_message {
        println!("{}", message);
        return;
    }
    println!("{}", "Top Recommendations:".bold());
    for card in &view.cards {
        println!();
        println!("{}. {}  {}", card.rank, card.movie_title.bold().blue(), card.score.green());
        print_info(&card.info);
        if !card.explanation.is_empty() {
            println!("  {} {}", "Why this movie?".bold(), card.explanation);
        }
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Error => print_error(&notice.message),
            NoticeKind::Success => println!("{} {}", "✓".green(), notice.message),
        }
    }
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}
