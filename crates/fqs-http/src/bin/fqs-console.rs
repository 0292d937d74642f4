//! Terminal front end for the Portal FQS case console.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fqs_core::countdown::{CountdownBadge, SystemClock};
use fqs_core::dashboard::{CaseDashboard, CaseFilter, DashboardError, Satisfaction, StatusChange};
use fqs_core::models::{CaseKind, CaseRecord, CaseStatus, Persons};
use fqs_core::navigation::{guard, RecordingNavigator, Route};
use fqs_core::ratings::{rating_label, RatingBoard};
use fqs_core::screens::{ResourceScreen, ScreenError};
use fqs_core::session::{FileSessionStore, SessionStore};
use fqs_http::{ApiClient, ConsoleConfig};

#[derive(Parser, Debug)]
#[command(name = "fqs-console", version, about = "Portal FQS operator console")]
struct Cli {
    /// Backend base URL (overrides FQS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides FQS_SESSION_PATH)
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Discard the stored session
    Logout,
    /// Create an operator account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirm: String,
    },
    /// Print the Google sign-in URL
    OauthUrl,
    /// Complete a Google sign-in from the callback URL or query string
    Callback { query: String },
    /// List complaints, commendations and requests, newest first
    Cases {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        kind: Option<CaseKind>,
        #[arg(long)]
        status: Option<CaseStatus>,
    },
    /// Move a complaint or request to PENDIENTE or EN_PROCESO
    Status {
        kind: CaseKind,
        id: u64,
        status: CaseStatus,
    },
    /// Resolve a complaint or request with a resolution note
    Close {
        kind: CaseKind,
        id: u64,
        #[arg(long)]
        note: String,
        #[arg(long, default_value = "Satisfecho")]
        rating: Satisfaction,
    },
    /// Status and category counts
    Summary,
    /// List registered persons
    Persons {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Satisfaction ratings and their statistics
    Ratings {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Counters from the public intake channel
    IntakeStats,
    /// Show the response-window countdown for a creation timestamp
    Countdown {
        created_at: DateTime<Utc>,
        /// Print the current state and exit
        #[arg(long)]
        once: bool,
    },
}

impl Command {
    /// Screen whose data the command reads. `None` for commands that work
    /// signed out.
    fn screen(&self) -> Option<Route> {
        match self {
            Self::Login { .. }
            | Self::Logout
            | Self::Register { .. }
            | Self::OauthUrl
            | Self::Callback { .. }
            | Self::IntakeStats
            | Self::Countdown { .. } => None,
            Self::Cases { .. } | Self::Status { .. } | Self::Close { .. } | Self::Summary => {
                Some(Route::Dashboard)
            }
            Self::Persons { .. } => Some(Route::Persons),
            // Stored ratings are staff data; only the rating form is public
            Self::Ratings { .. } => Some(Route::Dashboard),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(path) = &cli.session_path {
        config = config.with_session_path(path);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = fqs_http::config::APP_VERSION, base_url = %config.api_base_url, "Starting console");

    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::with_ttl(
        &config.session_path,
        chrono::Duration::days(config.session_ttl_days),
    ));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::new(&config, session.clone(), navigator.clone())?;

    if let Some(requested) = cli.command.screen() {
        if guard(requested, session.as_ref()) != requested {
            bail!("No hay sesión activa. Inicie sesión con `fqs-console login`.");
        }
    }

    let result = run(&client, cli.command);
    if navigator.take_redirect() == Some(Route::Login) {
        eprintln!("La sesión expiró. Inicie sesión nuevamente.");
    }
    result
}

fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            client
                .auth()
                .login(&email, &password)
                .map_err(|e| anyhow!(e.user_message(fqs_http::LOGIN_FAILED_MESSAGE)))?;
            println!("Sesión iniciada.");
        }
        Command::Logout => {
            client.auth().logout()?;
            println!("Sesión cerrada.");
        }
        Command::Register {
            email,
            password,
            password_confirm,
        } => {
            client
                .auth()
                .register(&email, &password, &password_confirm)
                .map_err(|e| anyhow!(e.user_message(fqs_http::REGISTER_FAILED_MESSAGE)))?;
            println!("Usuario registrado exitosamente. Ahora puedes iniciar sesión.");
        }
        Command::OauthUrl => println!("{}", client.auth().oauth_login_url()),
        Command::Callback { query } => {
            let outcome = client.auth().complete_oauth_callback(&query)?;
            match outcome {
                fqs_http::CallbackOutcome::SignedIn => println!("Sesión iniciada."),
                fqs_http::CallbackOutcome::Failed(failure) => {
                    bail!("{} ({})", failure.message(), failure.code())
                }
            }
        }
        Command::Cases {
            query,
            kind,
            status,
        } => {
            let dashboard = load_dashboard(client)?;
            let records = dashboard.filtered(&CaseFilter {
                query,
                kind,
                status,
            });
            for record in &records {
                print_record(record);
            }
            println!("{} de {} registros", records.len(), dashboard.records().len());
        }
        Command::Status { kind, id, status } => {
            if status == CaseStatus::Resolved {
                bail!("Para resolver un caso use `fqs-console close` con una nota de resolución.");
            }
            let mut dashboard = load_dashboard(client)?;
            let record = find_record(dashboard.records(), kind, id)?;
            match dashboard.request_status_change(&record, status).map_err(dashboard_error)? {
                StatusChange::Persisted => println!("Estado actualizado a {}.", status.label()),
                StatusChange::AwaitingResolution => dashboard.cancel_close(),
            }
        }
        Command::Close {
            kind,
            id,
            note,
            rating,
        } => {
            let mut dashboard = load_dashboard(client)?;
            let record = find_record(dashboard.records(), kind, id)?;
            dashboard
                .request_status_change(&record, CaseStatus::Resolved)
                .map_err(dashboard_error)?;
            dashboard.confirm_close(&note, rating).map_err(dashboard_error)?;
            println!("{} #{} resuelta.", kind.label(), id);
        }
        Command::Summary => {
            let dashboard = load_dashboard(client)?;
            let summary = dashboard.status_summary();
            for status in CaseStatus::ALL {
                println!("{:<12} {}", status.label(), summary.count(status));
            }
            println!(
                "Quejas {} / Felicitaciones {} / Solicitudes {}",
                summary.complaints, summary.commendations, summary.requests
            );
        }
        Command::Persons { query } => {
            let mut screen: ResourceScreen<Persons, _> = ResourceScreen::new(client);
            screen.load().map_err(screen_error)?;
            let visible = screen.visible(&query, None);
            for person in &visible {
                println!(
                    "#{:<5} {:<30} {:<12} {}",
                    person.id,
                    person.name,
                    person.hc_code,
                    person.insurance.as_deref().unwrap_or("-")
                );
            }
            println!("{} de {} personas", visible.len(), screen.items().len());
        }
        Command::Ratings { query } => {
            let mut board = RatingBoard::new(client);
            board
                .load()
                .map_err(|e| anyhow!(e.user_message(fqs_core::ratings::LOAD_FAILED_MESSAGE)))?;
            let stats = board.stats();
            println!(
                "Total {} | Promedio {:.1} | Excelentes {}",
                stats.total, stats.average, stats.excellent
            );
            for form in board.filter(&query) {
                let name = form.person.as_ref().map(|p| p.name.as_str()).unwrap_or("Anónimo");
                println!("#{:<5} {:<30} {}", form.id, name, rating_label(form.score()));
            }
        }
        Command::IntakeStats => {
            let stats = client
                .webhook()
                .stats()
                .map_err(|e| anyhow!(e.user_message("Error desconocido")))?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Countdown { created_at, once } => {
            let badge = CountdownBadge::new(created_at);
            if once {
                println!("{}", badge.state_at(Utc::now()));
            } else {
                let mut stdout = std::io::stdout();
                badge.run(&SystemClock, |state| {
                    let _ = write!(stdout, "\r{:>8}", state.to_string());
                    let _ = stdout.flush();
                    true
                });
                println!();
            }
        }
    }
    Ok(())
}

fn load_dashboard(client: &ApiClient) -> Result<CaseDashboard<&ApiClient>> {
    let mut dashboard = CaseDashboard::new(client);
    dashboard.load_all().map_err(dashboard_error)?;
    Ok(dashboard)
}

fn find_record(records: &[CaseRecord], kind: CaseKind, id: u64) -> Result<CaseRecord> {
    records
        .iter()
        .find(|r| r.kind == kind && r.id == id)
        .cloned()
        .with_context(|| format!("{} #{} no encontrada", kind.label(), id))
}

fn print_record(record: &CaseRecord) {
    println!(
        "{} {:<13} #{:<5} {:<11} {:<20} {:<8} {}",
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.kind.label(),
        record.id,
        record.badge_label(),
        record.person_label(),
        record.hc_code_label(),
        record.description
    );
}

fn dashboard_error(e: DashboardError) -> anyhow::Error {
    anyhow!(e.user_message())
}

fn screen_error(e: ScreenError) -> anyhow::Error {
    anyhow!(e.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fqs_core::session::MemorySessionStore;

    fn command(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("fqs-console").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_signed_out_operator_is_blocked_from_staff_data() {
        let session = MemorySessionStore::new();
        for args in [
            &["ratings"][..],
            &["cases"][..],
            &["summary"][..],
            &["persons"][..],
            &["status", "queja", "1", "EN_PROCESO"][..],
        ] {
            let requested = command(args).screen().unwrap();
            assert_eq!(guard(requested, &session), Route::Login, "{:?}", args);
        }
    }

    #[test]
    fn test_public_commands_skip_the_guard() {
        for args in [
            &["login", "--email", "a@b.co", "--password", "x"][..],
            &["logout"][..],
            &["oauth-url"][..],
            &["intake-stats"][..],
            &["countdown", "2024-01-01T00:00:00Z", "--once"][..],
        ] {
            assert!(command(args).screen().is_none(), "{:?}", args);
        }
    }

    #[test]
    fn test_signed_in_operator_reaches_ratings() {
        let session = MemorySessionStore::with_token("jwt");
        let requested = command(&["ratings"]).screen().unwrap();
        assert_eq!(guard(requested, &session), requested);
    }
}
