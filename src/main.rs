//! PESO CLI - command-line client for the PESO Mendez job portal

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use peso::auth::{AuthTokenProvider, FileTokenStore};
use peso::binding::{BindingState, FetchList, FetchOne, PageRequest, TracingNotifier};
use peso::error::{FixSuggestion, PesoError, Result};
use peso::services::{LoginCredentials, PesoClient, ReportKind, Role};
use peso::{PesoConfig, Session};

#[derive(Parser)]
#[command(name = "peso")]
#[command(about = "PESO - client for the PESO Mendez job portal")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and PESO_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Email address or username
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show who is logged in
    Whoami,

    /// Job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },

    /// Job applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },

    /// Announcements, optionally for one role
    Announcements {
        /// job_seeker, employer or admin
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Admin dashboard report (highest-education, genders, placements,
    /// employer-types, clientele, citmun)
    Reports { kind: ReportKind },
}

#[derive(Subcommand)]
enum JobsCommand {
    /// All job postings
    List {
        /// Page number, from 0 (page size comes from `backend.page_size`)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// One job posting
    Show { id: i64 },
    /// Postings recommended for the logged-in user
    Recommended,
}

#[derive(Subcommand)]
enum ApplicationsCommand {
    /// Applications of the logged-in user
    Mine,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = PesoConfig::load()?.with_env();
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    let store: Arc<dyn AuthTokenProvider> = Arc::new(FileTokenStore::new(config.token_file()));
    let client = PesoClient::from_config(&config, store)?;
    let session = Session::new(client.clone());
    let page_size = config.backend.page_size;

    match cli.command {
        Commands::Login { email, password } => {
            let response = session
                .login(&LoginCredentials::new(email, password))
                .await?;
            println!("{} Logged in", "✓".green());
            if let Some(user) = response.user {
                print_json(&user)?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Logout => {
            session.logout()?;
            println!("{} Logged out", "✓".green());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Whoami => {
            match session.claims() {
                Some(claims) => print_json(&claims)?,
                None => println!("{}", "Not logged in".yellow()),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Jobs { command } => match command {
            JobsCommand::List { page } => {
                let jobs = list_binding(client, |client, request: PageRequest| async move {
                    client.jobs().get_page(request.page, request.size).await
                });
                jobs.bind_page((), (), PageRequest::new(page, page_size));
                report(jobs.settled().await)
            }
            JobsCommand::Show { id } => {
                let job: FetchOne<(i64,), (), Value> = FetchOne::new(
                    move |(id,): (i64,)| {
                        let client = client.clone();
                        async move { client.jobs().get_by_id(id).await }
                    },
                    Arc::new(TracingNotifier),
                );
                job.bind((id,), ());
                report(job.settled().await)
            }
            JobsCommand::Recommended => {
                let jobs = user_list_binding(client, |client, user_id| async move {
                    client.jobs().get_recommended(user_id).await
                });
                bound_to_user(&jobs, &session).await
            }
        },

        Commands::Applications {
            command: ApplicationsCommand::Mine,
        } => {
            let applications = user_list_binding(client, |client, user_id| async move {
                client.applications().get_by_user(user_id).await
            });
            bound_to_user(&applications, &session).await
        }

        Commands::Announcements { role } => {
            let announcements = list_binding(client, move |client, _request| async move {
                match role {
                    Some(role) => client.announcements().get_by_role(role).await,
                    None => client.announcements().get_all().await,
                }
            });
            announcements.bind((), role);
            report(announcements.settled().await)
        }

        Commands::Reports { kind } => {
            let report_binding: FetchOne<(ReportKind,), (), Value> = FetchOne::new(
                move |(kind,): (ReportKind,)| {
                    let client = client.clone();
                    async move { client.reports().get(kind).await }
                },
                Arc::new(TracingNotifier),
            );
            report_binding.bind((kind,), ());
            report(report_binding.settled().await)
        }
    }
}

/// Collection binding over a call that needs no arguments besides the page
fn list_binding<D, F, Fut>(client: PesoClient, call: F) -> FetchList<(), D, Value>
where
    D: PartialEq + Send + Sync + 'static,
    F: Fn(PesoClient, PageRequest) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
{
    FetchList::new(
        move |(): (), page: PageRequest| call(client.clone(), page),
        Arc::new(TracingNotifier),
    )
}

/// Collection binding keyed by the logged-in user's id; these endpoints
/// are not paged
fn user_list_binding<F, Fut>(client: PesoClient, call: F) -> FetchList<(Option<i64>,), (), Value>
where
    F: Fn(PesoClient, i64) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
{
    FetchList::new(
        move |(user_id,): (i64,), _page: PageRequest| call(client.clone(), user_id),
        Arc::new(TracingNotifier),
    )
}

async fn bound_to_user(
    binding: &FetchList<(Option<i64>,), (), Value>,
    session: &Session,
) -> Result<ExitCode> {
    let user_id = session.user_id();
    if user_id.is_none() {
        println!("{}", "Not logged in".yellow());
        return Ok(ExitCode::FAILURE);
    }
    binding.bind((user_id,), ());
    report(binding.settled().await)
}

/// Print settled data, or signal failure (the notifier already logged it)
fn report<D: Serialize>(state: BindingState<D>) -> Result<ExitCode> {
    if let Some(message) = state.error {
        eprintln!("{} {}", "Error:".red().bold(), message);
        return Ok(ExitCode::FAILURE);
    }
    print_json(&state.data)?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(PesoError::from)?;
    println!("{}", rendered);
    Ok(())
}
