//! Diary CLI
//!
//! Command-line front end for a Linera-hosted diary:
//! - Create, unlock and lock the diary
//! - List, read, search entries
//! - Write, edit and delete entries
//!
//! The unlock flag is kept in the data directory between invocations, the
//! way a browser tab keeps it in session storage.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use diary::config::generate_default_config;
use diary::store::{FileStore, Theme};
use diary::{
    Config, DiaryResult, EntryId, GraphQlClient, LoggingConfig, Renderer, SearchAction,
    SessionController, StatusLevel, TerminalRenderer, View,
};

type Controller = SessionController<GraphQlClient, TerminalRenderer, FileStore>;

#[derive(Parser)]
#[command(name = "diary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal diary on a Linera chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/diary/config.toml or ./diary.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Linera node service URL
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Chain id hosting the diary
    #[arg(long, global = true)]
    pub chain_id: Option<String>,

    /// Diary application id
    #[arg(long, global = true)]
    pub application_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show connection and lock state
    Status,

    /// Create the diary (also unlocks it)
    Init {
        #[arg(long, env = "DIARY_SECRET_PHRASE", hide_env_values = true)]
        phrase: Option<String>,
    },

    /// Unlock the diary for this session
    Unlock {
        #[arg(long, env = "DIARY_SECRET_PHRASE", hide_env_values = true)]
        phrase: Option<String>,
    },

    /// Lock the diary and forget cached entries
    Lock,

    /// List entries, newest first
    List {
        /// Only the newest N entries
        #[arg(short, long)]
        latest: Option<u32>,
        /// Entries from this date (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Entries up to this date (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Read one entry in full
    Show { id: EntryId },

    /// Write a new entry
    Add {
        title: String,
        content: String,
        #[arg(long, env = "DIARY_SECRET_PHRASE", hide_env_values = true)]
        phrase: Option<String>,
    },

    /// Edit an entry; omitted fields keep their current value
    Edit {
        id: EntryId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, env = "DIARY_SECRET_PHRASE", hide_env_values = true)]
        phrase: Option<String>,
    },

    /// Delete an entry
    Delete {
        id: EntryId,
        #[arg(long, env = "DIARY_SECRET_PHRASE", hide_env_values = true)]
        phrase: Option<String>,
    },

    /// Search entries by title (or content)
    Search {
        query: String,
        #[arg(long)]
        content: bool,
    },

    /// Show or toggle the display theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let template = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, template)?;
                println!("Wrote default config to {:?}", path);
            }
            None => print!("{}", template),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.service_url.clone() {
        config.service.url = url;
    }
    if let Some(chain_id) = cli.chain_id.clone() {
        config.service.chain_id = chain_id;
    }
    if let Some(application_id) = cli.application_id.clone() {
        config.service.application_id = application_id;
    }

    init_tracing(&config.logging);

    if let Commands::Theme { toggle } = cli.command {
        let mut prefs = FileStore::open(config.storage.preferences_path())?;
        let mut theme = Theme::load(&prefs)?;
        if toggle {
            theme = theme.toggle();
            theme.save(&mut prefs)?;
        }
        println!("Theme: {} (toggle shows {})", theme, theme.icon());
        return Ok(ExitCode::SUCCESS);
    }

    let client = GraphQlClient::from_config(&config.service)?;
    tracing::info!("GraphQL endpoint: {}", client.endpoint());
    let session_store = FileStore::open(config.storage.session_path())?;
    let mut diary = SessionController::new(client, TerminalRenderer::new(), session_store);

    let ok = run(&mut diary, cli.command).await;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Execute one command; returns whether it succeeded
async fn run(diary: &mut Controller, command: Commands) -> bool {
    match command {
        Commands::Status => {
            let view = diary.boot().await;
            println!();
            println!("Diary v{}", env!("CARGO_PKG_VERSION"));
            println!("View: {}", view);
            if view != View::Create {
                if let Ok(owner) = diary.owner().await {
                    println!("Owner: {}", owner);
                }
                if let Ok(count) = diary.entry_count().await {
                    println!("Entries: {}", count);
                }
            }
            true
        }

        Commands::Init { phrase } => {
            quiet_boot(diary).await;
            succeeded(diary.initialize(&phrase.unwrap_or_default()).await)
        }

        Commands::Unlock { phrase } => {
            quiet_boot(diary).await;
            succeeded(diary.unlock(&phrase.unwrap_or_default()).await)
        }

        Commands::Lock => {
            quiet_boot(diary).await;
            diary.lock();
            true
        }

        Commands::List { latest, from, to } => {
            if latest.is_none() && from.is_none() {
                diary.boot().await;
                return true;
            }
            if !require_diary_view(diary).await {
                return false;
            }
            match (latest, from, to) {
                (Some(limit), _, _) => succeeded(diary.load_latest(limit).await),
                (None, Some(from), Some(to)) => {
                    match (parse_time(&from, false), parse_time(&to, true)) {
                        (Some(start), Some(end)) => succeeded(diary.load_range(start, end).await),
                        _ => {
                            diary
                                .renderer_mut()
                                .show_status("Dates must be YYYY-MM-DD or RFC 3339", StatusLevel::Error);
                            false
                        }
                    }
                }
                _ => false,
            }
        }

        Commands::Show { id } => {
            if !require_diary_view(diary).await {
                return false;
            }
            match diary.find_entry(id).cloned() {
                Some(entry) => {
                    diary.renderer_mut().show_entry(&entry);
                    true
                }
                None => {
                    not_found(diary, id);
                    false
                }
            }
        }

        Commands::Add {
            title,
            content,
            phrase,
        } => {
            quiet_boot(diary).await;
            succeeded(
                diary
                    .add_entry(&title, &content, &phrase.unwrap_or_default())
                    .await,
            )
        }

        Commands::Edit {
            id,
            title,
            content,
            phrase,
        } => {
            quiet_boot(diary).await;
            let current = diary.find_entry(id).cloned();
            let (title, content) = match (title, content, current) {
                (Some(t), Some(c), _) => (t, c),
                (t, c, Some(entry)) => (t.unwrap_or(entry.title), c.unwrap_or(entry.content)),
                _ => {
                    not_found(diary, id);
                    return false;
                }
            };
            succeeded(
                diary
                    .update_entry(id, &title, &content, &phrase.unwrap_or_default())
                    .await,
            )
        }

        Commands::Delete { id, phrase } => {
            quiet_boot(diary).await;
            succeeded(diary.delete_entry(id, &phrase.unwrap_or_default()).await)
        }

        Commands::Search { query, content } => {
            if !require_diary_view(diary).await {
                return false;
            }
            let result = if content {
                diary.search_content(&query).await
            } else {
                diary.search(&query).await
            };
            match result {
                Ok(SearchAction::Skip) => {
                    diary
                        .renderer_mut()
                        .show_status("Type at least 2 characters to search", StatusLevel::Info);
                    true
                }
                Ok(_) => true,
                Err(_) => false,
            }
        }

        Commands::Theme { .. } | Commands::Config { .. } => true,
    }
}

/// Boot without drawing the view; the command draws what it changes
async fn quiet_boot(diary: &mut Controller) -> View {
    diary.renderer_mut().set_quiet(true);
    let view = diary.boot().await;
    diary.renderer_mut().set_quiet(false);
    view
}

/// Commands that read entries need an unlocked diary
async fn require_diary_view(diary: &mut Controller) -> bool {
    if quiet_boot(diary).await == View::Diary {
        return true;
    }
    diary.redraw();
    false
}

fn not_found(diary: &mut Controller, id: EntryId) {
    diary
        .renderer_mut()
        .show_status(&format!("Entry #{} not found", id), StatusLevel::Error);
}

fn succeeded<T>(result: DiaryResult<T>) -> bool {
    result.is_ok()
}

/// Parse a CLI date into epoch microseconds; bare dates cover the whole day
fn parse_time(input: &str, end_of_day: bool) -> Option<u64> {
    let micros = if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        dt.timestamp_micros()
    } else {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        let time = if end_of_day {
            date.and_hms_micro_opt(23, 59, 59, 999_999)?
        } else {
            date.and_hms_opt(0, 0, 0)?
        };
        Local.from_local_datetime(&time).earliest()?.timestamp_micros()
    };
    u64::try_from(micros).ok()
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("diary={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
