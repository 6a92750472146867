//! CLI command definitions for launchpad.
//!
//! Every command runs against either PostgreSQL (`--database-url`) or a
//! throwaway in-memory store (`--memory`) seeded with the built-in catalog.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::ContentGenerator;
use crate::catalog::{self, Catalog};
use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::llm::{LiteLlmClient, ResponseCache};
use crate::metrics;
use crate::projects::{
    AdminDashboard, Identity, ProgressTracker, ProjectLauncher, ReviewChecklist, Role, User,
};
use crate::review::ReviewEngine;
use crate::storage::{MemoryStore, PgStore, Store};

/// Student project tracking: launch packs, milestones, mentor review and
/// verified portfolios.
#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Track student projects from launch pack to verified portfolio")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    pub database_url: Option<String>,

    /// Use an in-memory store seeded with the built-in catalog. Takes
    /// precedence over --database-url.
    #[arg(long, global = true)]
    pub memory: bool,

    /// API key for the text-generation service.
    #[arg(long, env = "LITELLM_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Apply the database schema.
    Migrate(MigrateArgs),

    /// Upsert launch packs from a catalog file.
    Seed(SeedArgs),

    /// List launch packs.
    Packs,

    /// Manage users.
    #[command(subcommand)]
    User(UserCommand),

    /// Start a project from a launch pack.
    Start(StartArgs),

    /// List the caller's projects.
    Projects(AsArgs),

    /// Mark a project milestone complete (or incomplete with --undo).
    Toggle(ToggleArgs),

    /// Ask for mentor review of a project.
    RequestReview(ProjectArgs),

    /// List reviews assigned to the calling mentor.
    Reviews(AsArgs),

    /// Submit a mentor review.
    SubmitReview(SubmitReviewArgs),

    /// Publish a missing portfolio for a verified project (admin).
    Republish(ProjectArgs),

    /// Show the public portfolio for a project slug.
    Portfolio {
        /// Project public slug.
        slug: String,
    },

    /// AI-assisted content.
    #[command(subcommand)]
    Ai(AiCommand),

    /// Platform-wide counts (admin).
    Stats(AsArgs),

    /// Print this process's metrics in Prometheus text format.
    Metrics,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List applied and pending schema steps without applying anything.
    #[arg(long)]
    pub status: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Catalog YAML file. Defaults to the built-in catalog.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AsArgs {
    /// Acting user id.
    #[arg(long = "as")]
    pub as_user: Uuid,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    #[arg(long = "as")]
    pub as_user: Uuid,

    /// Launch pack slug.
    #[arg(long)]
    pub pack: String,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    #[arg(long = "as")]
    pub as_user: Uuid,

    /// Project milestone id.
    #[arg(long)]
    pub milestone: Uuid,

    /// Mark the milestone incomplete instead.
    #[arg(long)]
    pub undo: bool,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[arg(long = "as")]
    pub as_user: Uuid,

    #[arg(long)]
    pub project: Uuid,
}

#[derive(Args, Debug)]
pub struct SubmitReviewArgs {
    #[arg(long = "as")]
    pub as_user: Uuid,

    #[arg(long)]
    pub review: Uuid,

    #[arg(long)]
    pub meets_brief: bool,

    #[arg(long)]
    pub core_functional: bool,

    #[arg(long)]
    pub docs_ok: bool,

    #[arg(long)]
    pub demo_ok: bool,

    /// Rating from 1 to 5.
    #[arg(long)]
    pub rating: u8,

    #[arg(long, default_value = "")]
    pub comments: String,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create or update a user.
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// student, mentor or admin.
        #[arg(long, default_value = "student")]
        role: String,
    },

    /// Set a user's reliability score.
    Score {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        score: f64,
    },
}

#[derive(Subcommand, Debug)]
#[command(disable_help_subcommand = true)]
pub enum AiCommand {
    /// Suggest project ideas.
    Ideas {
        /// Comma-separated skills.
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long)]
        goal: String,
        #[arg(long, default_value = "4")]
        weeks: u32,
    },

    /// Break a project into milestones.
    Milestones {
        #[arg(long)]
        title: String,
    },

    /// Implementation help for one milestone.
    Help {
        #[arg(long)]
        project: String,
        #[arg(long)]
        milestone: String,
    },

    /// Portfolio blurb for a project.
    Blurb {
        #[arg(long)]
        title: String,
    },
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if let Err(e) = metrics::init_metrics() {
        warn!(error = %e, "Failed to initialize metrics");
    }

    let mut config = PlatformConfig::from_env()?;
    if let Some(url) = cli.database_url.clone() {
        config = config.with_database_url(url);
    }
    if let Some(key) = cli.api_key.clone() {
        config = config.with_api_key(key);
    }

    match cli.command {
        Commands::Migrate(args) => run_migrate_command(args, &config).await,
        Commands::Metrics => {
            print!("{}", metrics::export_metrics());
            Ok(())
        }
        command => {
            let store = open_store(&config, cli.memory).await?;
            run_store_command(command, store, &config).await
        }
    }
}

async fn run_migrate_command(args: MigrateArgs, config: &PlatformConfig) -> anyhow::Result<()> {
    let store = PgStore::connect(config.require_database_url()?).await?;
    if args.status {
        for step in store.migration_status().await? {
            match step.applied_at {
                Some(at) => println!("{:<40} applied {}", step.step, at.to_rfc3339()),
                None => println!("{:<40} pending", step.step),
            }
        }
        return Ok(());
    }

    let applied = store.run_migrations().await?;
    info!(applied = applied, "Migrations complete");
    println!("Applied {} schema step(s)", applied);
    Ok(())
}

async fn open_store(config: &PlatformConfig, memory: bool) -> anyhow::Result<Arc<dyn Store>> {
    if memory {
        let store = Arc::new(MemoryStore::new());
        catalog::seed(store.as_ref(), &Catalog::builtin()?).await?;
        info!("Using in-memory store");
        let store: Arc<dyn Store> = store;
        return Ok(store);
    }
    let store: Arc<dyn Store> = Arc::new(PgStore::connect(config.require_database_url()?).await?);
    Ok(store)
}

async fn acting_user(store: &dyn Store, id: Uuid) -> anyhow::Result<Identity> {
    let user = store
        .get_user(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found", id))?;
    Ok(Identity::from(&user))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_store_command(
    command: Commands,
    store: Arc<dyn Store>,
    config: &PlatformConfig,
) -> anyhow::Result<()> {
    let engine = || ReviewEngine::new(store.clone(), config.app_url.clone());

    match command {
        Commands::Seed(args) => {
            let catalog = match args.catalog {
                Some(path) => catalog::load(path)?,
                None => Catalog::builtin()?,
            };
            let report = catalog::seed(store.as_ref(), &catalog).await?;
            println!(
                "Seeded {} launch pack(s) with {} milestone(s)",
                report.packs, report.milestones
            );
        }
        Commands::Packs => {
            for pack in store.list_launch_packs().await? {
                let milestones = store.list_milestones(pack.id).await?;
                println!(
                    "{:<32} {:<14} {}w  {} milestone(s)  {}",
                    pack.slug,
                    pack.difficulty,
                    pack.duration_weeks,
                    milestones.len(),
                    pack.title
                );
            }
        }
        Commands::User(UserCommand::Add { email, name, role }) => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let user = User::new(email, name, role);
            store.upsert_user(&user).await?;
            print_json(&user)?;
        }
        Commands::User(UserCommand::Score { id, score }) => {
            if !(0.0..=1.0).contains(&score) {
                anyhow::bail!("score must be between 0 and 1, got {}", score);
            }
            store
                .set_reliability_score(id, score)
                .await
                .map_err(PlatformError::from)?;
            println!("Reliability score for {} set to {}", id, score);
        }
        Commands::Start(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let pack = store
                .get_launch_pack_by_slug(&args.pack)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Launch pack '{}' not found", args.pack))?;
            let project = ProjectLauncher::new(store.clone())
                .start(Some(&caller), pack.id)
                .await?;
            print_json(&project)?;
            for pm in store.list_project_milestones(project.id).await? {
                println!("milestone {}", pm.id);
            }
        }
        Commands::Projects(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let projects = ProjectLauncher::new(store.clone())
                .my_projects(Some(&caller))
                .await?;
            print_json(&projects)?;
        }
        Commands::Toggle(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let update = ProgressTracker::new(store.clone())
                .toggle(Some(&caller), args.milestone, !args.undo)
                .await?;
            print_json(&update)?;
        }
        Commands::RequestReview(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let review = engine().request_review(Some(&caller), args.project).await?;
            print_json(&review)?;
        }
        Commands::Reviews(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let reviews = engine().reviews_for_mentor(Some(&caller)).await?;
            print_json(&reviews)?;
        }
        Commands::SubmitReview(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let checklist = ReviewChecklist::new(
                args.meets_brief,
                args.core_functional,
                args.docs_ok,
                args.demo_ok,
            );
            let outcome = engine()
                .submit_review(Some(&caller), args.review, checklist, args.rating, &args.comments)
                .await?;
            print_json(&outcome)?;
        }
        Commands::Republish(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let portfolio = engine().republish(Some(&caller), args.project).await?;
            print_json(&portfolio)?;
        }
        Commands::Portfolio { slug } => {
            let view = engine().publisher().public_view(&slug).await?;
            print_json(&view)?;
        }
        Commands::Stats(args) => {
            let caller = acting_user(store.as_ref(), args.as_user).await?;
            let stats = AdminDashboard::new(store.clone())
                .stats(Some(&caller))
                .await?;
            print_json(&stats)?;
        }
        Commands::Ai(command) => run_ai_command(command, store.clone(), config).await?,
        Commands::Migrate(_) | Commands::Metrics => {
            anyhow::bail!("command does not run against a store")
        }
    }
    Ok(())
}

async fn run_ai_command(
    command: AiCommand,
    store: Arc<dyn Store>,
    config: &PlatformConfig,
) -> anyhow::Result<()> {
    if config.api_key.is_none() {
        warn!("No API key configured; generation will fall back to defaults if the endpoint requires one");
    }
    let client = LiteLlmClient::new(
        config.api_base.clone(),
        config.api_key.clone(),
        config.default_model.clone(),
    )?;
    let cache = ResponseCache::with_default_ttl(store, config.cache_ttl_ms);
    let generator = ContentGenerator::new(Arc::new(client), cache, config.default_model.clone())
        .with_timeout(config.generation_timeout);

    match command {
        AiCommand::Ideas {
            skills,
            goal,
            weeks,
        } => print_json(&generator.generate_ideas(&skills, &goal, weeks).await),
        AiCommand::Milestones { title } => print_json(&generator.break_milestones(&title).await),
        AiCommand::Help { project, milestone } => {
            print_json(&generator.milestone_help(&milestone, &project).await)
        }
        AiCommand::Blurb { title } => print_json(&generator.portfolio_blurb(&title).await),
    }
}
