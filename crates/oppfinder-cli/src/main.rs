mod opportunities;
mod scan;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use oppfinder_core::{AppConfig, OpportunityRepository, SortKey};
use oppfinder_db::PgOpportunityRepository;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "oppfinder-cli")]
#[command(about = "Find, score, and report SaaS opportunities from pain-point signals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Collect signals, score themes, and persist opportunities
    Scan {
        /// Print collected signals and themes without scoring or saving
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored opportunities
    List {
        /// Only show opportunities scoring at least this much
        #[arg(long)]
        min_score: Option<u8>,
        /// Sort key: score, revenue, or mentions
        #[arg(long, default_value = "score", value_parser = parse_sort_key)]
        sort: SortKey,
        /// Case-insensitive match on title or problem
        #[arg(long)]
        search: Option<String>,
        /// Maximum number of rows to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one opportunity in full
    Show { id: i64 },
    /// Print summary statistics
    Stats,
    /// Print a markdown report of the top opportunities
    Report {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Write opportunities to a JSON file
    Export {
        path: PathBuf,
        #[arg(long)]
        min_score: Option<u8>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    raw.parse()
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = oppfinder_db::PoolConfig::from_app_config(config);
    let pool = oppfinder_db::connect_pool(config.require_database_url()?, pool_config).await?;
    Ok(pool)
}

async fn repository(config: &AppConfig) -> anyhow::Result<Arc<dyn OpportunityRepository>> {
    Ok(Arc::new(PgOpportunityRepository::new(connect(config).await?)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("oppfinder-cli: no command given; run with --help for usage");
        return Ok(());
    };

    let config = oppfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    oppfinder_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = oppfinder_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Commands::Scan { dry_run: true } => scan::run_scan_dry_run(&config).await?,
        Commands::Scan { dry_run: false } => {
            let repo = repository(&config).await?;
            scan::run_scan(&config, repo).await?;
        }
        Commands::List {
            min_score,
            sort,
            search,
            limit,
        } => {
            let query = oppfinder_core::OpportunityQuery {
                min_score,
                search,
                sort,
                limit,
            };
            let repo = repository(&config).await?;
            opportunities::run_list(repo.as_ref(), &query).await?;
        }
        Commands::Show { id } => {
            let repo = repository(&config).await?;
            opportunities::run_show(repo.as_ref(), id).await?;
        }
        Commands::Stats => {
            let repo = repository(&config).await?;
            opportunities::run_stats(repo.as_ref()).await?;
        }
        Commands::Report { limit } => {
            let repo = repository(&config).await?;
            opportunities::run_report(repo.as_ref(), limit).await?;
        }
        Commands::Export { path, min_score } => {
            let repo = repository(&config).await?;
            opportunities::run_export(repo.as_ref(), &path, min_score).await?;
        }
    }

    Ok(())
}
