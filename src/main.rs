use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use vipwatch::config::Config;
use vipwatch::source::{Platform, Post};
use vipwatch::storage::{Alert, AlertStore};

#[derive(Parser)]
#[command(
    name = "vipwatch",
    about = "VIP social-media threat monitoring daemon",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (default: VIPWATCH_CONFIG or
    /// /etc/vipwatch/vipwatch.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon (API server + monitoring controller)
    Serve {
        /// Bind address override
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a single post through the analysis pipeline and print the verdict
    Analyze {
        /// Post text
        #[arg(long)]
        content: String,

        /// Author handle
        #[arg(long, default_value = "unknown")]
        author: String,

        /// Platform: twitter, facebook, or instagram
        #[arg(long, default_value = "twitter")]
        platform: String,

        /// Post URL
        #[arg(long, default_value = "")]
        url: String,

        /// Image reference attached to the post
        #[arg(long)]
        image_ref: Option<String>,
    },

    /// Inspect or clear stored alerts
    Alerts {
        #[command(subcommand)]
        action: AlertsAction,
    },
}

#[derive(Subcommand)]
enum AlertsAction {
    /// List stored alerts, newest first
    List {
        /// Maximum number of alerts to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List alerts from the last 24 hours
    Recent,

    /// Delete all stored alerts
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    // Initialize tracing; RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.logging.level.clone())
            }),
        )
        .init();

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            tracing::info!(bind = %config.server.bind, "Starting vipwatch daemon");
            vipwatch::serve(config).await?;
        }
        Commands::Analyze {
            content,
            author,
            platform,
            url,
            image_ref,
        } => {
            let platform: Platform = platform
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let pipeline = vipwatch::build_pipeline(&config)?;
            let post = Post {
                platform,
                author,
                content,
                url,
                posted_at: Utc::now(),
                author_metadata: None,
                image_ref,
            };
            let verdict = pipeline.analyze(&post).await;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Alerts { action } => {
            let pool = vipwatch::storage::open_pool(&config.storage.db_path)?;
            let store = AlertStore::new(pool);

            match action {
                AlertsAction::List { limit } => print_alerts(&store.list(limit)?),
                AlertsAction::Recent => print_alerts(&store.list_recent(24, 50)?),
                AlertsAction::Clear => {
                    let removed = store.clear()?;
                    println!("Cleared {} alerts.", removed);
                }
            }
        }
    }

    Ok(())
}

fn print_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("No alerts stored.");
        return;
    }
    println!(
        "{:<10} | {:<9} | {:<22} | {:<5} | Reason",
        "Platform", "Level", "Author", "Score"
    );
    println!(
        "{:-<10}-|-{:-<9}-|-{:-<22}-|-{:-<5}-|-{:-<40}",
        "", "", "", "", ""
    );
    for alert in alerts {
        println!(
            "{:<10} | {:<9} | {:<22} | {:<5.2} | {}",
            alert.platform.to_string(),
            alert.threat_level.as_str(),
            alert.author,
            alert.score,
            alert.reason
        );
    }
}
