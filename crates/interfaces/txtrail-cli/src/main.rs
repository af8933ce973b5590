use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use txtrail_cli::commands;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a transaction until its event chain settles or fails
    Watch {
        /// Transaction identifier to track
        id: String,
        #[arg(long, help = "Node base URL, e.g. https://node.example.com/chain")]
        node: String,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Shard priority order (defaults to Shard0,Shard1,Shard2)"
        )]
        shards: Option<Vec<String>>,
        #[arg(long, default_value_t = 4)]
        interval_secs: u64,
    },
    /// Fetch and resolve a transaction's event chain once, without polling
    Resolve {
        /// Transaction identifier to resolve
        id: String,
        #[arg(long, help = "Node base URL, e.g. https://node.example.com/chain")]
        node: String,
        #[arg(long, value_delimiter = ',')]
        shards: Option<Vec<String>>,
    },
    /// Track a multi-step action whose transactions are submitted in order
    Action {
        /// Steps as label=identifier pairs in dependency order; a bare
        /// label marks a step that has not been submitted yet
        #[arg(long = "step", required = true)]
        steps: Vec<String>,
        #[arg(long, help = "Node base URL, e.g. https://node.example.com/chain")]
        node: String,
        #[arg(long, value_delimiter = ',')]
        shards: Option<Vec<String>>,
        #[arg(long, default_value_t = 4)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    match cli.command {
        Commands::Watch {
            id,
            node,
            shards,
            interval_secs,
        } => commands::cmd_watch(id, node, shards, interval_secs).await?,
        Commands::Resolve { id, node, shards } => {
            commands::cmd_resolve(id, node, shards).await?
        }
        Commands::Action {
            steps,
            node,
            shards,
            interval_secs,
        } => commands::cmd_action(steps, node, shards, interval_secs).await?,
    }

    Ok(())
}
