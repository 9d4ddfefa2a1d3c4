//! link-mirror
//!
//! Reads chat messages one per line on stdin and answers each message that
//! links to a known service with the mirror-frontend equivalent on stdout.
//!
//! # Architecture Overview
//!
//! ```text
//!   message ──▶ scanner ──▶ matcher ──▶ query filter ──▶ generator ──▶ reply
//!                              ▲             ▲               ▲
//!                              └──── Registry (ArcSwap) ─────┘
//!                                        ▲
//!                        services.json / alts.json (watcher, SIGHUP)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use link_mirror::bot::{spawn_blocking_lines, Session};
use link_mirror::config::loader::{load_config_or_default, load_registry};
use link_mirror::config::validation::validate_registry;
use link_mirror::config::BotConfig;
use link_mirror::engine::{Engine, EngineOptions};
use link_mirror::lifecycle::{signals, startup, Shutdown};
use link_mirror::observability::logging;
use link_mirror::Outcome;

#[derive(Parser)]
#[command(name = "link-mirror")]
#[command(about = "Rewrites links to known services into mirror-frontend links", long_about = None)]
struct Cli {
    /// Bot configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer messages read from stdin, one per line
    Run,
    /// Print the candidate links found in TEXT
    Detect { text: String },
    /// Print the substitutions for LINK
    Substitute {
        link: String,
        /// Print every mirror instead of only the first
        #[arg(long)]
        all: bool,
    },
    /// Validate the configuration and registry tables
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    match cli.command {
        Commands::Run => run(config).await?,
        Commands::Detect { text } => {
            let engine = Engine::new(Arc::default(), &EngineOptions::from(&config));
            for link in engine.detect_links(&text) {
                println!("{link}");
            }
        }
        Commands::Substitute { link, all } => {
            let engine = Engine::new(
                Arc::new(load_registry(&config.registry)),
                &EngineOptions::from(&config),
            );
            match &*engine.substitute(&link) {
                Outcome::Success(links) => {
                    let count = if all { links.len() } else { 1 };
                    for mirror in links.iter().take(count) {
                        println!("{mirror}");
                    }
                }
                Outcome::NoSubstitution { service } => {
                    eprintln!("No alt frontend configured for {service}");
                }
                Outcome::NoMatch => eprintln!("Not a link to a known service"),
            }
        }
        Commands::Check => {
            let registry = load_registry(&config.registry);
            let warnings = validate_registry(&registry);
            println!(
                "{} services, {} alt frontends, {} warnings",
                registry.services().len(),
                registry.alts().len(),
                warnings.len()
            );
            for warning in warnings {
                println!("warning: {warning}");
            }
        }
    }

    Ok(())
}

async fn run(config: BotConfig) -> std::io::Result<()> {
    tracing::info!("link-mirror v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = startup::start(config);
    let shutdown = Arc::new(Shutdown::new());

    tokio::spawn(signals::handle_signals(
        Arc::clone(&runtime.handle),
        runtime.config.registry.clone(),
        Arc::clone(&shutdown),
    ));

    // A plain thread, so a read pending on stdin cannot hold up runtime shutdown.
    let messages = spawn_blocking_lines(std::io::stdin())?;
    let session = Session::new(
        messages,
        tokio::io::stdout(),
        Arc::clone(&runtime.handle),
        runtime.config.reply.clone(),
    );
    session.run(shutdown.subscribe()).await;
    shutdown.trigger();

    tracing::info!("Shutdown complete");
    Ok(())
}
