//! CLI entry point for arjuna-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "arjuna-site")]
#[command(author = "Arjuna Security")]
#[command(version)]
#[command(about = "Serve or export the Arjuna audit portfolio and blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the site as static HTML
    #[command(alias = "g")]
    Generate,

    /// Start the web server
    #[command(alias = "s", alias = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Remove the generated output
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag, audit)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "arjuna_site=debug,tower_http=debug,info"
    } else {
        "arjuna_site=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate => {
            let site = arjuna_site::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Serve { port, ip } => {
            let site = arjuna_site::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            arjuna_site::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = arjuna_site::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = arjuna_site::Site::new(&base_dir)?;
            arjuna_site::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("arjuna-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
