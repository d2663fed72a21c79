//! # elemental CLI
//!
//! Command-line interface for querying a custom elements workspace.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "elemental")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = elemental_registry::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Workspace root (overrides the configured workspace)
    #[arg(long, env = "ELEMENTAL_ROOT")]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every element in the workspace
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one element with its items, guidelines and relationships (JSON)
    Element {
        /// Tag name, e.g. pf-button
        tag: String,
    },

    /// Tag-name prefixes shared by more than one element
    Prefixes,

    /// Every CSS custom property declared by any element
    CssProperties,

    /// Elements related to a tag
    Relationships {
        /// Tag name
        tag: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the manifest JSON schema for the loaded manifests
    Schema {
        /// Only list the schema versions declared by the manifests
        #[arg(long)]
        versions: bool,
    },

    /// Run every query once and print registry metrics
    Stats {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = commands::open_registry(&cli.config, cli.root.as_deref())?;

    match cli.command {
        Commands::List { json } => commands::list_elements(&registry, json),
        Commands::Element { tag } => commands::show_element(&registry, &tag),
        Commands::Prefixes => commands::show_prefixes(&registry),
        Commands::CssProperties => commands::show_css_properties(&registry),
        Commands::Relationships { tag, json } => {
            commands::show_relationships(&registry, &tag, json)
        }
        Commands::Schema { versions } => commands::show_schema(&registry, versions),
        Commands::Stats { json } => commands::show_stats(&registry, json),
    }
}
