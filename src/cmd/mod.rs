mod graph;
mod list;
mod script;
mod source;
mod stats;

pub use stats::StatsJsonOutput;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erd-viewer")]
#[command(version)]
#[command(about = "Render ER diagrams and DDL scripts from database catalog metadata", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where catalog rows come from and how listings are cached
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Catalog snapshot file (YAML or JSON) with recorded listings
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Directory for cached database/schema listings
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Do not read or write the listing cache
    #[arg(long)]
    pub no_cache: bool,

    /// Invalidate cached listings before running
    #[arg(long)]
    pub refresh: bool,

    /// Lifetime of cached listings in seconds
    #[arg(long, default_value = "300")]
    pub ttl: u64,
}

/// Database and schema to import
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Database name
    #[arg(short, long)]
    pub database: String,

    /// Schema name (defaults to PUBLIC, else the first schema of the database)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Show a spinner while reading metadata
    #[arg(short, long)]
    pub progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List databases in the catalog
    Databases {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// List schemas of a database
    Schemas {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Database name
        database: String,
    },

    /// Generate a Graphviz ER diagram for a schema
    Graph {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Built-in theme: common-gray, blue-navy, gray-box
        #[arg(long, conflicts_with = "theme_file")]
        theme: Option<String>,

        /// Theme file (YAML or JSON)
        #[arg(long)]
        theme_file: Option<PathBuf>,

        /// Draw tables without their columns
        #[arg(long)]
        hide_columns: bool,

        /// Show column datatypes
        #[arg(long)]
        types: bool,

        /// Use uppercase names and types
        #[arg(long)]
        upper: bool,

        /// Output file (default: stdout). png/svg/pdf extensions render with Graphviz
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render through Graphviz `dot` into the output file
        #[arg(long)]
        render: bool,
    },

    /// Generate a CREATE OR REPLACE script for a schema
    Script {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Use uppercase keywords, names and types
        #[arg(long)]
        upper: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show schema statistics and import diagnostics
    Stats {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List built-in themes
    Themes,

    /// Print the JSON schema of a --json output
    JsonSchema {
        /// Output name (omit to list available schemas)
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Databases { catalog } => list::databases(catalog),
        Commands::Schemas { catalog, database } => list::schemas(catalog, database),
        Commands::Graph {
            selection,
            theme,
            theme_file,
            hide_columns,
            types,
            upper,
            output,
            render,
        } => graph::run(
            selection,
            theme,
            theme_file,
            hide_columns,
            types,
            upper,
            output,
            render,
        ),
        Commands::Script {
            selection,
            upper,
            output,
        } => script::run(selection, upper, output),
        Commands::Stats { selection, json } => stats::run(selection, json),
        Commands::Themes => {
            list::themes();
            Ok(())
        }
        Commands::JsonSchema { name } => match name {
            Some(name) => {
                let schema = crate::json_schema::get_schema(&name).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown schema: {}. Available: {}",
                        name,
                        crate::json_schema::schema_names().join(", ")
                    )
                })?;
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
            None => {
                for name in crate::json_schema::schema_names() {
                    println!("{}", name);
                }
                Ok(())
            }
        },
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "erd-viewer", &mut io::stdout());
            Ok(())
        }
    }
}
