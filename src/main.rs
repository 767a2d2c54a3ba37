//! Products CLI - record products bought in shops and list them back

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "products")]
#[command(version)]
#[command(about = "Product inventory - record products, their shops and costs")]
#[command(long_about = r#"
Products keeps a small SQLite inventory of what was bought where and for how much.

Example usage:
  products add --name молоко --shop пятерочка --cost 55.9
  products list
  products select --shop пятерочка
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Shop the product was bought at
        #[arg(short, long)]
        shop: String,

        /// Product cost
        #[arg(short, long, allow_negative_numbers = true)]
        cost: f64,

        /// Path to the database file (defaults to ~/products.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show all products
    List {
        /// Path to the database file (defaults to ~/products.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show products from one shop
    Select {
        /// Shop title, matched exactly
        #[arg(short, long)]
        shop: String,

        /// Path to the database file (defaults to ~/products.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// JSON envelope wrapping a command's result
pub fn envelope(command: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    })
}

pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&envelope(command, data))?);
    }
    Ok(())
}

fn emit_failure(output_mode: OutputMode, err: &anyhow::Error) {
    match output_mode {
        OutputMode::Human => products::ui::error(&format!("{err:#}")),
        OutputMode::Json => {
            let body = serde_json::json!({ "ok": false, "error": format!("{err:#}") });
            println!("{body}");
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    if let Err(err) = run(cli, output_mode) {
        tracing::debug!("Command failed: {err:?}");
        emit_failure(output_mode, &err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = products::config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Add { name, shop, cost, db } => {
            let mut store = commands::open_store(db, config.as_ref())?;
            commands::run_add(&mut store, &name, &shop, cost, output_mode)
        }
        Commands::List { db } => {
            let store = commands::open_store(db, config.as_ref())?;
            commands::run_list(&store, output_mode)
        }
        Commands::Select { shop, db } => {
            let store = commands::open_store(db, config.as_ref())?;
            commands::run_select(&store, &shop, output_mode)
        }
    }
}
