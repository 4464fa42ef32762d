//! cqlkit CLI (`cqlkit`)
//!
//! YAML로 선언한 CQL 스키마를 검증하고, DDL을 생성하거나 클러스터에 적용합니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;
mod cqlsh;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "cqlkit")]
#[command(author, version, about = "cqlkit CLI - render and apply CQL schemas", long_about = None)]
struct Cli {
    /// Keyspace (overrides context)
    #[arg(long, global = true)]
    keyspace: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage repo context
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Manage user config (cqlsh target)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Render or check schema files
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },

    /// Apply schema files to the cluster
    Apply {
        /// Schema files (defaults to context)
        files: Vec<PathBuf>,

        /// Dry run (print statements, no changes)
        #[arg(long)]
        dry_run: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand enums
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ContextAction {
    /// Set repo context
    Set {
        /// Schema files, in declaration order
        #[arg(long)]
        schema: Vec<PathBuf>,
    },
    /// Show current context
    Show,
    /// Clear context
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set cqlsh target
    Set {
        #[arg(long)]
        cqlsh: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show effective cqlsh target
    Show,
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Print CREATE TYPE / CREATE TABLE statements
    Render {
        /// Schema files (defaults to context)
        files: Vec<PathBuf>,

        /// Write statements to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate schema files
    Check {
        /// Schema files (defaults to context)
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 로그는 stderr로 (stdout은 DDL 출력용)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cqlkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // 설정 로드
    let mut config = CliConfig::load()?;

    // 명령 실행
    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Set { schema } => commands::context::set(cli.keyspace, schema),
            ContextAction::Show => commands::context::show(),
            ContextAction::Clear => commands::context::clear(),
        },

        Commands::Config { action } => match action {
            ConfigAction::Set { cqlsh, host, port } => {
                commands::config::set(&mut config, cqlsh, host, port)
            }
            ConfigAction::Show => commands::config::show(&config),
        },

        Commands::Schema { action } => match action {
            SchemaAction::Render { files, out } => {
                let ctx = context::resolve_context(cli.keyspace.as_deref(), &files);
                commands::schema::render(&ctx, out.as_deref(), cli.format)
            }
            SchemaAction::Check { files } => {
                let ctx = context::resolve_context(cli.keyspace.as_deref(), &files);
                commands::schema::check(&ctx, cli.format)
            }
        },

        Commands::Apply { files, dry_run } => {
            let ctx = context::resolve_context(cli.keyspace.as_deref(), &files);
            commands::apply::apply(&config, &ctx, dry_run)
        }
    }
}
