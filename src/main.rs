//! # husk CLI
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `husk init` | Create the store and the config file |
//! | `husk context init` | Register a directory (or virtual) context |
//! | `husk context info` | Show the context that applies here |
//! | `husk context list` | List one or all contexts |
//! | `husk context set <name>` | Pin a virtual context globally |
//! | `husk context unset` | Remove the pinned context |
//! | `husk tag add <tags>` | Attach comma separated tags to a context |
//! | `husk tag list` | List tags of one or all contexts |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use husk::commands;
use husk::config::{self, Config};

/// Remember things in context.
#[derive(Parser)]
#[command(name = "husk", about = "Remember things in context.", version)]
struct Cli {
    /// Path to the configuration file (JSON).
    ///
    /// Defaults to `~/.config/husk/config.json`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log what husk is doing to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize husk.
    ///
    /// Creates `<PATH>/.husk/husk.db` with the default `HUSK` context and
    /// writes the configuration file.
    Init {
        /// Overwrite any existing database and configuration.
        #[arg(short, long)]
        force: bool,

        /// Directory to create the `.husk` directory in. Defaults to $HOME.
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Manage tags.
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
}

#[derive(Subcommand)]
enum ContextAction {
    /// Initialize a context.
    Init {
        /// Create a virtual context that is not tied to the filesystem.
        #[arg(long = "virtual")]
        is_virtual: bool,

        /// Name of the context. Defaults to the name of the directory.
        #[arg(long)]
        name: Option<String>,

        /// Context root directory. Defaults to the current directory.
        /// Ignored for virtual contexts.
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the context that applies to the current directory.
    Info {
        /// Also show where the context came from and its stored details.
        #[arg(short = 'v', long = "details")]
        details: bool,
    },

    /// Show contexts.
    List {
        /// All contexts.
        #[arg(short = 'G')]
        all: bool,

        /// Name of the context.
        #[arg(long)]
        name: Option<String>,
    },

    /// Set a global VIRTUAL context to work in.
    Set {
        /// Name of the virtual context.
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Unset any current global VIRTUAL context.
    Unset,
}

#[derive(Subcommand)]
enum TagAction {
    /// Add tags.
    Add {
        /// Comma separated list of tags.
        #[arg(value_name = "TAGS")]
        tags: String,

        /// Add the tags to the global `HUSK` context.
        #[arg(short = 'G')]
        global: bool,

        /// Explicit context to add the tags to.
        #[arg(long, value_name = "NAME")]
        context: Option<String>,
    },

    /// List tags.
    List {
        /// Tags of all contexts.
        #[arg(short = 'G')]
        all: bool,

        /// Name of the context.
        #[arg(long)]
        context: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "husk=debug" } else { "husk=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    match cli.command {
        // `init` is the only command that runs without an existing config.
        Commands::Init { force, path } => {
            commands::run_init(&config_path, force, path).await?;
        }
        Commands::Context { action } => {
            let (cfg, cwd) = load_invocation(&config_path)?;
            run_context(action, &config_path, &cfg, &cwd).await?;
        }
        Commands::Tag { action } => {
            let (cfg, cwd) = load_invocation(&config_path)?;
            run_tag(action, &cfg, &cwd).await?;
        }
    }

    Ok(())
}

/// Config and working directory, read once per invocation.
fn load_invocation(config_path: &Path) -> Result<(Config, PathBuf)> {
    let cfg = config::load_config(config_path)?;
    let cwd = std::env::current_dir()?;
    Ok((cfg, cwd))
}

async fn run_context(
    action: ContextAction,
    config_path: &Path,
    cfg: &Config,
    cwd: &Path,
) -> Result<()> {
    match action {
        ContextAction::Init {
            is_virtual,
            name,
            path,
            yes,
        } => commands::run_context_init(cfg, cwd, is_virtual, name, path, yes).await,
        ContextAction::Info { details } => {
            commands::run_context_info(config_path, cfg, cwd, details).await
        }
        ContextAction::List { all, name } => commands::run_context_list(cfg, cwd, all, name).await,
        ContextAction::Set { name } => commands::run_context_set(config_path, cfg, &name).await,
        ContextAction::Unset => commands::run_context_unset(config_path),
    }
}

async fn run_tag(action: TagAction, cfg: &Config, cwd: &Path) -> Result<()> {
    match action {
        TagAction::Add {
            tags,
            global,
            context,
        } => commands::run_tag_add(cfg, cwd, &tags, global, context).await,
        TagAction::List { all, context } => commands::run_tag_list(cfg, cwd, all, context).await,
    }
}
