//! CLI command implementations.
//!
//! One function per `husk` subcommand. These are the only functions that
//! print or prompt; everything they touch in the store goes through
//! [`crate::repo`] and [`crate::schema`].

use anyhow::{bail, Context as _, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::{ensure_valid_name, HuskError};
use crate::marker::MARKER_FILENAME;
use crate::models::{ContextSource, Scope, DEFAULT_CONTEXT};
use crate::output::{display_path, render_table};
use crate::repo;
use crate::resolve;
use crate::schema::{self, InitMode};

/// Ask a yes/no question on stdin. Anything but `y`/`Y` declines.
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{}\nProceed? [y/N]: ", message);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// `husk init`: create `<install dir>/.husk/husk.db` and write the config.
pub async fn run_init(config_path: &Path, force: bool, install_dir: Option<PathBuf>) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "config {} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let install_dir = match install_dir {
        Some(dir) => std::path::absolute(&dir)?,
        None => dirs::home_dir().context("cannot determine home directory")?,
    };
    let root = install_dir.join(".husk");
    if root.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", root.display());
    }
    std::fs::create_dir_all(&root)
        .with_context(|| format!("failed to create {}", root.display()))?;

    let db_path = root.join("husk.db");
    let mode = if force {
        if db_path.exists() {
            std::fs::remove_file(&db_path)
                .with_context(|| format!("failed to remove {}", db_path.display()))?;
        }
        InitMode::Force
    } else {
        InitMode::Fresh
    };

    schema::initialize(&db_path, DEFAULT_CONTEXT, mode).await?;
    config::save_config(config_path, &Config::new(root, db_path.clone()), force)?;

    println!("Initialized husk store at {}", db_path.display());
    Ok(())
}

/// `husk context init`: register a context for a directory, or a virtual one.
pub async fn run_context_init(
    config: &Config,
    cwd: &Path,
    is_virtual: bool,
    name: Option<String>,
    path: Option<PathBuf>,
    assume_yes: bool,
) -> Result<()> {
    let path = path.unwrap_or_else(|| cwd.to_path_buf());
    let path = if is_virtual {
        path
    } else {
        std::fs::canonicalize(&path)
            .with_context(|| format!("cannot bind context to {}", path.display()))?
    };

    let name = match name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    ensure_valid_name("context", &name)?;

    let kind = if is_virtual { "VIRTUAL" } else { "FILE" };
    let mut actions = vec![
        "This will perform the following actions:".to_string(),
        format!("1. Add '{}' to the husk database as a '{}' context.", name, kind),
    ];
    if !is_virtual {
        actions.push(format!(
            "2. Create a '{}' file in the directory '{}'.",
            MARKER_FILENAME,
            path.display()
        ));
    }

    if !confirm(&actions.join("\n"), assume_yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let bound = (!is_virtual).then_some(path.as_path());
    let context = repo::create_context(&config.db, &name, bound).await?;
    println!("Created context '{}'.", context.name);
    Ok(())
}

/// `husk context info`: print the effective context.
pub async fn run_context_info(
    config_path: &Path,
    config: &Config,
    cwd: &Path,
    verbose: bool,
) -> Result<()> {
    let Some(effective) = resolve::resolve_effective(cwd, config)? else {
        return Ok(());
    };

    println!("{}", effective.name);
    if !verbose {
        return Ok(());
    }

    match &effective.source {
        ContextSource::Pinned => println!("source:  pinned in {}", config_path.display()),
        ContextSource::Marker(dir) => {
            println!("source:  {}", dir.join(MARKER_FILENAME).display())
        }
    }
    match repo::find_context(&config.db, &effective.name).await? {
        Some(context) => {
            println!("created: {}", context.created_at);
            println!("path:    {}", display_path(context.path.as_deref()));
        }
        None => println!("warning: context is not in the husk database"),
    }
    Ok(())
}

/// Pick the listing scope: everything, an explicit name, or the effective
/// context. `None` means there is nothing to list.
fn listing_scope(
    config: &Config,
    cwd: &Path,
    all: bool,
    name: Option<String>,
) -> Result<Option<Scope>> {
    if all {
        return Ok(Some(Scope::All));
    }
    let name = match name {
        Some(name) => Some(name),
        None => resolve::resolve(cwd, config)?,
    };
    Ok(name.map(Scope::Named))
}

/// `husk context list`
pub async fn run_context_list(
    config: &Config,
    cwd: &Path,
    all: bool,
    name: Option<String>,
) -> Result<()> {
    let Some(scope) = listing_scope(config, cwd, all, name)? else {
        return Ok(());
    };

    let rows: Vec<Vec<String>> = repo::list_contexts(&config.db, &scope)
        .await?
        .into_iter()
        .map(|row| vec![row.name, row.created_at, display_path(row.path.as_deref())])
        .collect();

    print!("{}", render_table(&["CONTEXT", "CREATED", "PATH"], &rows));
    Ok(())
}

/// `husk context set`: pin a virtual context for every invocation.
pub async fn run_context_set(config_path: &Path, config: &Config, name: &str) -> Result<()> {
    if repo::find_virtual_context(&config.db, name).await?.is_none() {
        return Err(HuskError::NotFound(format!("virtual context '{}'", name)).into());
    }
    config::set_default_context(config_path, name)?;
    println!("Pinned context '{}'.", name);
    Ok(())
}

/// `husk context unset`
pub fn run_context_unset(config_path: &Path) -> Result<()> {
    config::unset_default_context(config_path)?;
    Ok(())
}

/// Split a comma separated tag list, trimming each entry.
pub fn parse_tag_list(tags: &str) -> Result<Vec<String>> {
    tags.split(',')
        .map(|tag| {
            let tag = tag.trim();
            ensure_valid_name("tag", tag)?;
            Ok(tag.to_string())
        })
        .collect()
}

/// `husk tag add`
pub async fn run_tag_add(
    config: &Config,
    cwd: &Path,
    tags: &str,
    global: bool,
    context: Option<String>,
) -> Result<()> {
    let tags = parse_tag_list(tags)?;

    let context = match context {
        Some(context) => context,
        None if global => DEFAULT_CONTEXT.to_string(),
        None => resolve::resolve(cwd, config)?.context(
            "no context applies here; pass --context, use -G, or run `husk context init`",
        )?,
    };

    let linked = repo::add_tags(&config.db, &context, &tags).await?;
    println!("Added {} new tag(s) to '{}'.", linked, context);
    Ok(())
}

/// `husk tag list`
pub async fn run_tag_list(
    config: &Config,
    cwd: &Path,
    all: bool,
    context: Option<String>,
) -> Result<()> {
    let Some(scope) = listing_scope(config, cwd, all, context)? else {
        return Ok(());
    };

    let rows: Vec<Vec<String>> = repo::list_tags(&config.db, &scope)
        .await?
        .into_iter()
        .map(|row| vec![row.tag_name, row.context_name, row.created_at])
        .collect();

    print!("{}", render_table(&["TAG", "CONTEXT", "CREATED"], &rows));
    Ok(())
}
