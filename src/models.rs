//! Row and scope types returned by the repository.
//!
//! `created_at` values are kept exactly as SQLite's `CURRENT_TIMESTAMP`
//! stores them (`YYYY-MM-DD HH:MM:SS`, UTC).

use std::path::PathBuf;

/// Name of the context seeded into every new store.
pub const DEFAULT_CONTEXT: &str = "HUSK";

/// A stored context. `path` is `None` for virtual contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub path: Option<String>,
}

impl Context {
    pub fn is_virtual(&self) -> bool {
        self.path.is_none()
    }
}

/// One row of `husk context list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRow {
    pub name: String,
    pub created_at: String,
    pub path: Option<String>,
}

/// One row of `husk tag list`: a tag as linked to one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub tag_name: String,
    pub context_name: String,
    /// When the tag was linked to the context.
    pub created_at: String,
}

/// Which contexts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Named(String),
    All,
}

/// Where the effective context came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSource {
    /// `default_context` in the config.
    Pinned,
    /// A marker file in this directory.
    Marker(PathBuf),
}

/// The context that applies to the current invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveContext {
    pub name: String,
    pub source: ContextSource,
}
