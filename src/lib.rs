//! # husk
//!
//! Remember things in context. husk keeps named *contexts* (workspaces
//! bound to a directory, or virtual) and global *tags* attached to them in a
//! local SQLite store, and works out which context applies from where it is
//! run.
//!
//! ## Resolution
//!
//! ```text
//!  config.default_context ──set?──▶ effective context
//!          │ unset
//!          ▼
//!  cwd ─▶ parent ─▶ ... ─▶ /     first `.husk_context` found names it
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! husk init                       # create ~/.husk/husk.db and the config
//! cd ~/src/proj && husk context init -y
//! husk tag add rust,cli           # tag the context owning the cwd
//! husk tag list -G
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | JSON configuration file |
//! | [`marker`] | Marker files and the upward directory walk |
//! | [`resolve`] | Effective-context resolution |
//! | [`schema`] | Store schema creation and seeding |
//! | [`repo`] | Context and tag operations |
//! | [`db`] | Store connections |
//! | [`models`] | Row and scope types |
//! | [`output`] | Table rendering |
//! | [`commands`] | CLI command implementations |
//! | [`error`] | Error types |

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod marker;
pub mod models;
pub mod output;
pub mod repo;
pub mod resolve;
pub mod schema;
