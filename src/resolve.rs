//! Effective-context resolution.
//!
//! A context pinned with `husk context set` (stored as `default_context` in
//! the config) always applies. Virtual contexts have no directory to anchor
//! them, so marker files are not consulted at all while one is pinned.
//! Without a pin, the nearest marker above the invocation directory decides.

use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::HuskResult;
use crate::marker;
use crate::models::{ContextSource, EffectiveContext};

/// Resolve the effective context and where it came from.
pub fn resolve_effective(
    invocation_path: &Path,
    config: &Config,
) -> HuskResult<Option<EffectiveContext>> {
    if let Some(name) = &config.default_context {
        debug!(context = %name, "using pinned context");
        return Ok(Some(EffectiveContext {
            name: name.clone(),
            source: ContextSource::Pinned,
        }));
    }

    Ok(marker::find_marker(invocation_path)?.map(|found| EffectiveContext {
        name: found.marker.context_name,
        source: ContextSource::Marker(found.dir),
    }))
}

/// Name of the effective context for an invocation at `invocation_path`.
pub fn resolve(invocation_path: &Path, config: &Config) -> HuskResult<Option<String>> {
    Ok(resolve_effective(invocation_path, config)?.map(|effective| effective.name))
}
