//! Registration surface for host applications
//!
//! A host resolves the client through [`SuperCollegeProvider`], which builds it
//! once on first use and hands out shared handles afterwards.

use crate::config::SuperCollegeSettings;
use crate::error::SuperCollegeError;
use crate::services::SuperCollege;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Name the client is registered under
pub const SERVICE_NAME: &str = "supercollege";

/// Publishable configuration template with commented guidance
pub const CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

/// Services provided by this crate
pub fn provides() -> &'static [&'static str] {
    &[SERVICE_NAME]
}

/// Type alias the client can also be looked up by
pub fn type_alias() -> &'static str {
    std::any::type_name::<SuperCollege>()
}

/// Whether `name` refers to the client, by service name or by type alias
pub fn is_bound(name: &str) -> bool {
    name == SERVICE_NAME || name == type_alias()
}

/// Lazily constructed singleton client
pub struct SuperCollegeProvider {
    settings: SuperCollegeSettings,
    instance: OnceCell<Arc<SuperCollege>>,
}

impl SuperCollegeProvider {
    pub fn new(settings: SuperCollegeSettings) -> Self {
        Self {
            settings,
            instance: OnceCell::new(),
        }
    }

    /// Return the client, constructing it on first call
    ///
    /// A failed construction is not cached; the next call tries again.
    pub async fn resolve(&self) -> Result<Arc<SuperCollege>, SuperCollegeError> {
        self.instance
            .get_or_try_init(|| async {
                tracing::info!("Constructing {} client", SERVICE_NAME);
                SuperCollege::connect(&self.settings).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// Resolve by service name or type alias
    pub async fn resolve_named(&self, name: &str) -> Option<Result<Arc<SuperCollege>, SuperCollegeError>> {
        if !is_bound(name) {
            return None;
        }
        Some(self.resolve().await)
    }

    pub fn is_resolved(&self) -> bool {
        self.instance.initialized()
    }
}

/// Write the configuration template into `dir` as `supercollege.toml`
///
/// An existing file is left alone unless `force` is set.
pub fn publish_config(dir: &Path, force: bool) -> io::Result<PathBuf> {
    let target = dir.join(format!("{}.toml", SERVICE_NAME));
    if target.exists() && !force {
        tracing::info!("Configuration already published at {}", target.display());
        return Ok(target);
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(&target, CONFIG_TEMPLATE)?;
    tracing::info!("Published configuration template to {}", target.display());
    Ok(target)
}
