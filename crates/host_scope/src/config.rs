//! Runtime settings for the host scope engine.
//!
//! Settings can be built explicitly or read from the environment.

use std::borrow::Cow;
use std::env;
use std::path::PathBuf;

use log::warn;

use crate::identity::{BrowserFamily, BrowserIdentity};
use crate::loader::{default_registry, load_registry_path};
use crate::registry::ClassRegistry;

/// Runtime configuration for the host scope engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostScopeConfig {
    /// JSON table replacing the built-in host classes
    pub registry_path: Option<PathBuf>,
    /// Identity used when a caller names none
    pub default_browser: BrowserIdentity,
    /// Whether engines memoize resolution results
    pub cache_enabled: bool,
}

impl HostScopeConfig {
    /// Construct a configuration with explicit values.
    #[inline]
    #[must_use]
    pub const fn new(
        registry_path: Option<PathBuf>,
        default_browser: BrowserIdentity,
        cache_enabled: bool,
    ) -> Self {
        Self {
            registry_path,
            default_browser,
            cache_enabled,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `HOST_SCOPE_REGISTRY`: path to a JSON host class table
    /// - `HOST_SCOPE_BROWSER`: default browser token (default: `chrome`)
    /// - `HOST_SCOPE_CACHE`: set to "1" to memoize results (default: disabled)
    #[must_use]
    pub fn from_env() -> Self {
        let registry_path = env::var_os("HOST_SCOPE_REGISTRY")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let default_browser = env::var("HOST_SCOPE_BROWSER").map_or_else(
            |_| Self::fallback_browser(),
            |token| {
                token.parse::<BrowserIdentity>().unwrap_or_else(|error| {
                    warn!(target: "host_scope", "ignoring HOST_SCOPE_BROWSER: {error}");
                    Self::fallback_browser()
                })
            },
        );
        let cache_enabled = env::var("HOST_SCOPE_CACHE").is_ok_and(|value| value == "1");
        Self::new(registry_path, default_browser, cache_enabled)
    }

    #[inline]
    const fn fallback_browser() -> BrowserIdentity {
        BrowserIdentity::current(BrowserFamily::Chrome)
    }

    /// The registry this configuration selects: the file at `registry_path` if set,
    /// otherwise the built-in table.
    ///
    /// # Errors
    /// Returns an error if the selected table cannot be read or fails validation.
    pub fn load_registry(&self) -> anyhow::Result<Cow<'static, ClassRegistry>> {
        match &self.registry_path {
            Some(path) => Ok(Cow::Owned(load_registry_path(path)?)),
            None => Ok(Cow::Borrowed(default_registry()?)),
        }
    }
}

impl Default for HostScopeConfig {
    #[inline]
    fn default() -> Self {
        Self::new(None, Self::fallback_browser(), false)
    }
}
