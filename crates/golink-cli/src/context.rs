use std::path::Path;
use std::rc::Rc;

use anyhow::{Context as AnyhowContext, Result};
use golink_core::{AppConfig, ConfigError, EditorInvoker, Request, Router};

/// Everything one invocation needs: the service registry built from the
/// home-rooted configuration
///
/// Built once in `main` and passed by reference; nothing is global.
pub struct Context {
    router: Router,
}

impl Context {
    /// Build the context for the current user's home directory
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Self::for_home(&home)
    }

    /// Build the context rooted at `home`, using the real editor
    pub fn for_home(home: &Path) -> Result<Self> {
        let config = AppConfig::for_home(home);
        config.validate().context("Invalid built-in configuration")?;

        let opener = Rc::new(EditorInvoker::new(config.editor.clone()));
        let router = Router::with_defaults(&config, opener);

        Ok(Self { router })
    }

    /// Route a validated request to its handler
    pub fn dispatch(&self, request: &Request) -> Result<()> {
        Ok(self.router.dispatch_request(request)?)
    }
}
