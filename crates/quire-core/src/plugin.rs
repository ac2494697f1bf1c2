//! Plugin declarations and hook signatures.
//!
//! A [`Plugin`] is a name plus any combination of a setup function and the
//! four hooks. Plugins are assembled with [`PluginBuilder`] and are immutable
//! once built:
//!
//! ```
//! use quire_core::{Contributions, Plugin};
//!
//! let plugin = Plugin::builder("shout")
//!     .with_setup(|_ctx| Ok(Some(Contributions::new().data("volume", "loud"))))
//!     .with_transform_content(|input| Ok(input.source.to_uppercase()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(plugin.name(), "shout");
//! assert!(plugin.has_setup());
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use quire_content::Frontmatter;

use crate::context::{Contributions, RuntimeContext};
use crate::error::{BoxError, PluginError};
use crate::layout::LayoutContribution;
use crate::route::{Decoration, ExtraPage, Route};

/// Setup function: observes the accumulated context, returns new entries.
pub type SetupFn =
    Arc<dyn Fn(&RuntimeContext) -> Result<Option<Contributions>, BoxError> + Send + Sync>;
/// Transform-content hook: returns the replacement source.
pub type TransformContentFn =
    Arc<dyn Fn(&ContentInput<'_>) -> Result<String, BoxError> + Send + Sync>;
/// Decorate-page hook: returns optional HTML fragments for the page.
pub type DecoratePageFn =
    Arc<dyn Fn(&PageInput<'_>) -> Result<Option<Decoration>, BoxError> + Send + Sync>;
/// Extend-layout hook: returns an optional layout contribution.
pub type ExtendLayoutFn =
    Arc<dyn Fn(&SiteInput<'_>) -> Result<Option<LayoutContribution>, BoxError> + Send + Sync>;
/// Extend-pages hook: returns optional synthesized pages.
pub type ExtendPagesFn =
    Arc<dyn Fn(&SiteInput<'_>) -> Result<Option<Vec<ExtraPage>>, BoxError> + Send + Sync>;

/// Input to a transform-content hook.
#[derive(Debug)]
pub struct ContentInput<'a> {
    /// Content file, relative to the content root.
    pub file: &'a str,
    /// Frontmatter extracted from the current source.
    pub frontmatter: &'a Frontmatter,
    /// Route path derived from the file name.
    pub path: &'a str,
    /// Identifier of the renderer the site is prepared for.
    pub renderer: &'a str,
    /// Content root.
    pub root: &'a Path,
    /// Current source, including any earlier transforms.
    pub source: &'a str,
}

/// Input to a decorate-page hook.
#[derive(Debug)]
pub struct PageInput<'a> {
    /// Content file, relative to the content root.
    pub file: &'a str,
    /// Frontmatter extracted from the final source.
    pub frontmatter: &'a Frontmatter,
    /// Route path.
    pub path: &'a str,
    /// Identifier of the renderer the site is prepared for.
    pub renderer: &'a str,
    /// Content root.
    pub root: &'a Path,
    /// Final source after every transform.
    pub source: &'a str,
    /// Resolved page title.
    pub title: &'a str,
}

/// Input to the site-wide hooks.
#[derive(Debug)]
pub struct SiteInput<'a> {
    /// Identifier of the renderer the site is prepared for.
    pub renderer: &'a str,
    /// Content root.
    pub root: &'a Path,
    /// Routes known when the hook runs.
    pub routes: &'a [Route],
}

/// Optional hook bundle of a plugin.
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) transform_content: Option<TransformContentFn>,
    pub(crate) decorate_page: Option<DecoratePageFn>,
    pub(crate) extend_layout: Option<ExtendLayoutFn>,
    pub(crate) extend_pages: Option<ExtendPagesFn>,
}

impl Hooks {
    /// True if no hook is set.
    pub fn is_empty(&self) -> bool {
        self.transform_content.is_none()
            && self.decorate_page.is_none()
            && self.extend_layout.is_none()
            && self.extend_pages.is_none()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("transform_content", &self.transform_content.is_some())
            .field("decorate_page", &self.decorate_page.is_some())
            .field("extend_layout", &self.extend_layout.is_some())
            .field("extend_pages", &self.extend_pages.is_some())
            .finish()
    }
}

/// A registered plugin.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    setup: Option<SetupFn>,
    hooks: Hooks,
}

impl Plugin {
    /// Start building a plugin.
    pub fn builder(name: impl Into<String>) -> PluginBuilder {
        PluginBuilder {
            name: name.into(),
            setup: None,
            hooks: Hooks::default(),
        }
    }

    /// Plugin name, used for error attribution.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the plugin provides a setup function.
    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    /// The plugin's hooks.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub(crate) fn setup_fn(&self) -> Option<&SetupFn> {
        self.setup.as_ref()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("setup", &self.setup.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Builder for [`Plugin`].
pub struct PluginBuilder {
    name: String,
    setup: Option<SetupFn>,
    hooks: Hooks,
}

impl PluginBuilder {
    /// Set the setup function.
    #[must_use]
    pub fn with_setup<F>(mut self, f: F) -> Self
    where
        F: Fn(&RuntimeContext) -> Result<Option<Contributions>, BoxError> + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(f));
        self
    }

    /// Set the transform-content hook.
    #[must_use]
    pub fn with_transform_content<F>(mut self, f: F) -> Self
    where
        F: Fn(&ContentInput<'_>) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.hooks.transform_content = Some(Arc::new(f));
        self
    }

    /// Set the decorate-page hook.
    #[must_use]
    pub fn with_decorate_page<F>(mut self, f: F) -> Self
    where
        F: Fn(&PageInput<'_>) -> Result<Option<Decoration>, BoxError> + Send + Sync + 'static,
    {
        self.hooks.decorate_page = Some(Arc::new(f));
        self
    }

    /// Set the extend-layout hook.
    #[must_use]
    pub fn with_extend_layout<F>(mut self, f: F) -> Self
    where
        F: Fn(&SiteInput<'_>) -> Result<Option<LayoutContribution>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.extend_layout = Some(Arc::new(f));
        self
    }

    /// Set the extend-pages hook.
    #[must_use]
    pub fn with_extend_pages<F>(mut self, f: F) -> Self
    where
        F: Fn(&SiteInput<'_>) -> Result<Option<Vec<ExtraPage>>, BoxError> + Send + Sync + 'static,
    {
        self.hooks.extend_pages = Some(Arc::new(f));
        self
    }

    /// Finish the plugin.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::EmptyName` for a blank name and
    /// `PluginError::NoCapabilities` when neither setup nor a hook is set.
    pub fn build(self) -> Result<Plugin, PluginError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PluginError::EmptyName);
        }
        if self.setup.is_none() && self.hooks.is_empty() {
            return Err(PluginError::NoCapabilities {
                plugin: name.to_owned(),
            });
        }
        Ok(Plugin {
            name: name.to_owned(),
            setup: self.setup,
            hooks: self.hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_name() {
        let err = Plugin::builder("  ")
            .with_setup(|_| Ok(None))
            .build()
            .unwrap_err();
        assert!(matches!(err, PluginError::EmptyName));
    }

    #[test]
    fn test_build_requires_capability() {
        let err = Plugin::builder("idle").build().unwrap_err();
        assert!(matches!(err, PluginError::NoCapabilities { ref plugin } if plugin == "idle"));
        assert!(err.to_string().contains("`idle`"));
    }

    #[test]
    fn test_hooks_only_plugin_is_valid() {
        let plugin = Plugin::builder("footer")
            .with_extend_layout(|_| Ok(None))
            .build()
            .unwrap();
        assert!(!plugin.has_setup());
        assert!(!plugin.hooks().is_empty());
        assert!(plugin.hooks().extend_layout.is_some());
        assert!(plugin.hooks().transform_content.is_none());
    }

    #[test]
    fn test_debug_lists_capabilities() {
        let plugin = Plugin::builder("toc")
            .with_decorate_page(|_| Ok(None))
            .build()
            .unwrap();
        let debug = format!("{plugin:?}");
        assert!(debug.contains("\"toc\""));
        assert!(debug.contains("decorate_page: true"));
    }
}
