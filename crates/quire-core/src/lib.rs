//! Plugin composition and site preparation for Quire.
//!
//! This crate provides:
//! - [`Plugin`]: a named bundle of a setup function and optional hooks
//! - [`register_plugins`] and [`enforce_command_contract`]: build the shared
//!   [`RuntimeContext`] and check the `list`/`validate`/`build`/`dev` commands
//! - [`prepare_site`]: run the hook passes over a content root and produce a
//!   sorted, collision-free route list with a merged [`Layout`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), quire_core::BoxError> {
//! use std::sync::Arc;
//! use quire_core::{
//!     CommandArgs, Contributions, Plugin, SiteConfig, enforce_command_contract, prepare_site,
//!     register_plugins,
//! };
//!
//! let stub = Plugin::builder("stub")
//!     .with_setup(|_| {
//!         Ok(Some(
//!             Contributions::new()
//!                 .command("list", |_, _| Ok(()))
//!                 .command("validate", |_, _| Ok(()))
//!                 .command("build", |_, _| Ok(()))
//!                 .command("dev", |_, _| Ok(())),
//!         ))
//!     })
//!     .build()?;
//!
//! let config = Arc::new(SiteConfig::new("/project", Some("Docs"), vec![stub]));
//! let ctx = register_plugins(&config)?;
//! let commands = enforce_command_contract(&ctx)?;
//! commands.build.call(&ctx, &CommandArgs::default())?;
//!
//! let site = prepare_site(&config.content_dir, "html", &config)?;
//! for route in &site.routes {
//!     println!("{} {}", route.path, route.title);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod error;
mod layout;
mod plugin;
mod registry;
mod route;
mod site;

pub use config::{DEFAULT_TITLE, SiteConfig};
pub use context::{
    CONFIG_KEY, Command, CommandArgs, ContextValue, Contributions, RENDERER_KEY, ROOT_KEY,
    RuntimeContext,
};
pub use error::{BoxError, Hook, MissingCommands, PluginError, PrepareError};
pub use layout::{Layout, LayoutContribution};
pub use plugin::{
    ContentInput, DecoratePageFn, ExtendLayoutFn, ExtendPagesFn, Hooks, PageInput, Plugin,
    PluginBuilder, SetupFn, SiteInput, TransformContentFn,
};
pub use registry::{Capability, Commands, enforce_command_contract, register_plugins};
pub use route::{
    Decoration, ExtraPage, Route, RouteKind, default_title, humanize, normalize_path, route_path,
};
pub use site::{ContentSource, PreparedSite, prepare_site};

// Frontmatter snapshot handed to content hooks.
pub use quire_content::Frontmatter;
