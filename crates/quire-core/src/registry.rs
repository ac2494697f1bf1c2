//! Plugin registration and the command contract.
//!
//! [`register_plugins`] folds every plugin's setup into one
//! [`RuntimeContext`]; [`enforce_command_contract`] then checks that the four
//! command capabilities are present and returns them as a typed [`Commands`]
//! set.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::context::{Command, RuntimeContext};
use crate::error::{MissingCommands, PluginError};

/// Command capability every configured site must expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Print the prepared routes.
    List,
    /// Validate content.
    Validate,
    /// Render the site.
    Build,
    /// Render and rebuild on change.
    Dev,
}

impl Capability {
    /// Every capability, in contract order.
    pub const ALL: [Self; 4] = [Self::List, Self::Validate, Self::Build, Self::Dev];

    /// Context key of this capability.
    pub fn key(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Validate => "validate",
            Self::Build => "build",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The full command set, available once the contract holds.
#[derive(Clone, Debug)]
pub struct Commands {
    /// `list` command.
    pub list: Command,
    /// `validate` command.
    pub validate: Command,
    /// `build` command.
    pub build: Command,
    /// `dev` command.
    pub dev: Command,
}

impl Commands {
    /// Get the command for a capability.
    pub fn get(&self, capability: Capability) -> &Command {
        match capability {
            Capability::List => &self.list,
            Capability::Validate => &self.validate,
            Capability::Build => &self.build,
            Capability::Dev => &self.dev,
        }
    }
}

/// Commands found in a context, each possibly absent.
#[derive(Default)]
struct CommandSlots {
    list: Option<Command>,
    validate: Option<Command>,
    build: Option<Command>,
    dev: Option<Command>,
}

impl CommandSlots {
    fn collect(ctx: &RuntimeContext) -> Self {
        let lookup = |capability: Capability| ctx.command(capability.key()).cloned();
        Self {
            list: lookup(Capability::List),
            validate: lookup(Capability::Validate),
            build: lookup(Capability::Build),
            dev: lookup(Capability::Dev),
        }
    }

    fn missing(&self) -> Vec<Capability> {
        let present = [
            self.list.is_some(),
            self.validate.is_some(),
            self.build.is_some(),
            self.dev.is_some(),
        ];
        Capability::ALL
            .into_iter()
            .zip(present)
            .filter_map(|(capability, present)| (!present).then_some(capability))
            .collect()
    }

    fn into_commands(self) -> Result<Commands, MissingCommands> {
        let missing = self.missing();
        match (self.list, self.validate, self.build, self.dev) {
            (Some(list), Some(validate), Some(build), Some(dev)) => Ok(Commands {
                list,
                validate,
                build,
                dev,
            }),
            _ => Err(MissingCommands { missing }),
        }
    }
}

/// Register every plugin of `config` in declared order.
///
/// Each setup observes the contributions of all earlier plugins and none of
/// the later ones.
///
/// # Errors
///
/// Returns `PluginError::DuplicateName` before any setup runs if two plugins
/// share a name, and `PluginError::Setup` for the first plugin whose setup
/// fails. Later plugins are not run.
pub fn register_plugins(config: &Arc<SiteConfig>) -> Result<RuntimeContext, PluginError> {
    let mut names = HashSet::new();
    if let Some(plugin) = config.plugins().iter().find(|p| !names.insert(p.name())) {
        return Err(PluginError::DuplicateName {
            plugin: plugin.name().to_owned(),
        });
    }

    let mut ctx = RuntimeContext::seeded(config);
    for plugin in config.plugins() {
        ctx.register(plugin)?;
    }
    tracing::info!(
        plugins = config.plugins().len(),
        entries = ctx.keys().count(),
        "Registered plugins"
    );
    Ok(ctx)
}

/// Check that `list`, `validate`, `build` and `dev` are present and callable.
///
/// Has no side effects. Call it only after every plugin is registered.
///
/// # Errors
///
/// Returns `PluginError::MissingCommands` naming every missing capability.
pub fn enforce_command_contract(ctx: &RuntimeContext) -> Result<Commands, PluginError> {
    CommandSlots::collect(ctx)
        .into_commands()
        .map_err(PluginError::MissingCommands)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::Contributions;
    use crate::plugin::Plugin;

    fn commands_plugin(name: &str, keys: &'static [&'static str]) -> Plugin {
        Plugin::builder(name)
            .with_setup(move |_| {
                let contributions = keys
                    .iter()
                    .fold(Contributions::new(), |acc, key| acc.command(*key, |_, _| Ok(())));
                Ok(Some(contributions))
            })
            .build()
            .unwrap()
    }

    fn site(plugins: Vec<Plugin>) -> Arc<SiteConfig> {
        Arc::new(SiteConfig::new("/project", Some("Test"), plugins))
    }

    fn missing(ctx: &RuntimeContext) -> Vec<Capability> {
        match enforce_command_contract(ctx) {
            Err(PluginError::MissingCommands(m)) => m.missing,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => Vec::new(),
        }
    }

    #[test]
    fn test_setups_observe_only_earlier_plugins() {
        let seen: Arc<Mutex<Vec<(String, Vec<String>)>>> = Arc::default();

        let plugins = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let seen = Arc::clone(&seen);
                Plugin::builder(name)
                    .with_setup(move |ctx| {
                        let keys = ctx.keys().map(str::to_owned).collect();
                        seen.lock().unwrap().push((name.to_owned(), keys));
                        Ok(Some(Contributions::new().data(format!("from-{name}"), name)))
                    })
                    .build()
                    .unwrap()
            })
            .collect();

        let ctx = register_plugins(&site(plugins)).unwrap();
        let seen = seen.lock().unwrap();

        assert_eq!(
            *seen,
            vec![
                ("a".to_owned(), vec!["config".to_owned(), "root".to_owned()]),
                (
                    "b".to_owned(),
                    vec!["config".to_owned(), "from-a".to_owned(), "root".to_owned()]
                ),
                (
                    "c".to_owned(),
                    vec![
                        "config".to_owned(),
                        "from-a".to_owned(),
                        "from-b".to_owned(),
                        "root".to_owned()
                    ]
                ),
            ]
        );
        assert!(ctx.contains("from-c"));
    }

    #[test]
    fn test_setup_failure_names_plugin_and_cause() {
        let ran_after = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran_after);
        let plugins = vec![
            commands_plugin("stub", &["list"]),
            Plugin::builder("exploder")
                .with_setup(|_| Err("boom".into()))
                .build()
                .unwrap(),
            Plugin::builder("after")
                .with_setup(move |_| {
                    *flag.lock().unwrap() = true;
                    Ok(None)
                })
                .build()
                .unwrap(),
        ];

        let err = register_plugins(&site(plugins)).unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, PluginError::Setup { ref plugin, .. } if plugin == "exploder"));
        assert!(message.contains("exploder"));
        assert!(message.contains("boom"));
        assert!(!*ran_after.lock().unwrap());
    }

    #[test]
    fn test_contract_satisfied() {
        let ctx = register_plugins(&site(vec![commands_plugin(
            "stub",
            &["list", "validate", "build", "dev"],
        )]))
        .unwrap();

        let commands = enforce_command_contract(&ctx).unwrap();
        commands
            .get(Capability::Build)
            .call(&ctx, &crate::CommandArgs::default())
            .unwrap();
    }

    #[test]
    fn test_contract_reports_all_when_empty() {
        let ctx = register_plugins(&site(Vec::new())).unwrap();
        assert_eq!(missing(&ctx), Capability::ALL.to_vec());
    }

    #[test]
    fn test_contract_reports_exact_subset() {
        let ctx = register_plugins(&site(vec![commands_plugin("half", &["validate", "dev"])]))
            .unwrap();
        assert_eq!(missing(&ctx), vec![Capability::List, Capability::Build]);
    }

    #[test]
    fn test_contract_missing_renderer_hint() {
        let ctx = register_plugins(&site(vec![commands_plugin("core", &["list", "validate"])]))
            .unwrap();

        let err = enforce_command_contract(&ctx).unwrap_err();
        let message = err.to_string();

        assert_eq!(missing(&ctx), vec![Capability::Build, Capability::Dev]);
        assert!(message.contains("build, dev"), "got: {message}");
        assert!(message.contains("renderer plugin"), "got: {message}");
    }

    #[test]
    fn test_contract_without_renderer_gap_has_no_hint() {
        let ctx = register_plugins(&site(vec![commands_plugin("html", &["build", "dev"])]))
            .unwrap();
        let message = enforce_command_contract(&ctx).unwrap_err().to_string();
        assert_eq!(message, "Missing required commands: list, validate");
    }

    #[test]
    fn test_non_callable_entry_does_not_satisfy_contract() {
        let data_plugin = Plugin::builder("liar")
            .with_setup(|_| Ok(Some(Contributions::new().data("dev", "soon"))))
            .build()
            .unwrap();
        let ctx = register_plugins(&site(vec![
            commands_plugin("stub", &["list", "validate", "build"]),
            data_plugin,
        ]))
        .unwrap();

        assert_eq!(missing(&ctx), vec![Capability::Dev]);
    }

    #[test]
    fn test_later_plugin_overrides_command() {
        let calls: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let plugins = vec![
            commands_plugin("base", &["list", "validate", "dev"]),
            Plugin::builder("renderer-a")
                .with_setup(move |_| {
                    let first = Arc::clone(&first);
                    Ok(Some(Contributions::new().command("build", move |_, _| {
                        first.lock().unwrap().push("a");
                        Ok(())
                    })))
                })
                .build()
                .unwrap(),
            Plugin::builder("renderer-b")
                .with_setup(move |_| {
                    let second = Arc::clone(&second);
                    Ok(Some(Contributions::new().command("build", move |_, _| {
                        second.lock().unwrap().push("b");
                        Ok(())
                    })))
                })
                .build()
                .unwrap(),
        ];

        let ctx = register_plugins(&site(plugins)).unwrap();
        let commands = enforce_command_contract(&ctx).unwrap();
        commands
            .build
            .call(&ctx, &crate::CommandArgs::default())
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_duplicate_names_rejected_before_setup() {
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        let plugins = vec![
            Plugin::builder("dup")
                .with_setup(move |_| {
                    *flag.lock().unwrap() = true;
                    Ok(None)
                })
                .build()
                .unwrap(),
            commands_plugin("other", &["list"]),
            commands_plugin("dup", &["build"]),
        ];

        let err = register_plugins(&site(plugins)).unwrap_err();

        assert!(matches!(err, PluginError::DuplicateName { ref plugin } if plugin == "dup"));
        assert_eq!(
            err.to_string(),
            "Invalid plugin list: plugin `dup` is registered more than once"
        );
        assert!(!*ran.lock().unwrap());
    }
}
