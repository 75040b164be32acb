//! Aggregate command tree merged from every loaded plugin.
//!
//! Plugins may extend each other's commands: two plugins can contribute
//! nodes at the same path, and their lifecycle events, options and child
//! commands are unioned. A genuine disagreement — both plugins declaring a
//! non-empty value for the same attribute with different contents — is a
//! configuration error raised at build time, before any command runs.

use std::collections::btree_map::Entry;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use gantry_plugin_api::{CommandMap, CommandNode, Plugin};

/// Errors raised while merging plugin command trees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Two plugins declared different values for the same attribute of the
    /// same command node.
    #[error("conflicting {attribute} for command '{path}': '{existing}' vs '{incoming}'")]
    AttributeConflict {
        /// Colon-joined path of the node in conflict.
        path: String,
        /// Which attribute disagreed (e.g. `usage`, `option 'resource'`).
        attribute: String,
        existing: String,
        incoming: String,
    },
}

/// Merged, queryable command tree. Built once at startup and read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTree {
    roots: CommandMap,
}

impl CommandTree {
    /// Merge the command maps of `plugins`, in load order, into one tree.
    ///
    /// Pure function of its input: building twice from the same plugin
    /// list yields structurally equal trees.
    pub fn build(plugins: &[Arc<dyn Plugin>]) -> Result<Self, TreeError> {
        let mut roots = CommandMap::new();
        for plugin in plugins {
            let commands = plugin.commands();
            debug!(
                plugin = %plugin.name(),
                commands = commands.len(),
                "merging plugin commands"
            );
            for (_, node) in commands {
                let path = node.name.clone();
                merge_into(&mut roots, node, &path)?;
            }
        }
        Ok(Self { roots })
    }

    /// Look up the node at `path`, walking one token per tree level.
    pub fn get(&self, path: &[String]) -> Option<&CommandNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for token in rest {
            node = node.commands.get(token)?;
        }
        Some(node)
    }

    /// The top-level commands of the merged tree.
    pub fn roots(&self) -> &CommandMap {
        &self.roots
    }

    /// Whether no plugin contributed any command.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn merge_into(map: &mut CommandMap, incoming: CommandNode, path: &str) -> Result<(), TreeError> {
    match map.remove(&incoming.name) {
        Some(mut existing) => {
            merge_node(&mut existing, incoming, path)?;
            map.insert(existing);
        }
        None => {
            map.insert(incoming);
        }
    }
    Ok(())
}

fn merge_node(
    existing: &mut CommandNode,
    incoming: CommandNode,
    path: &str,
) -> Result<(), TreeError> {
    if existing.usage.is_empty() {
        existing.usage = incoming.usage;
    } else if !incoming.usage.is_empty() && incoming.usage != existing.usage {
        return Err(conflict(path, "usage", &existing.usage, &incoming.usage));
    }

    if existing.lifecycle_events.is_empty() {
        existing.lifecycle_events = incoming.lifecycle_events;
    } else if !incoming.lifecycle_events.is_empty()
        && incoming.lifecycle_events != existing.lifecycle_events
    {
        return Err(conflict(
            path,
            "lifecycle events",
            &existing.lifecycle_events.join(", "),
            &incoming.lifecycle_events.join(", "),
        ));
    }

    for (name, spec) in incoming.options {
        match existing.options.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(spec);
            }
            Entry::Occupied(slot) => {
                if slot.get() != &spec {
                    return Err(conflict(
                        path,
                        format!("option '{}'", slot.key()),
                        &slot.get().usage,
                        &spec.usage,
                    ));
                }
            }
        }
    }

    for (_, child) in incoming.commands {
        let child_path = format!("{}:{}", path, child.name);
        merge_into(&mut existing.commands, child, &child_path)?;
    }

    Ok(())
}

fn conflict(
    path: &str,
    attribute: impl Into<String>,
    existing: &str,
    incoming: &str,
) -> TreeError {
    TreeError::AttributeConflict {
        path: path.to_string(),
        attribute: attribute.into(),
        existing: existing.to_string(),
        incoming: incoming.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CommandsPlugin {
        name: &'static str,
        commands: CommandMap,
    }

    impl Plugin for CommandsPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn commands(&self) -> CommandMap {
            self.commands.clone()
        }
    }

    fn plugin(name: &'static str, commands: CommandMap) -> Arc<dyn Plugin> {
        Arc::new(CommandsPlugin { name, commands })
    }

    fn deploy_node() -> CommandNode {
        CommandNode::new("deploy", "Deploy to the default infrastructure")
            .lifecycle_events(["resources", "functions"])
            .option("resource", "The resource you want to deploy")
    }

    #[test]
    fn test_merges_distinct_roots() {
        let plugins = vec![
            plugin("aws", CommandMap::new().with(deploy_node())),
            plugin(
                "info",
                CommandMap::new().with(
                    CommandNode::new("info", "Show service information").lifecycle_event("display"),
                ),
            ),
        ];

        let tree = CommandTree::build(&plugins).unwrap();
        assert_eq!(tree.roots().len(), 2);
        assert!(tree.get(&["deploy".to_string()]).is_some());
        assert!(tree.get(&["info".to_string()]).is_some());
    }

    #[test]
    fn test_plugins_extend_each_others_commands() {
        let base = plugin("aws", CommandMap::new().with(deploy_node()));
        // A second plugin grafts a subcommand and a new option onto the
        // same node without touching its other attributes.
        let extension = plugin(
            "onprem",
            CommandMap::new().with(
                CommandNode::new("deploy", "")
                    .option("function", "The function you want to deploy")
                    .subcommand(
                        CommandNode::new("onpremises", "Deploy to your on-premises infrastructure")
                            .lifecycle_events(["resources", "functions"]),
                    ),
            ),
        );

        let tree = CommandTree::build(&[base, extension]).unwrap();
        let deploy = tree.get(&["deploy".to_string()]).unwrap();

        assert_eq!(deploy.usage, "Deploy to the default infrastructure");
        assert_eq!(deploy.lifecycle_events, vec!["resources", "functions"]);
        assert_eq!(deploy.options.len(), 2);

        let nested = tree
            .get(&["deploy".to_string(), "onpremises".to_string()])
            .unwrap();
        assert_eq!(nested.lifecycle_events, vec!["resources", "functions"]);
    }

    #[test]
    fn test_usage_conflict_is_build_error() {
        let plugins = vec![
            plugin("aws", CommandMap::new().with(deploy_node())),
            plugin(
                "rival",
                CommandMap::new()
                    .with(CommandNode::new("deploy", "Deploy somewhere else entirely")),
            ),
        ];

        let err = CommandTree::build(&plugins).unwrap_err();
        match err {
            TreeError::AttributeConflict {
                path, attribute, ..
            } => {
                assert_eq!(path, "deploy");
                assert_eq!(attribute, "usage");
            }
        }
    }

    #[test]
    fn test_lifecycle_conflict_is_build_error() {
        let plugins = vec![
            plugin("aws", CommandMap::new().with(deploy_node())),
            plugin(
                "rival",
                CommandMap::new()
                    .with(CommandNode::new("deploy", "").lifecycle_event("everything")),
            ),
        ];

        let err = CommandTree::build(&plugins).unwrap_err();
        match err {
            TreeError::AttributeConflict { attribute, .. } => {
                assert_eq!(attribute, "lifecycle events");
            }
        }
    }

    #[test]
    fn test_option_conflict_names_the_option() {
        let plugins = vec![
            plugin("aws", CommandMap::new().with(deploy_node())),
            plugin(
                "rival",
                CommandMap::new()
                    .with(CommandNode::new("deploy", "").option("resource", "Something different")),
            ),
        ];

        let err = CommandTree::build(&plugins).unwrap_err();
        match err {
            TreeError::AttributeConflict {
                path, attribute, ..
            } => {
                assert_eq!(path, "deploy");
                assert_eq!(attribute, "option 'resource'");
            }
        }
    }

    #[test]
    fn test_nested_conflict_reports_full_path() {
        let nested = |usage: &str| {
            CommandMap::new().with(
                CommandNode::new("deploy", "")
                    .subcommand(CommandNode::new("onpremises", usage).lifecycle_event("resources")),
            )
        };
        let plugins = vec![
            plugin("one", nested("On-premises deploy")),
            plugin("two", nested("Rack deploy")),
        ];

        let err = CommandTree::build(&plugins).unwrap_err();
        match err {
            TreeError::AttributeConflict { path, .. } => {
                assert_eq!(path, "deploy:onpremises");
            }
        }
    }

    #[test]
    fn test_empty_attributes_yield_to_filled_ones() {
        // First plugin only reserves the namespace; second fills it in.
        let plugins = vec![
            plugin(
                "skeleton",
                CommandMap::new().with(CommandNode::new("deploy", "")),
            ),
            plugin("aws", CommandMap::new().with(deploy_node())),
        ];

        let tree = CommandTree::build(&plugins).unwrap();
        let deploy = tree.get(&["deploy".to_string()]).unwrap();
        assert_eq!(deploy.usage, "Deploy to the default infrastructure");
        assert_eq!(deploy.lifecycle_events, vec!["resources", "functions"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let plugins = vec![
            plugin("aws", CommandMap::new().with(deploy_node())),
            plugin(
                "extension",
                CommandMap::new().with(
                    CommandNode::new("deploy", "").option("stage", "The stage to deploy to"),
                ),
            ),
        ];

        let first = CommandTree::build(&plugins).unwrap();
        let second = CommandTree::build(&plugins).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_get_unknown_path_is_none() {
        let tree = CommandTree::build(&[plugin("aws", CommandMap::new().with(deploy_node()))])
            .unwrap();

        assert!(tree.get(&["foo".to_string()]).is_none());
        assert!(tree
            .get(&["deploy".to_string(), "foo".to_string()])
            .is_none());
        assert!(tree.get(&[]).is_none());
    }
}
