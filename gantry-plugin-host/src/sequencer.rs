//! Expands a command path into the canonical ordered event sequence.
//!
//! For a resolved node with stages `[s1, s2]` at path `p`, the sequence is
//! `before:p:s1, p:s1, after:p:s1, before:p:s2, p:s2, after:p:s2` — fixed
//! by the node's declaration alone, independent of which plugins happen to
//! bind handlers to those names.

use thiserror::Error;
use tracing::debug;

use gantry_plugin_api::event;

use crate::tree::CommandTree;

/// Failures resolving a command path, raised before any hook executes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No node exists at the given path.
    #[error("command not found: '{path}'")]
    CommandNotFound { path: String },

    /// The node exists but declares no lifecycle events; it only groups
    /// subcommands and cannot be run directly.
    #[error("command '{path}' is a namespace and cannot be run directly")]
    NotRunnable { path: String },
}

impl ResolveError {
    /// The colon-joined path that failed to resolve.
    pub fn path(&self) -> &str {
        match self {
            ResolveError::CommandNotFound { path } | ResolveError::NotRunnable { path } => path,
        }
    }
}

/// Resolve `commands` against `tree` and expand the node's lifecycle
/// stages, in declared order, into their before → stage → after triples.
pub fn resolve(commands: &[String], tree: &CommandTree) -> Result<Vec<String>, ResolveError> {
    let joined = commands.join(":");
    let node = tree
        .get(commands)
        .ok_or_else(|| ResolveError::CommandNotFound {
            path: joined.clone(),
        })?;

    if node.is_namespace() {
        return Err(ResolveError::NotRunnable { path: joined });
    }

    let mut events = Vec::with_capacity(node.lifecycle_events.len() * 3);
    for stage in &node.lifecycle_events {
        events.extend(event::phases(commands, stage));
    }

    debug!(command = %joined, events = events.len(), "command resolved");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_plugin_api::{CommandMap, CommandNode, Plugin};
    use std::sync::Arc;

    struct DeployPlugin;

    impl Plugin for DeployPlugin {
        fn name(&self) -> &str {
            "deploy"
        }

        fn commands(&self) -> CommandMap {
            CommandMap::new()
                .with(
                    CommandNode::new("deploy", "Deploy to the default infrastructure")
                        .lifecycle_events(["resources", "functions"])
                        .subcommand(
                            CommandNode::new(
                                "onpremises",
                                "Deploy to your on-premises infrastructure",
                            )
                            .lifecycle_events(["resources", "functions"]),
                        ),
                )
                .with(CommandNode::new("config", "Configuration commands").subcommand(
                    CommandNode::new("credentials", "Manage credentials").lifecycle_event("store"),
                ))
        }
    }

    fn tree() -> CommandTree {
        CommandTree::build(&[Arc::new(DeployPlugin) as Arc<dyn Plugin>]).unwrap()
    }

    fn path(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_root_command_events_in_order() {
        let events = resolve(&path(&["deploy"]), &tree()).unwrap();
        assert_eq!(
            events,
            [
                "before:deploy:resources",
                "deploy:resources",
                "after:deploy:resources",
                "before:deploy:functions",
                "deploy:functions",
                "after:deploy:functions",
            ]
        );
    }

    #[test]
    fn test_single_stage_yields_exactly_three_events() {
        let events = resolve(&path(&["config", "credentials"]), &tree()).unwrap();
        assert_eq!(
            events,
            [
                "before:config:credentials:store",
                "config:credentials:store",
                "after:config:credentials:store",
            ]
        );
    }

    #[test]
    fn test_nested_command_events_use_full_path() {
        let events = resolve(&path(&["deploy", "onpremises"]), &tree()).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], "before:deploy:onpremises:resources");
        assert_eq!(events[5], "after:deploy:onpremises:functions");
        // The parent's own events never appear.
        assert!(events.iter().all(|e| e.contains("onpremises")));
    }

    #[test]
    fn test_unknown_command_is_not_found() {
        let err = resolve(&path(&["foo"]), &tree()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::CommandNotFound {
                path: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_subcommand_reports_full_path() {
        let err = resolve(&path(&["deploy", "moon"]), &tree()).unwrap_err();
        assert_eq!(err.path(), "deploy:moon");
    }

    #[test]
    fn test_namespace_node_is_not_runnable() {
        let err = resolve(&path(&["config"]), &tree()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotRunnable {
                path: "config".to_string()
            }
        );
    }

    #[test]
    fn test_empty_path_is_not_found() {
        let err = resolve(&[], &tree()).unwrap_err();
        assert!(matches!(err, ResolveError::CommandNotFound { .. }));
    }
}
