//! Command tree node types.
//!
//! A plugin contributes a tree of [`CommandNode`]s. Nodes with declared
//! lifecycle events are directly runnable; nodes without any are pure
//! namespaces that only route to their children.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Usage metadata for a single command option.
///
/// The engine never validates option values; the usage text exists for
/// help rendering by a CLI front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Help text for this option (e.g. "The resource you want to deploy").
    pub usage: String,
}

impl OptionSpec {
    /// Create an option spec from its usage text.
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
        }
    }
}

/// Ordered mapping from command name to node.
///
/// Insertion keys by the node's own `name`, so the map key and the node
/// can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandMap(BTreeMap<String, CommandNode>);

impl CommandMap {
    /// Create an empty command map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, keyed by its name. Returns the previous node with
    /// that name, if any.
    pub fn insert(&mut self, node: CommandNode) -> Option<CommandNode> {
        self.0.insert(node.name.clone(), node)
    }

    /// Builder-style insert.
    pub fn with(mut self, node: CommandNode) -> Self {
        self.insert(node);
        self
    }

    /// Look up a node by name.
    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.0.get(name)
    }

    /// Mutable lookup, used by the host when merging trees.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CommandNode> {
        self.0.get_mut(name)
    }

    /// Remove and return the node with `name`, if present.
    pub fn remove(&mut self, name: &str) -> Option<CommandNode> {
        self.0.remove(name)
    }

    /// Iterate nodes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CommandNode)> {
        self.0.iter()
    }

    /// Command names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of nodes at this level.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this level has no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for CommandMap {
    type Item = (String, CommandNode);
    type IntoIter = std::collections::btree_map::IntoIter<String, CommandNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandMap {
    type Item = (&'a String, &'a CommandNode);
    type IntoIter = std::collections::btree_map::Iter<'a, String, CommandNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<CommandNode> for CommandMap {
    fn from_iter<I: IntoIterator<Item = CommandNode>>(iter: I) -> Self {
        let mut map = Self::new();
        for node in iter {
            map.insert(node);
        }
        map
    }
}

/// One addressable command, possibly nested arbitrarily deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Command name, unique among siblings.
    pub name: String,

    /// Short description for help text; not consumed by the engine.
    #[serde(default)]
    pub usage: String,

    /// Declared lifecycle stages, in execution order. Empty means this
    /// node is a namespace and cannot be run directly.
    #[serde(default)]
    pub lifecycle_events: Vec<String>,

    /// Option name → usage metadata, forwarded to hooks as-is.
    #[serde(default)]
    pub options: BTreeMap<String, OptionSpec>,

    /// Nested subcommands.
    #[serde(default)]
    pub commands: CommandMap,
}

impl CommandNode {
    /// Create a command node with a name and usage line.
    pub fn new(name: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            lifecycle_events: Vec::new(),
            options: BTreeMap::new(),
            commands: CommandMap::new(),
        }
    }

    /// Append one lifecycle stage.
    pub fn lifecycle_event(mut self, stage: impl Into<String>) -> Self {
        self.lifecycle_events.push(stage.into());
        self
    }

    /// Append several lifecycle stages, in order.
    pub fn lifecycle_events<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lifecycle_events
            .extend(stages.into_iter().map(Into::into));
        self
    }

    /// Declare an option with its usage text.
    pub fn option(mut self, name: impl Into<String>, usage: impl Into<String>) -> Self {
        self.options.insert(name.into(), OptionSpec::new(usage));
        self
    }

    /// Add a nested subcommand.
    pub fn subcommand(mut self, node: CommandNode) -> Self {
        self.commands.insert(node);
        self
    }

    /// True when the node declares no lifecycle events and only routes
    /// to children.
    pub fn is_namespace(&self) -> bool {
        self.lifecycle_events.is_empty()
    }
}
