//! Help-text rendering from the merged command tree.
//!
//! The engine never decides when help is shown; CLI front-ends call these
//! on request or after a resolution failure. Output order follows the
//! tree's name ordering, so it is stable across runs.

use gantry_plugin_api::CommandNode;

use crate::tree::CommandTree;

/// Render the full command listing for `tree`.
pub fn render_help(tree: &CommandTree) -> String {
    let mut help = String::from("Commands:\n");
    for (_, node) in tree.roots() {
        render_line(&mut help, node, "");
    }
    help
}

fn render_line(out: &mut String, node: &CommandNode, prefix: &str) {
    let display = format!("{}{}", prefix, node.name);
    out.push_str(&format!("  {:<28} {}\n", display, node.usage));
    for (name, spec) in &node.options {
        out.push_str(&format!("      --{:<22} {}\n", name, spec.usage));
    }
    let child_prefix = format!("{} ", display);
    for (_, child) in &node.commands {
        render_line(out, child, &child_prefix);
    }
}

/// Render detailed help for a single resolved command.
pub fn render_command_help(path: &[String], node: &CommandNode) -> String {
    let mut help = format!("{}\n\n{}\n", path.join(" "), node.usage);

    if !node.options.is_empty() {
        help.push_str("\nOPTIONS:\n");
        for (name, spec) in &node.options {
            help.push_str(&format!("  --{:<24} {}\n", name, spec.usage));
        }
    }

    if !node.commands.is_empty() {
        help.push_str("\nSUBCOMMANDS:\n");
        for (name, child) in &node.commands {
            help.push_str(&format!("  {:<26} {}\n", name, child.usage));
        }
    }

    help
}
