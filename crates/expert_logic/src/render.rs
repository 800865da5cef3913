//! Text rendering of justification trees.

use crate::config::Config;
use crate::facts::TruthValue;
use crate::proof::{Polarity, ProofNode};

/// Options controlling [`render_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Nodes deeper than this are collapsed into their value. The root is at
    /// depth 0.
    pub max_depth: Option<usize>,
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_depth: config.render_depth,
        }
    }
}

/// Renders a tree as an indented diagram, one node per line.
///
/// ```text
/// C ✅
/// └── AND ✅
///     ├── A ✅
///     └── !B ❌
/// ```
pub fn render_tree(tree: &ProofNode, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&node_line(tree));
    out.push('\n');
    write_children(&mut out, tree, "", 1, options);
    out
}

fn write_children(
    out: &mut String,
    node: &ProofNode,
    prefix: &str,
    depth: usize,
    options: &RenderOptions,
) {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let collapsed;
        let child = match options.max_depth {
            Some(max) if depth > max => return,
            Some(max) if depth == max && !child.children().is_empty() => {
                collapsed = child.collapse();
                &collapsed
            }
            _ => child,
        };

        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&node_line(child));
        out.push('\n');

        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        write_children(out, child, &child_prefix, depth + 1, options);
    }
}

fn node_line(node: &ProofNode) -> String {
    let marker = match node.polarity {
        Polarity::Direct => "",
        Polarity::Inverted => "!",
    };
    let suffix = match node.value {
        TruthValue::True => "✅",
        TruthValue::False => "❌",
        TruthValue::Unknown => "??",
    };
    format!("{}{} {}", marker, node.label(), suffix)
}
