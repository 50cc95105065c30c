use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::tree::{unflatten, FlatMap, ParamNode, ParamTree};
use crate::value::Value;

/// One concrete simulation experiment: a model plus resolved parameter and
/// argument settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    model: String,
    params: FlatMap<Value>,
    args: FlatMap<Value>,
}

impl Experiment {
    /// Creates a descriptor from its resolved parts.
    pub fn new(model: impl Into<String>, params: FlatMap<Value>, args: FlatMap<Value>) -> Self {
        Self {
            model: model.into(),
            params,
            args,
        }
    }

    /// Full model path in dot notation.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model name without its package path.
    pub fn short_model(&self) -> &str {
        self.model
            .rsplit_once('.')
            .map_or(self.model.as_str(), |(_, name)| name)
    }

    /// Flat parameter settings keyed by dotted path.
    pub fn params(&self) -> &FlatMap<Value> {
        &self.params
    }

    /// Command argument settings keyed by argument name.
    pub fn args(&self) -> &FlatMap<Value> {
        &self.args
    }

    /// Parameter modifier, e.g. `(C2(C=80), L(L=16))`.
    pub fn modifier(&self) -> String {
        render_modifier(&self.params)
    }

    /// Model path followed by its modifier.
    pub fn problem(&self) -> String {
        format!("{}{}", self.model, self.modifier())
    }
}

impl Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.problem())
    }
}

/// Renders a flat mapping as nested, parenthesised modifiers.
///
/// `Null` settings are left out, as are groups holding nothing but `Null`
/// settings. An empty mapping renders as an empty string rather than `()`.
pub fn render_modifier(flat: &FlatMap<Value>) -> String {
    render_tree(&unflatten(flat))
}

fn render_tree(tree: &ParamTree<Value>) -> String {
    let elements: Vec<String> = tree
        .iter()
        .filter_map(|(key, node)| match node {
            ParamNode::Branch(children) => {
                let inner = render_tree(children);
                (!inner.is_empty()).then(|| format!("{key}{inner}"))
            }
            ParamNode::Leaf(value) if value.is_null() => None,
            ParamNode::Leaf(value) => Some(format!("{key}={value}")),
        })
        .collect();
    if elements.is_empty() {
        return String::new();
    }
    format!("({})", elements.join(", "))
}
