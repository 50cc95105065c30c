//! Conversion between nested parameter trees and flat dotted-path mappings.
//!
//! Parameters may be written either as `{"L.L": 18}` or as `{"L": {"L": 18}}`.
//! Both forms flatten to the same [`FlatMap`], and [`unflatten`] restores the
//! nested form used when rendering modifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SimExpError};

/// Separator between the segments of a parameter path.
pub const SEPARATOR: char = '.';

/// Ordered mapping from dotted path to leaf.
pub type FlatMap<T> = IndexMap<String, T>;

/// Ordered mapping from path segment to subtree or leaf.
pub type ParamTree<T> = IndexMap<String, ParamNode<T>>;

/// Node of a parameter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamNode<T> {
    /// Nested mapping of further segments.
    Branch(ParamTree<T>),
    /// Terminal value.
    Leaf(T),
}

impl<T> ParamNode<T> {
    /// Turns the node into a branch, discarding a previous leaf.
    fn make_branch(&mut self) -> &mut ParamTree<T> {
        if let ParamNode::Leaf(_) = self {
            *self = ParamNode::Branch(ParamTree::new());
        }
        match self {
            ParamNode::Branch(children) => children,
            ParamNode::Leaf(_) => unreachable!("leaf replaced by a branch above"),
        }
    }
}

/// Flattens a nested (or already flat) tree into dotted paths.
///
/// Leaves are emitted depth-first in declaration order. Keys that already
/// contain separators are kept as-is, so a flat mapping comes back unchanged.
/// Empty paths, empty segments and empty nested groups are rejected.
pub fn flatten<T>(tree: ParamTree<T>) -> Result<FlatMap<T>, SimExpError> {
    let mut flat = FlatMap::new();
    flatten_into(None, tree, &mut flat)?;
    Ok(flat)
}

fn flatten_into<T>(
    prefix: Option<&str>,
    tree: ParamTree<T>,
    out: &mut FlatMap<T>,
) -> Result<(), SimExpError> {
    for (key, node) in tree {
        check_path(&key)?;
        let path = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key,
        };
        match node {
            ParamNode::Branch(children) if children.is_empty() => {
                return Err(SimExpError::InvalidDesignInput(
                    ErrorInfo::new("empty-branch", "nested parameter groups must not be empty")
                        .with_context("key", path),
                ));
            }
            ParamNode::Branch(children) => flatten_into(Some(&path), children, out)?,
            ParamNode::Leaf(leaf) => {
                out.insert(path, leaf);
            }
        }
    }
    Ok(())
}

fn check_path(key: &str) -> Result<(), SimExpError> {
    if key.split(SEPARATOR).any(str::is_empty) {
        return Err(SimExpError::InvalidDesignInput(
            ErrorInfo::new("empty-path-segment", "parameter paths must not contain empty segments")
                .with_context("key", key),
        ));
    }
    Ok(())
}

/// Rebuilds the nested tree from dotted paths.
///
/// Intermediate branches are created on demand. When two paths address the
/// same node the later one wins, including a leaf being replaced by a branch
/// or a branch by a leaf.
pub fn unflatten<T: Clone>(flat: &FlatMap<T>) -> ParamTree<T> {
    let mut root = ParamTree::new();
    for (path, leaf) in flat {
        let (parents, name) = match path.rsplit_once(SEPARATOR) {
            Some((parents, name)) => (Some(parents), name),
            None => (None, path.as_str()),
        };
        let mut branch = &mut root;
        for segment in parents.into_iter().flat_map(|p| p.split(SEPARATOR)) {
            branch = branch
                .entry(segment.to_string())
                .or_insert_with(|| ParamNode::Branch(ParamTree::new()))
                .make_branch();
        }
        branch.insert(name.to_string(), ParamNode::Leaf(leaf.clone()));
    }
    root
}
