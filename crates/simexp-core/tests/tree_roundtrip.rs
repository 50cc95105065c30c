use proptest::prelude::*;
use simexp_core::{flatten, unflatten, ParamNode, ParamTree};

const KEY: &str = "[a-zA-Z][a-zA-Z0-9_]{0,3}";

fn tree_strategy() -> impl Strategy<Value = ParamTree<i64>> {
    let leaf = any::<i64>().prop_map(ParamNode::Leaf);
    let node = leaf.prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec((KEY, inner), 1..4)
            .prop_map(|entries| ParamNode::Branch(entries.into_iter().collect()))
    });
    prop::collection::vec((KEY, node), 0..5).prop_map(|entries| entries.into_iter().collect())
}

fn count_leaves(tree: &ParamTree<i64>) -> usize {
    tree.values()
        .map(|node| match node {
            ParamNode::Branch(children) => count_leaves(children),
            ParamNode::Leaf(_) => 1,
        })
        .sum()
}

proptest! {
    #[test]
    fn unflatten_inverts_flatten(tree in tree_strategy()) {
        let flat = flatten(tree.clone()).unwrap();
        prop_assert_eq!(flat.len(), count_leaves(&tree));
        prop_assert_eq!(unflatten(&flat), tree);
    }

    #[test]
    fn flatten_is_idempotent(tree in tree_strategy()) {
        let flat = flatten(tree).unwrap();
        let as_tree: ParamTree<i64> = flat
            .iter()
            .map(|(key, value)| (key.clone(), ParamNode::Leaf(*value)))
            .collect();
        prop_assert_eq!(flatten(as_tree).unwrap(), flat);
    }
}

#[test]
fn nested_and_dotted_specs_agree() {
    let nested: ParamTree<i64> =
        serde_json::from_str(r#"{"axis": {"motor": {"i_max": 5, "Ra": {"R": 200}}}}"#)
            .expect("nested");
    let dotted: ParamTree<i64> =
        serde_json::from_str(r#"{"axis.motor.i_max": 5, "axis.motor.Ra.R": 200}"#)
            .expect("dotted");
    assert_eq!(flatten(nested).unwrap(), flatten(dotted).unwrap());
}
