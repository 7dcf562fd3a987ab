use super::*;

use crate::node::{Node, EMPTY};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

/// Checks the structural invariants of `node` and everything below it, and
/// returns the node's values in ascending order.
fn validate_node(node: &Node) -> Vec<u32> {
    match node.len {
        0 => {
            assert_eq!(node.min, EMPTY, "empty node must hold the sentinel");
            assert_eq!(node.max, EMPTY, "empty node must hold the sentinel");
            assert!(node.clusters.is_empty(), "empty node must have no clusters");
            assert!(node.summary.is_none(), "empty node must have no summary");
            return Vec::new();
        }
        1 | 2 => {
            assert!(node.clusters.is_empty(), "len <= 2 must not use clusters");
            assert!(node.summary.is_none(), "len <= 2 must not use a summary");
        }
        _ => {}
    }

    assert!(node.max < node.bound(), "max outside universe");
    if node.len == 1 {
        assert_eq!(node.min, node.max);
        return vec![node.min];
    }
    assert!(node.min < node.max, "min must be below max");
    if node.len == 2 {
        return vec![node.min, node.max];
    }

    let summary = node
        .summary
        .as_deref()
        .expect("len >= 3 requires a summary");
    assert_eq!(summary.bound(), node.row_count(), "summary universe");

    let mut indices: Vec<u32> = node.clusters.keys().copied().collect();
    indices.sort_unstable();
    assert_eq!(
        validate_node(summary),
        indices,
        "summary must hold exactly the populated cluster indices"
    );

    let mut values = vec![node.min];
    for &high in &indices {
        let cluster = &node.clusters[&high];
        assert_eq!(cluster.bound(), node.cluster_size(), "cluster universe");
        assert!(!cluster.is_empty(), "empty cluster must be pruned");
        values.extend(
            validate_node(cluster)
                .into_iter()
                .map(|low| (high << node.shift()) | low),
        );
    }
    values.push(node.max);

    assert_eq!(values.len(), node.len as usize, "len must count every value");
    assert!(
        values.windows(2).all(|w| w[0] < w[1]),
        "extremes must bracket the clustered values"
    );
    values
}

fn validate_tree(t: &VebTree) {
    let values = validate_node(&t.root);
    assert_eq!(values.len(), t.len());
    assert_eq!(t.iter().collect::<Vec<_>>(), values);
}

const BOUND: u32 = 1 << 10;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0..BOUND")] u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0..BOUND")] u32),
    Contains(#[proptest(strategy = "0..BOUND")] u32),
    Next(#[proptest(strategy = "0..BOUND")] u32),
    Prev(#[proptest(strategy = "0..BOUND")] u32),
}

fn varied_bound_strategy() -> impl Strategy<Value = (u32, Vec<(bool, u32)>)> {
    (1u32..=5_000).prop_flat_map(|bound| {
        (
            Just(bound),
            prop::collection::vec((any::<bool>(), 0..bound), 0..=500),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_btreeset(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut t = VebTree::new(BOUND);
        let mut m: BTreeSet<u32> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(x) => {
                    prop_assert_eq!(t.insert(x), m.insert(x));
                }
                Op::Remove(x) => {
                    prop_assert_eq!(t.remove(x), m.remove(&x));
                }
                Op::Contains(x) => {
                    prop_assert_eq!(t.contains(x), m.contains(&x));
                }
                Op::Next(x) => {
                    prop_assert_eq!(t.next(x), m.range(x..).next().copied());
                }
                Op::Prev(x) => {
                    prop_assert_eq!(t.prev(x), m.range(..=x).next_back().copied());
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<u32> = t.iter().collect();
        let expected: Vec<u32> = m.iter().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_varied_bounds((bound, ops) in varied_bound_strategy()) {
        let mut t = VebTree::new(bound);
        let mut m: BTreeSet<u32> = BTreeSet::new();

        for (insert, x) in ops {
            if insert {
                prop_assert_eq!(t.insert(x), m.insert(x));
            } else {
                prop_assert_eq!(t.remove(x), m.remove(&x));
            }
        }

        validate_tree(&t);
        prop_assert_eq!(t.min(), m.first().copied());
        prop_assert_eq!(t.max(), m.last().copied());
        for &x in &m {
            if x + 1 < bound {
                prop_assert_eq!(t.next(x + 1), m.range(x + 1..).next().copied());
            }
            if x > 0 {
                prop_assert_eq!(t.prev(x - 1), m.range(..x).next_back().copied());
            }
        }

        for x in m.clone() {
            prop_assert!(t.remove(x));
        }
        validate_tree(&t);
        prop_assert!(t.is_empty());
    }
}

#[test]
fn exhaustive_small_universes() {
    for bound in 1..=10u32 {
        for mask in 0u32..(1 << bound) {
            let mut t = VebTree::new(bound);
            let members: BTreeSet<u32> = (0..bound).filter(|&x| (mask >> x) & 1 == 1).collect();
            for &x in &members {
                assert!(t.insert(x));
            }
            validate_tree(&t);

            for x in 0..bound {
                let ctx = format!("bound={bound} mask={mask:#b} x={x}");
                assert_eq!(t.contains(x), members.contains(&x), "contains: {ctx}");
                assert_eq!(t.next(x), members.range(x..).next().copied(), "next: {ctx}");
                assert_eq!(
                    t.prev(x),
                    members.range(..=x).next_back().copied(),
                    "prev: {ctx}"
                );
            }

            for &x in members.iter().rev() {
                assert!(t.remove(x));
                validate_tree(&t);
            }
            assert!(t.is_empty());
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(
        items: &[T],
        used: &mut [bool],
        out: &mut Vec<T>,
        f: &mut impl FnMut(Vec<T>),
    ) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// Values chosen to share clusters at the root (0/1/7, 8/9) and below.
const ORDER_KEYS: [u32; 7] = [0, 1, 7, 8, 9, 40, 63];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&ORDER_KEYS, |perm| {
        let mut t = VebTree::new(64);
        for (i, &x) in perm.iter().enumerate() {
            assert!(t.insert(x));
            assert_eq!(t.len(), i + 1);
            validate_tree(&t);
        }
        assert_eq!(t.iter().collect::<Vec<_>>(), ORDER_KEYS.to_vec());
        for x in perm {
            assert!(!t.insert(x));
        }
        assert_eq!(t.len(), ORDER_KEYS.len());
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base = VebTree::new(64);
    base.extend(ORDER_KEYS);

    for_each_permutation(&ORDER_KEYS, |perm| {
        let mut t = base.clone();
        let mut m: BTreeSet<u32> = ORDER_KEYS.into_iter().collect();

        for x in perm {
            assert_eq!(t.remove(x), m.remove(&x));
            assert!(!t.remove(x));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
            let expected: Vec<u32> = m.iter().copied().collect();
            assert_eq!(t.iter().collect::<Vec<_>>(), expected);
        }
        assert!(t.is_empty());
        assert!(t.root.clusters.is_empty());
        assert!(t.root.summary.is_none());
    });
}
