use std::cmp::Ordering;
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Strict total order over keys, supplied at construction.
pub type KeyOrdering<K> = fn(&K, &K) -> Ordering;

struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Box<Node<K, V>>>,
    right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Binary search tree over exclusively-owned nodes, with no rebalancing.
///
/// Insertion order fixes the shape: inserting keys in sorted order produces
/// a degenerate linear chain. All walks are iterative, so deep chains cannot
/// exhaust the call stack.
pub struct UnbalancedSearchTree<K, V> {
    root: Option<Box<Node<K, V>>>,
    compare: KeyOrdering<K>,
}

impl<K, V> UnbalancedSearchTree<K, V> {
    pub fn new(compare: KeyOrdering<K>) -> Self {
        Self {
            root: None,
            compare,
        }
    }

    /// Empty tree followed by `insert` for every pair in the order given;
    /// a later duplicate key overwrites the earlier value.
    pub fn with_entries(
        compare: KeyOrdering<K>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut tree = Self::new(compare);
        for (key, value) in entries {
            tree.insert(key, value);
        }
        tree
    }

    /// Add-or-update: a new key becomes a leaf at the position the walk
    /// reaches; an existing key has its value overwritten in place, leaving
    /// the shape untouched.
    pub fn insert(&mut self, key: K, value: V) {
        let compare = self.compare;
        let mut current = &mut self.root;
        loop {
            match current {
                None => {
                    *current = Some(Node::leaf(key, value));
                    return;
                }
                Some(node) => match compare(&key, &node.key) {
                    Ordering::Less => current = &mut node.left,
                    Ordering::Greater => current = &mut node.right,
                    Ordering::Equal => {
                        node.value = value;
                        return;
                    }
                },
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let compare = self.compare;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match compare(key, &node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Node count, recomputed by full traversal on every call. The tree
    /// never caches its size; O(n) per call.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut pending = Vec::new();
        if let Some(root) = self.root.as_deref() {
            pending.push(root);
        }
        while let Some(node) = pending.pop() {
            count += 1;
            if let Some(left) = node.left.as_deref() {
                pending.push(left);
            }
            if let Some(right) = node.right.as_deref() {
                pending.push(right);
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Longest root-to-leaf path; 0 for the empty tree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = Vec::new();
        if let Some(root) = self.root.as_deref() {
            pending.push((root, 1));
        }
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            if let Some(left) = node.left.as_deref() {
                pending.push((left, level + 1));
            }
            if let Some(right) = node.right.as_deref() {
                pending.push((right, level + 1));
            }
        }
        deepest
    }

    /// Drops the root; every node becomes unreachable and is reclaimed.
    pub fn clear(&mut self) {
        self.root = None;
    }
}

impl<K: fmt::Debug, V> UnbalancedSearchTree<K, V> {
    /// Strict lookup: fails with `MissingKey` where `get` returns `None`.
    pub fn require(&self, key: &K) -> EngineResult<&V> {
        self.get(key)
            .ok_or_else(|| EngineError::MissingKey(format!("{:?}", key)))
    }
}
