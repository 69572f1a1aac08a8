//! Node storage for [`TreeMultiMap`](super::TreeMultiMap).
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. A node
//! owns its children through the arena; the parent link is a plain index
//! that is only ever used to walk upwards. Freed slots are recycled through a
//! free list, so ids stay stable for as long as the node they name is linked.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

/// Inline capacity of the explicit work stacks used by the iterative walks.
const WORK_STACK_INLINE: usize = 32;

// =============================================================================
// Node Definition
// =============================================================================

/// Index of a node inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

/// What a slot holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Payload<K, V> {
    /// A caller-visible key-value pair.
    Entry(K, V),
    /// The end marker: orders after every key and is always the rightmost node.
    End,
    /// A released slot waiting on the free list.
    Vacant,
}

impl<K, V> Payload<K, V> {
    pub(crate) const fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub(crate) const fn key(&self) -> Option<&K> {
        match self {
            Self::Entry(key, _) => Some(key),
            Self::End | Self::Vacant => None,
        }
    }

    pub(crate) const fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Self::Entry(key, value) => Some((key, value)),
            Self::End | Self::Vacant => None,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Self::Entry(key, value) => Some((&*key, value)),
            Self::End | Self::Vacant => None,
        }
    }

    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Self::Entry(key, value) => Some((key, value)),
            Self::End | Self::Vacant => None,
        }
    }
}

/// A tree vertex.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) payload: Payload<K, V>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    const fn new(payload: Payload<K, V>, parent: Option<NodeId>) -> Self {
        Self {
            payload,
            parent,
            left: None,
            right: None,
        }
    }

    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    const fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

// =============================================================================
// NodeArena Definition
// =============================================================================

/// Flat storage for every node of one tree, plus the root id.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: None,
        }
    }

    pub(crate) const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of linked nodes, end marker included.
    pub(crate) fn linked_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Drops every node. The backing `Vec` is released in a single linear
    /// pass, so a chain-shaped tree never recurses.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            self.nodes.push(node);
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Returns the slot to the free list and hands back what it held.
    pub(crate) fn release(&mut self, id: NodeId) -> Payload<K, V> {
        let node = std::mem::replace(&mut self.nodes[id.0], Node::new(Payload::Vacant, None));
        self.free.push(id);
        node.payload
    }

    /// Creates the first node of an empty tree.
    pub(crate) fn plant_root(&mut self, payload: Payload<K, V>) -> NodeId {
        debug_assert!(self.root.is_none());
        let id = self.allocate(Node::new(payload, None));
        self.root = Some(id);
        id
    }

    /// Allocates a leaf in the empty `side` slot of `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, side: Side, payload: Payload<K, V>) -> NodeId {
        debug_assert!(self[parent].child(side).is_none());
        let id = self.allocate(Node::new(payload, Some(parent)));
        self[parent].set_child(side, Some(id));
        id
    }

    /// Allocates a node that takes `below`'s place in the tree and adopts
    /// `below` as its right child.
    pub(crate) fn insert_above(&mut self, below: NodeId, payload: Payload<K, V>) -> NodeId {
        let parent = self[below].parent;
        let id = self.allocate(Node::new(payload, parent));
        self.replace_child(parent, below, Some(id));
        self[id].right = Some(below);
        self[below].parent = Some(id);
        id
    }

    /// Points whichever slot held `old` (a child slot of `parent`, or the root)
    /// at `new`, and fixes `new`'s parent link.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(parent) if self[parent].left == Some(old) => self[parent].left = new,
            Some(parent) => self[parent].right = new,
        }
        if let Some(new) = new {
            self[new].parent = parent;
        }
    }

    pub(crate) fn swap_payloads(&mut self, first: NodeId, second: NodeId) {
        let taken = std::mem::replace(&mut self[first].payload, Payload::Vacant);
        let displaced = std::mem::replace(&mut self[second].payload, taken);
        self[first].payload = displaced;
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    /// In-order successor, walking parent links when there is no right subtree.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self[id].right {
            return Some(self.leftmost(right));
        }
        let mut current = id;
        let mut parent = self[id].parent;
        while let Some(up) = parent {
            if self[up].right != Some(current) {
                break;
            }
            current = up;
            parent = self[up].parent;
        }
        parent
    }

    /// In-order predecessor; the mirror image of [`Self::successor`].
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self[id].left {
            return Some(self.rightmost(left));
        }
        let mut current = id;
        let mut parent = self[id].parent;
        while let Some(up) = parent {
            if self[up].left != Some(current) {
                break;
            }
            current = up;
            parent = self[up].parent;
        }
        parent
    }

    /// Every linked node in order, end marker last.
    pub(crate) fn in_order_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.linked_count());
        let mut current = self.root.map(|root| self.leftmost(root));
        while let Some(id) = current {
            ids.push(id);
            current = self.successor(id);
        }
        ids
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub(crate) fn height(&self) -> usize {
        let mut stack: SmallVec<[(NodeId, usize); WORK_STACK_INLINE]> = SmallVec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        let mut deepest = 0;
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self[id];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// Splits the arena into a table of mutable entry references indexed by
    /// slot, then picks them out in the order given by `ids`.
    pub(crate) fn entries_mut_for(&mut self, ids: &[NodeId]) -> Vec<(&K, &mut V)> {
        let mut slots: Vec<Option<(&K, &mut V)>> = self
            .nodes
            .iter_mut()
            .map(|node| node.payload.entry_mut())
            .collect();
        ids.iter()
            .filter_map(|id| slots.get_mut(id.0).and_then(Option::take))
            .collect()
    }

    /// Consumes the arena, yielding entries in order.
    pub(crate) fn into_entries(mut self) -> Vec<(K, V)> {
        let ids = self.in_order_ids();
        ids.into_iter()
            .filter_map(|id| {
                std::mem::replace(&mut self[id].payload, Payload::Vacant).into_entry()
            })
            .collect()
    }
}

impl<K: Ord, V> NodeArena<K, V> {
    /// Walks down from `from` to the empty slot where `key` belongs: left when
    /// `key` is smaller than the node's key or the node is the end marker,
    /// right otherwise. Returns the last node visited and the side of the free
    /// slot.
    pub(crate) fn descend(&self, from: NodeId, key: &K) -> (NodeId, Side) {
        let mut current = from;
        loop {
            let node = &self[current];
            let side = match node.payload.key() {
                Some(node_key) if key >= node_key => Side::Right,
                _ => Side::Left,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return (current, side),
            }
        }
    }

    /// First node on the search path whose key equals `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self[id];
            current = match node.payload.key() {
                None => node.left,
                Some(node_key) => match key.cmp(node_key.borrow()) {
                    Ordering::Less => node.left,
                    Ordering::Equal => return Some(id),
                    Ordering::Greater => node.right,
                },
            };
        }
        None
    }
}

impl<K: PartialEq, V: PartialEq> NodeArena<K, V> {
    /// Deep comparison of two node graphs. Slot numbers and parent links do
    /// not take part; only payloads and the shape of the child links do.
    pub(crate) fn structurally_equal(&self, other: &Self) -> bool {
        let mut stack: SmallVec<[(NodeId, NodeId); WORK_STACK_INLINE]> = SmallVec::new();
        match (self.root, other.root) {
            (None, None) => return true,
            (Some(mine), Some(theirs)) => stack.push((mine, theirs)),
            _ => return false,
        }
        while let Some((mine, theirs)) = stack.pop() {
            let (mine, theirs) = (&self[mine], &other[theirs]);
            if mine.payload != theirs.payload {
                return false;
            }
            for side in [Side::Left, Side::Right] {
                match (mine.child(side), theirs.child(side)) {
                    (None, None) => {}
                    (Some(left), Some(right)) => stack.push((left, right)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Builds a plain BST (no end marker) by repeated descent and attach.
    fn arena_from(keys: &[i32]) -> NodeArena<i32, ()> {
        let mut arena = NodeArena::new();
        for &key in keys {
            match arena.root() {
                None => {
                    arena.plant_root(Payload::Entry(key, ()));
                }
                Some(root) => {
                    let (parent, side) = arena.descend(root, &key);
                    arena.attach(parent, side, Payload::Entry(key, ()));
                }
            }
        }
        arena
    }

    fn keys_in_order(arena: &NodeArena<i32, ()>) -> Vec<i32> {
        arena
            .in_order_ids()
            .into_iter()
            .filter_map(|id| arena[id].payload.key().copied())
            .collect()
    }

    #[rstest]
    fn test_descend_routes_duplicates_right() {
        let arena = arena_from(&[5, 3, 5]);
        let root = arena.root().unwrap();
        let right = arena[root].right.unwrap();
        assert_eq!(arena[right].payload.key(), Some(&5));
        assert_eq!(arena[right].parent, Some(root));
    }

    #[rstest]
    fn test_descend_goes_left_at_end_marker() {
        let mut arena = arena_from(&[5]);
        let root = arena.root().unwrap();
        let end = arena.attach(root, Side::Right, Payload::End);
        assert_eq!(arena.descend(root, &100), (end, Side::Left));
    }

    #[rstest]
    #[case(&[], vec![])]
    #[case(&[4, 2, 6, 1, 3, 5, 7], vec![1, 2, 3, 4, 5, 6, 7])]
    #[case(&[3, 3, 1, 3], vec![1, 3, 3, 3])]
    fn test_successor_walks_in_order(#[case] keys: &[i32], #[case] expected: Vec<i32>) {
        assert_eq!(keys_in_order(&arena_from(keys)), expected);
    }

    #[rstest]
    fn test_predecessor_mirrors_successor() {
        let arena = arena_from(&[4, 2, 6, 1, 3, 5, 7]);
        let mut current = arena.root().map(|root| arena.rightmost(root));
        let mut keys = Vec::new();
        while let Some(id) = current {
            keys.push(*arena[id].payload.key().unwrap());
            current = arena.predecessor(id);
        }
        assert_eq!(keys, vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[1], 1)]
    #[case(&[2, 1, 3], 2)]
    #[case(&[1, 2, 3, 4], 4)]
    fn test_height(#[case] keys: &[i32], #[case] expected: usize) {
        assert_eq!(arena_from(keys).height(), expected);
    }

    #[rstest]
    fn test_release_recycles_slot() {
        let mut arena = arena_from(&[2, 1]);
        let root = arena.root().unwrap();
        let left = arena[root].left.unwrap();
        arena.replace_child(Some(root), left, None);
        assert_eq!(arena.release(left), Payload::Entry(1, ()));
        assert_eq!(arena.linked_count(), 1);

        let reused = arena.attach(root, Side::Right, Payload::Entry(3, ()));
        assert_eq!(reused, left);
        assert_eq!(arena.linked_count(), 2);
    }

    #[rstest]
    fn test_insert_above_takes_parent_slot() {
        let mut arena = arena_from(&[1]);
        let root = arena.root().unwrap();
        let end = arena.attach(root, Side::Right, Payload::End);
        let spliced = arena.insert_above(end, Payload::Entry(2, ()));

        assert_eq!(arena[root].right, Some(spliced));
        assert_eq!(arena[spliced].parent, Some(root));
        assert_eq!(arena[spliced].right, Some(end));
        assert_eq!(arena[end].parent, Some(spliced));
    }

    #[rstest]
    fn test_structural_equality_ignores_slot_numbers() {
        let mut recycled = arena_from(&[9, 2]);
        let root = recycled.root().unwrap();
        let left = recycled[root].left.unwrap();
        recycled.replace_child(Some(root), left, None);
        recycled.release(left);
        recycled.attach(root, Side::Left, Payload::Entry(1, ()));

        assert!(recycled.structurally_equal(&arena_from(&[9, 1])));
        assert!(!recycled.structurally_equal(&arena_from(&[1, 9])));
    }

    #[rstest]
    fn test_search_stops_at_first_match_on_path() {
        let arena = arena_from(&[5, 5, 5]);
        assert_eq!(arena.search(&5), arena.root());
        assert_eq!(arena.search(&4), None);
    }
}
