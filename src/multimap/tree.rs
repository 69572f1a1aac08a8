//! The [`TreeMultiMap`] type.
//!
//! # Internal Structure
//!
//! The map is an unbalanced binary search tree whose nodes live in an arena
//! and link to their parent by index. Two conventions shape every algorithm:
//!
//! 1. Keys in a node's left subtree are strictly smaller than its key; keys in
//!    its right subtree are greater or equal. Equal keys therefore pile up to
//!    the right in insertion order.
//! 2. As soon as the first entry is inserted, an end marker node is linked as
//!    the rightmost node. It has no key, orders after every key, is never
//!    counted by [`TreeMultiMap::len`], and is the node [`TreeMultiMap::end`]
//!    points at.

use std::borrow::Borrow;
use std::fmt;
use std::io::{self, Write};

use log::{debug, trace};
use smallvec::SmallVec;

use super::arena::{NodeArena, NodeId, Payload, Side};
use super::cursor::{Cursor, CursorMut};
use super::error::InvariantViolation;
use super::iter::{IntoIter, Iter, IterMut, Keys, Values};

// =============================================================================
// TreeMultiMap Definition
// =============================================================================

/// An ordered map that keeps every inserted entry, including entries whose
/// keys compare equal.
///
/// Entries are kept in ascending key order; entries sharing a key keep their
/// insertion order. The tree is not rebalanced, so operations are O(h) where
/// h is the height, which is O(n) for sorted insertion order.
///
/// # Time Complexity
///
/// | Operation              | Complexity |
/// |------------------------|------------|
/// | `new`                  | O(1)       |
/// | `insert`               | O(h)       |
/// | `erase`                | O(k · h)   |
/// | `find`                 | O(h)       |
/// | `equal_range`          | O(h + k)   |
/// | `min`/`max`            | O(h)       |
/// | `begin`/`end`          | O(h)       |
/// | `max_height`           | O(n)       |
/// | `len`                  | O(1)       |
///
/// where k is the number of entries sharing the key.
///
/// # Examples
///
/// ```rust
/// use multitree::multimap::TreeMultiMap;
///
/// let mut map = TreeMultiMap::new();
/// map.insert(5, "a");
/// map.insert(3, "b");
/// map.insert(8, "c");
/// map.insert(3, "d");
///
/// assert_eq!(map.len(), 4);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 3, 5, 8]);
///
/// assert_eq!(map.erase(&3), 2);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![5, 8]);
/// ```
#[derive(Clone)]
pub struct TreeMultiMap<K, V> {
    /// Node storage; owns the root
    arena: NodeArena<K, V>,
    /// Number of entries, end marker excluded
    length: usize,
}

impl<K, V> TreeMultiMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, String> = TreeMultiMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.max_height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            length: 0,
        }
    }

    /// Creates an empty map with room for `capacity` entries before the node
    /// storage reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity.saturating_add(1)),
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every entry and the end marker, leaving a map that behaves as
    /// if freshly created.
    pub fn clear(&mut self) {
        trace!("clearing {} entries", self.length);
        self.arena.clear();
        self.length = 0;
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// The end marker counts as a node, so a map built from the ascending
    /// keys `1..=5` has height 6. A map that never held an entry has height 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, ()> = (1..=5).map(|key| (key, ())).collect();
    /// assert_eq!(map.max_height(), 6);
    /// ```
    #[must_use]
    pub fn max_height(&self) -> usize {
        self.arena.height()
    }

    // -------------------------------------------------------------------------
    // Cursors
    // -------------------------------------------------------------------------

    /// Returns a cursor at the first entry, or at [`Self::end`] if there is
    /// none.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.arena, self.leftmost())
    }

    /// Returns a cursor at the end marker.
    ///
    /// The end marker is a real node: stepping back from it reaches the last
    /// entry. On a map that never held an entry this is the "no position"
    /// cursor, equal to [`Self::begin`].
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.arena, self.rightmost())
    }

    /// Mutable counterpart of [`Self::begin`].
    #[must_use]
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.leftmost();
        CursorMut::new(&mut self.arena, node)
    }

    /// Mutable counterpart of [`Self::end`].
    #[must_use]
    pub fn end_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.rightmost();
        CursorMut::new(&mut self.arena, node)
    }

    /// Returns a cursor at the entry with the smallest key, or [`Self::end`]
    /// when the map has no entries.
    #[must_use]
    pub fn min(&self) -> Cursor<'_, K, V> {
        self.begin()
    }

    /// Returns a cursor at the entry with the largest key (the last one
    /// inserted among equal keys), or [`Self::end`] when the map has no
    /// entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, &str> =
    ///     [(3, "x"), (1, "y"), (3, "z")].into_iter().collect();
    /// assert_eq!(map.max().entry(), Some((&3, &"z")));
    /// assert_eq!(map.min().entry(), Some((&1, &"y")));
    /// ```
    #[must_use]
    pub fn max(&self) -> Cursor<'_, K, V> {
        let last = self
            .rightmost()
            .and_then(|end| self.arena.predecessor(end));
        match last {
            Some(_) => Cursor::new(&self.arena, last),
            None => self.end(),
        }
    }

    fn leftmost(&self) -> Option<NodeId> {
        self.arena.root().map(|root| self.arena.leftmost(root))
    }

    fn rightmost(&self) -> Option<NodeId> {
        self.arena.root().map(|root| self.arena.rightmost(root))
    }

    // -------------------------------------------------------------------------
    // Iteration
    // -------------------------------------------------------------------------

    /// Returns an iterator over entries in key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.length)
    }

    /// Returns an iterator over entries in key order with mutable values.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let ids = self.arena.in_order_ids();
        IterMut::new(&mut self.arena, &ids)
    }

    /// Returns an iterator over keys in order, one per entry.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over values in key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    // -------------------------------------------------------------------------
    // Debug dump
    // -------------------------------------------------------------------------

    /// Writes every entry as `[key: value] ` in ascending key order, followed
    /// by a newline. Nothing is written for a map that never held an entry.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `sink`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
    /// let mut out = Vec::new();
    /// map.write_in_order(&mut out).unwrap();
    /// assert_eq!(out, b"[1: a] [2: b] \n");
    /// ```
    pub fn write_in_order<W>(&self, sink: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
        V: fmt::Display,
        W: Write + ?Sized,
    {
        if self.arena.root().is_none() {
            return Ok(());
        }
        for (key, value) in self {
            write!(sink, "[{key}: {value}] ")?;
        }
        writeln!(sink)
    }

    /// Writes the [`Self::write_in_order`] dump to standard output.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing to standard output.
    pub fn print_in_order(&self) -> io::Result<()>
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_in_order(&mut handle)?;
        handle.flush()
    }
}

impl<K: Ord, V> TreeMultiMap<K, V> {
    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Inserts an entry. Existing entries with an equal key are kept; the new
    /// entry is ordered after them.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let mut map = TreeMultiMap::new();
    /// map.insert("k", 1);
    /// map.insert("k", 2);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 2]);
    /// ```
    pub fn insert(&mut self, key: K, value: V) {
        match self.arena.root() {
            None => {
                let root = self.arena.plant_root(Payload::Entry(key, value));
                self.arena.attach(root, Side::Right, Payload::End);
                trace!("planted root with end marker");
            }
            Some(root) => {
                let (parent, side) = self.arena.descend(root, &key);
                if self.arena[parent].payload.is_end() {
                    // New maximum: take the marker's place and keep it rightmost.
                    self.arena.insert_above(parent, Payload::Entry(key, value));
                    trace!("spliced new maximum above end marker");
                } else {
                    self.arena.attach(parent, side, Payload::Entry(key, value));
                }
            }
        }
        self.length += 1;
    }

    /// Removes every entry whose key equals `key` and returns how many were
    /// removed.
    ///
    /// All matches are erased, not just the first; use
    /// [`Self::erase_one`] to remove a single entry.
    ///
    /// # Complexity
    ///
    /// O(k · h), where k is the number of removed entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let mut map: TreeMultiMap<i32, char> =
    ///     [(1, 'a'), (2, 'b'), (1, 'c')].into_iter().collect();
    /// assert_eq!(map.erase(&1), 2);
    /// assert_eq!(map.erase(&7), 0);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = 0;
        while self.unlink_first(key).is_some() {
            removed += 1;
        }
        if removed > 0 {
            debug!("erased {removed} entries, {} remain", self.length);
        }
        removed
    }

    /// Removes the first entry with the given key found on the search path
    /// and returns its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let mut map: TreeMultiMap<i32, char> = [(1, 'a'), (1, 'b')].into_iter().collect();
    /// assert_eq!(map.erase_one(&1), Some('a'));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.erase_one(&9), None);
    /// ```
    pub fn erase_one<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.unlink_first(key).map(|(_, value)| value)
    }

    /// One removal pass: find a node holding `key` and unlink it.
    fn unlink_first<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.search(key)?;
        let target = match (self.arena[found].left, self.arena[found].right) {
            (Some(_), Some(right)) => {
                // The successor has no left child. If it is the end marker the
                // marker moves up into `found`, which is then rightmost.
                let successor = self.arena.leftmost(right);
                self.arena.swap_payloads(found, successor);
                successor
            }
            _ => found,
        };
        let node = &self.arena[target];
        let (parent, child) = (node.parent, node.left.or(node.right));
        self.arena.replace_child(parent, target, child);
        let entry = self.arena.release(target).into_entry();
        if entry.is_some() {
            self.length -= 1;
        }
        entry
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Returns a cursor at the first entry with the given key met while
    /// descending from the root, or [`Self::end`] if there is none.
    ///
    /// With duplicate keys this is not necessarily the first of them in
    /// iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, &str> = [(5, "a"), (3, "b")].into_iter().collect();
    /// assert_eq!(map.find(&3).value(), Some(&"b"));
    /// assert_eq!(map.find(&4), map.end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.arena.search(key) {
            Some(id) => Cursor::new(&self.arena, Some(id)),
            None => self.end(),
        }
    }

    /// Mutable counterpart of [`Self::find`].
    #[must_use]
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.arena.search(key).or_else(|| self.rightmost());
        CursorMut::new(&mut self.arena, node)
    }

    /// Returns the value of the entry [`Self::find`] lands on.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).value()
    }

    /// Returns a mutable reference to the value of the entry
    /// [`Self::find_mut`] lands on.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_mut(key).into_value_mut()
    }

    /// Returns `true` if some entry has the given key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.arena.search(key).is_some()
    }

    /// Returns the half-open cursor pair `[lower, upper)` around the run of
    /// entries with the given key that starts at [`Self::find`].
    ///
    /// `upper` is found by stepping forward from `lower` while the key still
    /// matches, so entries with this key that are not contiguous with
    /// `lower` in iteration order are not covered. For an absent key both
    /// cursors are [`Self::end`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, &str> =
    ///     [(5, "a"), (3, "b"), (8, "c"), (3, "d")].into_iter().collect();
    ///
    /// let (lower, upper) = map.equal_range(&3);
    /// assert_eq!(lower.key(), Some(&3));
    /// assert_eq!(upper.key(), Some(&5));
    /// assert_eq!(lower.until(upper).count(), 2);
    /// ```
    #[must_use]
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor<'_, K, V>, Cursor<'_, K, V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let lower = self.find(key);
        let mut upper = lower;
        while upper.key().is_some_and(|found| found.borrow() == key) {
            upper.move_next();
        }
        (lower, upper)
    }

    /// Returns an iterator with mutable values over the same run that
    /// [`Self::equal_range`] brackets.
    #[must_use]
    pub fn equal_range_mut<Q>(&mut self, key: &Q) -> IterMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ids = self.run_ids(key);
        IterMut::new(&mut self.arena, &ids)
    }

    /// Returns the number of entries in the run [`Self::equal_range`]
    /// brackets.
    #[must_use]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (lower, upper) = self.equal_range(key);
        lower.until(upper).count()
    }

    fn run_ids<Q>(&self, key: &Q) -> SmallVec<[NodeId; 8]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ids = SmallVec::new();
        let mut current = self.arena.search(key);
        while let Some(id) = current {
            match self.arena[id].payload.key() {
                Some(found) if found.borrow() == key => ids.push(id),
                _ => break,
            }
            current = self.arena.successor(id);
        }
        ids
    }

    /// Returns a cursor at the entry holding the smallest value within the
    /// run [`Self::equal_range`] brackets, or [`Self::end`] if the key is
    /// absent. Ties go to the later entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<&str, i32> =
    ///     [("k", 7), ("k", 2), ("k", 9), ("z", 0)].into_iter().collect();
    /// assert_eq!(map.min_by_value("k").value(), Some(&2));
    /// assert_eq!(map.max_by_value("k").value(), Some(&9));
    /// ```
    #[must_use]
    pub fn min_by_value<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: PartialOrd,
    {
        self.extreme_in_run(key, |best, candidate| best < candidate)
    }

    /// Returns a cursor at the entry holding the largest value within the
    /// run [`Self::equal_range`] brackets, or [`Self::end`] if the key is
    /// absent. Ties go to the later entry.
    #[must_use]
    pub fn max_by_value<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: PartialOrd,
    {
        self.extreme_in_run(key, |best, candidate| best > candidate)
    }

    /// Walks the run and keeps the current best while `keeps(best, candidate)`
    /// holds; otherwise the candidate takes over.
    fn extreme_in_run<Q, F>(&self, key: &Q, keeps: F) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: Fn(&V, &V) -> bool,
    {
        let (lower, upper) = self.equal_range(key);
        let mut best = lower;
        let mut cursor = lower;
        cursor.move_next();
        while cursor != upper {
            let (Some(current), Some(candidate)) = (best.value(), cursor.value()) else {
                break;
            };
            if !keeps(current, candidate) {
                best = cursor;
            }
            cursor.move_next();
        }
        best
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Checks the structural invariants of the tree: parent links, search
    /// order, a single rightmost end marker, and the recorded length.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let mut map: TreeMultiMap<i32, i32> = (0..10).map(|key| (key % 3, key)).collect();
    /// map.erase(&1);
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.arena.root() else {
            return if self.length == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::LengthMismatch {
                    recorded: self.length,
                    counted: 0,
                })
            };
        };
        if self.arena[root].parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink { slot: root.index() });
        }

        // Each frame carries the inclusive lower and exclusive upper key bound.
        let mut stack: SmallVec<[(NodeId, Option<&K>, Option<&K>); 32]> = SmallVec::new();
        stack.push((root, None, None));
        let mut counted = 0;
        let mut end_marker = None;
        while let Some((id, lower, upper)) = stack.pop() {
            let node = &self.arena[id];
            match &node.payload {
                Payload::Entry(key, _) => {
                    let below = lower.is_some_and(|lower| key < lower);
                    let above = upper.is_some_and(|upper| key >= upper);
                    if below || above {
                        return Err(InvariantViolation::OrderViolation { slot: id.index() });
                    }
                    counted += 1;
                }
                Payload::End => {
                    if end_marker.replace(id).is_some() {
                        return Err(InvariantViolation::DuplicateEndMarker { slot: id.index() });
                    }
                    if upper.is_some() || node.right.is_some() {
                        return Err(InvariantViolation::EndMarkerNotRightmost { slot: id.index() });
                    }
                }
                Payload::Vacant => {
                    return Err(InvariantViolation::BrokenParentLink { slot: id.index() });
                }
            }
            let key = node.payload.key();
            for (side, child) in [(Side::Left, node.left), (Side::Right, node.right)] {
                let Some(child) = child else { continue };
                if self.arena[child].parent != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink { slot: child.index() });
                }
                match side {
                    Side::Left => stack.push((child, lower, key.or(upper))),
                    Side::Right => stack.push((child, key.or(lower), upper)),
                }
            }
        }

        if end_marker.is_none() {
            return Err(InvariantViolation::MissingEndMarker);
        }
        if counted != self.length {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                counted,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for TreeMultiMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for TreeMultiMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena)
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMultiMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut TreeMultiMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Structural equality: equal lengths and identically shaped trees holding
/// equal entries at matching positions.
///
/// Two maps with the same entries can compare unequal when they were built
/// in different orders; compare `iter()` output for content equality.
///
/// # Examples
///
/// ```rust
/// use multitree::multimap::TreeMultiMap;
///
/// let first: TreeMultiMap<i32, ()> = [(1, ()), (2, ())].into_iter().collect();
/// let second: TreeMultiMap<i32, ()> = [(2, ()), (1, ())].into_iter().collect();
///
/// assert_eq!(first, first.clone());
/// assert_ne!(first, second);
/// assert!(first.iter().eq(second.iter()));
/// ```
impl<K: PartialEq, V: PartialEq> PartialEq for TreeMultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.arena.structurally_equal(&other.arena)
    }
}

impl<K: Eq, V: Eq> Eq for TreeMultiMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMultiMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeMultiMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for TreeMultiMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for entry in self {
            sequence.serialize_element(&entry)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct TreeMultiMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> TreeMultiMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for TreeMultiMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = TreeMultiMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut map = TreeMultiMap::new();
        while let Some((key, value)) = access.next_element::<(K, V)>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for TreeMultiMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(TreeMultiMapVisitor::new())
    }
}

static_assertions::assert_impl_all!(TreeMultiMap<i32, String>: Send, Sync, Clone, Default);

// =============================================================================
// Tests
// =============================================================================
