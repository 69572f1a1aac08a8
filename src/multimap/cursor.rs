//! Positions inside a [`TreeMultiMap`](super::TreeMultiMap).
//!
//! A cursor names one node and steps to its in-order neighbours by following
//! child and parent links, so no traversal stack is kept. A cursor is in one
//! of three states:
//!
//! - on an entry: `key()`/`value()` return `Some`;
//! - on the end marker (`is_end()`, entry accessors return `None`), which is
//!   what [`end`](super::TreeMultiMap::end) returns for any map that has held
//!   an entry;
//! - at no position, reached by stepping past either edge or by asking a map
//!   that never held an entry. Stepping from no position stays there.
//!
//! Cursors borrow the map, so the map cannot be restructured while one is
//! alive.

use std::fmt;
use std::ptr;

use super::arena::{NodeArena, NodeId};

// =============================================================================
// Cursor
// =============================================================================

/// A read-only position in a [`TreeMultiMap`](super::TreeMultiMap).
///
/// Two cursors are equal when they point at the same node of the same map.
///
/// # Examples
///
/// ```rust
/// use multitree::multimap::TreeMultiMap;
///
/// let map: TreeMultiMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
///
/// let mut cursor = map.begin();
/// assert_eq!(cursor.entry(), Some((&1, &"a")));
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&2));
/// cursor.move_next();
/// assert_eq!(cursor, map.end());
/// assert_eq!(cursor.entry(), None);
/// ```
pub struct Cursor<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    node: Option<NodeId>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) const fn new(arena: &'a NodeArena<K, V>, node: Option<NodeId>) -> Self {
        Self { arena, node }
    }

    pub(crate) const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Returns the key under the cursor.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(key, _)| key)
    }

    /// Returns the value under the cursor.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, value)| value)
    }

    /// Returns the entry under the cursor, or `None` on the end marker or at
    /// no position.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let arena = self.arena;
        self.node.and_then(|id| arena[id].payload.entry())
    }

    /// Returns `true` on the end marker and at no position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none_or(|id| self.arena[id].payload.is_end())
    }

    /// Steps to the in-order successor.
    pub fn move_next(&mut self) {
        self.node = self.node.and_then(|id| self.arena.successor(id));
    }

    /// Steps to the in-order predecessor.
    pub fn move_prev(&mut self) {
        self.node = self.node.and_then(|id| self.arena.predecessor(id));
    }

    /// Returns an iterator over the entries from this cursor up to, but not
    /// including, `upper`.
    ///
    /// Iteration also stops at the end marker, so an `upper` that is not
    /// reachable from `self` yields the rest of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multitree::multimap::TreeMultiMap;
    ///
    /// let map: TreeMultiMap<i32, char> =
    ///     [(1, 'a'), (2, 'b'), (2, 'c'), (3, 'd')].into_iter().collect();
    ///
    /// let (lower, upper) = map.equal_range(&2);
    /// let run: Vec<&char> = lower.until(upper).map(|(_, value)| value).collect();
    /// assert_eq!(run, vec![&'b', &'c']);
    /// ```
    #[must_use]
    pub const fn until(self, upper: Self) -> Span<'a, K, V> {
        Span {
            cursor: self,
            upper: upper.node,
        }
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena) && self.node == other.node
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            None => formatter.write_str("Cursor(none)"),
            Some(_) if self.is_end() => formatter.write_str("Cursor(end)"),
            Some(_) => formatter.debug_tuple("Cursor").field(&self.entry()).finish(),
        }
    }
}

// =============================================================================
// CursorMut
// =============================================================================

/// A position in a [`TreeMultiMap`](super::TreeMultiMap) that can edit the
/// value under it.
///
/// Keys stay read-only: changing one in place could break the search order.
///
/// # Examples
///
/// ```rust
/// use multitree::multimap::TreeMultiMap;
///
/// let mut map: TreeMultiMap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
///
/// let mut cursor = map.begin_mut();
/// while !cursor.is_end() {
///     if let Some(value) = cursor.value_mut() {
///         *value += 1;
///     }
///     cursor.move_next();
/// }
/// assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![11, 21]);
/// ```
pub struct CursorMut<'a, K, V> {
    arena: &'a mut NodeArena<K, V>,
    node: Option<NodeId>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) const fn new(arena: &'a mut NodeArena<K, V>, node: Option<NodeId>) -> Self {
        Self { arena, node }
    }

    /// Returns the key under the cursor.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.node.and_then(|id| self.arena[id].payload.key())
    }

    /// Returns the value under the cursor.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.node
            .and_then(|id| self.arena[id].payload.entry())
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value under the cursor.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.entry_mut().map(|(_, value)| value)
    }

    /// Returns the entry under the cursor with the value mutable.
    pub fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        let id = self.node?;
        self.arena[id].payload.entry_mut()
    }

    /// Converts the cursor into a mutable reference to its value, borrowed
    /// for as long as the map was.
    #[must_use]
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let id = self.node?;
        let arena = self.arena;
        arena[id].payload.entry_mut().map(|(_, value)| value)
    }

    /// Returns `true` on the end marker and at no position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none_or(|id| self.arena[id].payload.is_end())
    }

    /// Steps to the in-order successor.
    pub fn move_next(&mut self) {
        self.node = self.node.and_then(|id| self.arena.successor(id));
    }

    /// Steps to the in-order predecessor.
    pub fn move_prev(&mut self) {
        self.node = self.node.and_then(|id| self.arena.predecessor(id));
    }

    /// Returns a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.arena, self.node)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_cursor(), formatter)
    }
}

// =============================================================================
// Span
// =============================================================================

/// Iterator over the entries between two cursors, created by
/// [`Cursor::until`].
pub struct Span<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    upper: Option<NodeId>,
}

impl<'a, K, V> Iterator for Span<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.node() == self.upper {
            return None;
        }
        let entry = self.cursor.entry()?;
        self.cursor.move_next();
        Some(entry)
    }
}

impl<K, V> std::iter::FusedIterator for Span<'_, K, V> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::TreeMultiMap;
    use rstest::rstest;

    static_assertions::assert_impl_all!(super::Cursor<'static, i32, String>: Copy, Send, Sync);

    #[rstest]
    fn test_stepping_past_edges_reaches_no_position() {
        let map: TreeMultiMap<i32, ()> = [(1, ())].into_iter().collect();

        let mut forward = map.end();
        forward.move_next();
        assert!(forward.is_end());
        assert_ne!(forward, map.end());

        let mut backward = map.begin();
        backward.move_prev();
        assert!(backward.is_end());
        assert_eq!(backward, forward);

        backward.move_prev();
        backward.move_next();
        assert_eq!(backward, forward);
    }

    #[rstest]
    fn test_cursors_from_different_maps_differ() {
        let first: TreeMultiMap<i32, ()> = [(1, ())].into_iter().collect();
        let second = first.clone();
        assert_eq!(first.begin(), first.begin());
        assert_ne!(first.begin(), second.begin());
    }

    #[rstest]
    fn test_span_stops_at_end_marker() {
        let map: TreeMultiMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        let everything: Vec<_> = map.begin().until(map.begin()).collect();
        assert!(everything.is_empty());

        let mut past_end = map.end();
        past_end.move_next();
        let rest: Vec<_> = map.begin().until(past_end).collect();
        assert_eq!(rest, vec![(&1, &1), (&2, &2)]);
    }

    #[rstest]
    fn test_cursor_mut_into_value_mut_outlives_cursor() {
        let mut map: TreeMultiMap<&str, String> = TreeMultiMap::new();
        map.insert("k", "v".to_string());
        if let Some(value) = map.find_mut("k").into_value_mut() {
            value.push('!');
        }
        assert_eq!(map.get("k"), Some(&"v!".to_string()));
    }

    #[rstest]
    fn test_debug_output() {
        let map: TreeMultiMap<i32, char> = [(1, 'x')].into_iter().collect();
        assert_eq!(format!("{:?}", map.begin()), "Cursor(Some((1, 'x')))");
        assert_eq!(format!("{:?}", map.end()), "Cursor(end)");
        assert_eq!(format!("{:?}", TreeMultiMap::<i32, char>::new().end()), "Cursor(none)");
    }
}
