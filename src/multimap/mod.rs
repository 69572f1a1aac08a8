//! Ordered multimap on a parent-linked binary search tree.
//!
//! This module provides [`TreeMultiMap`], a mutable ordered map that keeps
//! every inserted entry, including entries whose keys compare equal.
//!
//! - [`TreeMultiMap`]: the map itself
//! - [`Cursor`] / [`CursorMut`]: positions that step forwards and backwards
//!   through the entries by following parent links
//! - [`Iter`], [`IterMut`], [`IntoIter`], [`Keys`], [`Values`], [`Span`]:
//!   iterators in key order
//! - [`InvariantViolation`]: the error reported by [`TreeMultiMap::validate`]
//!
//! # Cursors and the end marker
//!
//! Once a map has held an entry it always contains one extra node, the end
//! marker, linked as its rightmost node. [`TreeMultiMap::end`] points at that
//! node, so stepping backwards from `end()` reaches the last entry, and a
//! failed lookup returns `end()`.
//!
//! ```rust
//! use multitree::multimap::TreeMultiMap;
//!
//! let map: TreeMultiMap<i32, &str> =
//!     [(5, "a"), (3, "b"), (8, "c"), (3, "d")].into_iter().collect();
//!
//! let mut cursor = map.end();
//! let mut keys = Vec::new();
//! loop {
//!     cursor.move_prev();
//!     match cursor.key() {
//!         Some(key) => keys.push(*key),
//!         None => break,
//!     }
//! }
//! assert_eq!(keys, vec![8, 5, 3, 3]);
//! assert_eq!(map.find(&4), map.end());
//! ```
//!
//! # Duplicate keys
//!
//! Equal keys are stored in insertion order. [`TreeMultiMap::erase`] removes
//! all of them, [`TreeMultiMap::erase_one`] removes one, and
//! [`TreeMultiMap::equal_range`] brackets the run that starts where the search
//! for the key first hits.
//!
//! ```rust
//! use multitree::multimap::TreeMultiMap;
//!
//! let mut map = TreeMultiMap::new();
//! map.insert("apple", 3);
//! map.insert("pear", 1);
//! map.insert("apple", 5);
//!
//! assert_eq!(map.count("apple"), 2);
//! assert_eq!(map.max_by_value("apple").value(), Some(&5));
//! assert_eq!(map.erase("apple"), 2);
//! assert_eq!(map.len(), 1);
//! ```

mod arena;
mod cursor;
mod error;
mod iter;
mod tree;

pub use cursor::{Cursor, CursorMut, Span};
pub use error::InvariantViolation;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values};
pub use tree::TreeMultiMap;
