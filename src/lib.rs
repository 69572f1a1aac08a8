//! # multitree
//!
//! An ordered multimap for Rust backed by an unbalanced binary search tree
//! with parent links.
//!
//! ## Overview
//!
//! [`multimap::TreeMultiMap`] keeps entries sorted by key and, unlike
//! `std::collections::BTreeMap`, keeps every entry when keys repeat. Cursors
//! walk the tree in both directions through parent links, without a
//! traversal stack, and the map always exposes a stable `end()` position.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` as a sequence of `(key, value)` pairs
//!
//! ## Logging
//!
//! Structural events (root creation, end-marker splices, erase counts) are
//! reported through the [`log`](https://docs.rs/log) facade at `trace` and
//! `debug` level. No logger is installed by this crate.
//!
//! ## Example
//!
//! ```rust
//! use multitree::prelude::*;
//!
//! let mut map = TreeMultiMap::new();
//! map.insert(2, "two");
//! map.insert(1, "one");
//! map.insert(2, "deux");
//!
//! let entries: Vec<_> = map.iter().collect();
//! assert_eq!(entries, vec![(&1, &"one"), (&2, &"two"), (&2, &"deux")]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use multitree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::multimap::*;
}

pub mod multimap;
