//! Error type reported by [`TreeMultiMap::validate`](super::TreeMultiMap::validate).

use std::fmt;

/// A structural invariant of a [`TreeMultiMap`](super::TreeMultiMap) that
/// does not hold.
///
/// Node positions are reported as arena slot numbers, which are only
/// meaningful for diagnostics.
///
/// # Examples
///
/// ```rust
/// use multitree::multimap::InvariantViolation;
///
/// let error = InvariantViolation::LengthMismatch { recorded: 3, counted: 2 };
/// assert_eq!(
///     format!("{error}"),
///     "length mismatch: map records 3 entries but 2 are linked"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The recorded length differs from the number of linked entries.
    LengthMismatch {
        /// Length the map reports through `len()`.
        recorded: usize,
        /// Entries actually reachable from the root.
        counted: usize,
    },
    /// A populated tree has no end marker.
    MissingEndMarker,
    /// More than one end marker is linked.
    DuplicateEndMarker {
        /// Slot of the second marker found.
        slot: usize,
    },
    /// The end marker is not the rightmost node.
    EndMarkerNotRightmost {
        /// Slot of the marker.
        slot: usize,
    },
    /// A child's parent link does not point back at its parent.
    BrokenParentLink {
        /// Slot of the child.
        slot: usize,
    },
    /// A key sits on the wrong side of one of its ancestors.
    OrderViolation {
        /// Slot of the misplaced node.
        slot: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { recorded, counted } => write!(
                formatter,
                "length mismatch: map records {recorded} entries but {counted} are linked"
            ),
            Self::MissingEndMarker => write!(formatter, "populated tree has no end marker"),
            Self::DuplicateEndMarker { slot } => {
                write!(formatter, "second end marker found at slot {slot}")
            }
            Self::EndMarkerNotRightmost { slot } => {
                write!(formatter, "end marker at slot {slot} is not the rightmost node")
            }
            Self::BrokenParentLink { slot } => {
                write!(formatter, "node at slot {slot} has a stale parent link")
            }
            Self::OrderViolation { slot } => {
                write!(formatter, "node at slot {slot} breaks the search order")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InvariantViolation::MissingEndMarker, "populated tree has no end marker")]
    #[case(
        InvariantViolation::OrderViolation { slot: 4 },
        "node at slot 4 breaks the search order"
    )]
    #[case(
        InvariantViolation::BrokenParentLink { slot: 0 },
        "node at slot 0 has a stale parent link"
    )]
    fn test_display(#[case] error: InvariantViolation, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(InvariantViolation::DuplicateEndMarker { slot: 2 });
        assert_eq!(error.to_string(), "second end marker found at slot 2");
    }
}
