//! Nearest-date boundary search over ascending sequences.
//!
//! [`locate`] answers "which element is closest to this date" in one of two
//! directions:
//!
//! | Direction | Returns | Used for |
//! |-----------|---------|----------|
//! | [`Direction::Floor`] | rightmost index with key `<= target` | window end |
//! | [`Direction::Ceil`] | leftmost index with key `>= target` | window start |
//!
//! When no element qualifies the result is `None`, never a clamped index.
//!
//! # Examples
//!
//! ```
//! use smsexport::core::locate::{locate, Direction};
//! use smsexport::date::DateKey;
//!
//! let days: Vec<DateKey> = [1, 3, 5, 7].into_iter().map(DateKey::new).collect();
//!
//! assert_eq!(locate(&days, DateKey::new(4), Direction::Ceil), Some(2));
//! assert_eq!(locate(&days, DateKey::new(4), Direction::Floor), Some(1));
//!
//! // Exact match is both floor and ceiling
//! assert_eq!(locate(&days, DateKey::new(5), Direction::Ceil), Some(2));
//! assert_eq!(locate(&days, DateKey::new(5), Direction::Floor), Some(2));
//!
//! // Nothing at or before 0
//! assert_eq!(locate(&days, DateKey::new(0), Direction::Floor), None);
//! ```

use std::fmt;

use crate::date::{DateKey, Dated};

/// Which side of the target a located element may lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Closest element at or before the target.
    Floor,
    /// Closest element at or after the target.
    Ceil,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Floor => write!(f, "FLOOR"),
            Direction::Ceil => write!(f, "CEIL"),
        }
    }
}

/// Finds the element of `seq` closest to `target` in `direction`.
///
/// `seq` must be ascending by [`Dated::date_key`]; duplicates are allowed.
/// With duplicates, `Ceil` returns the first of an equal run and `Floor`
/// the last, so a window slice always keeps whole days.
///
/// Runs in `O(log n)` key comparisons.
pub fn locate<T: Dated>(seq: &[T], target: DateKey, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Ceil => {
            let idx = first_not(seq, |key| key < target);
            (idx < seq.len()).then_some(idx)
        }
        Direction::Floor => first_not(seq, |key| key <= target).checked_sub(1),
    }
}

/// Returns the first index whose key fails `before`, or `seq.len()`.
///
/// `before` must hold on a prefix of `seq` and fail on the rest, which is
/// true of `key < t` and `key <= t` over an ascending sequence. Each step
/// halves `lo..hi` and keeps the half that still contains the boundary.
fn first_not<T: Dated>(seq: &[T], before: impl Fn(DateKey) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = seq.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if before(seq[mid].date_key()) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
