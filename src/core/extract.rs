//! Slicing a fetched batch down to the requested window.
//!
//! Sources return newest first; exports are written oldest first. This
//! module flips the batch, locates both window edges with
//! [`locate`](super::locate::locate) and keeps the inclusive slice between
//! them.
//!
//! An empty result is a normal outcome: the window may fall in a gap
//! between two records or outside the fetched data entirely.

use std::ops::RangeInclusive;

use super::locate::{Direction, locate};
use crate::date::{Dated, Window};

/// Index range of `seq` covered by `window`, or `None` if empty.
///
/// `seq` must be ascending. The start edge is the ceiling of
/// `window.start()`, the end edge the floor of `window.end()`.
pub fn bounds<T: Dated>(seq: &[T], window: &Window) -> Option<RangeInclusive<usize>> {
    let first = locate(seq, window.start(), Direction::Ceil)?;
    let last = locate(seq, window.end(), Direction::Floor)?;
    (first <= last).then_some(first..=last)
}

/// Borrows the part of an ascending `seq` that lies within `window`.
///
/// # Examples
///
/// ```
/// use smsexport::core::extract::extract_ascending;
/// use smsexport::date::{DateKey, Window};
///
/// # fn main() -> smsexport::Result<()> {
/// let days: Vec<DateKey> = [1, 3, 5, 7, 9, 11].into_iter().map(DateKey::new).collect();
/// let window = Window::new(4, 8)?;
///
/// assert_eq!(extract_ascending(&days, &window), &[DateKey::new(5), DateKey::new(7)]);
/// # Ok(())
/// # }
/// ```
pub fn extract_ascending<'a, T: Dated>(seq: &'a [T], window: &Window) -> &'a [T] {
    match bounds(seq, window) {
        Some(range) => &seq[range],
        None => &[],
    }
}

/// Turns a newest-first batch into the ascending slice within `window`.
///
/// Consumes the batch and reuses its allocation.
pub fn extract<T: Dated>(mut batch: Vec<T>, window: &Window) -> Vec<T> {
    batch.reverse();
    match bounds(&batch, window) {
        Some(range) => {
            let (first, last) = range.into_inner();
            batch.truncate(last + 1);
            batch.drain(..first);
            batch
        }
        None => Vec::new(),
    }
}
