//! Fallible growth for the buffers filled while decoding.
//!
//! Event lists, tempo maps and timelines grow by doubling. Growth that would
//! overflow `isize::MAX` bytes is rejected before the allocator is asked.

use crate::AllocationError;
use alloc::vec::Vec;

/// Capacity of a buffer's first allocation.
pub(crate) const INITIAL_CAPACITY: usize = 16;

/// Computes the capacity a buffer should grow to.
///
/// Starts from `current` (or [`INITIAL_CAPACITY`] when empty) and doubles
/// until `min_needed` fits. Returns `None` if doubling overflows, or if the
/// resulting allocation of `elem_size`-byte elements cannot be represented.
pub const fn grown_capacity(current: usize, min_needed: usize, elem_size: usize) -> Option<usize> {
    let mut cap = if current == 0 {
        INITIAL_CAPACITY
    } else {
        current
    };
    while cap < min_needed {
        if cap > usize::MAX / 2 {
            return None;
        }
        cap *= 2;
    }
    if elem_size != 0 && cap > isize::MAX as usize / elem_size {
        return None;
    }
    Some(cap)
}

/// Appends `value`, growing the buffer first if it is full.
pub(crate) fn try_push<T>(buf: &mut Vec<T>, value: T) -> Result<(), AllocationError> {
    if buf.len() == buf.capacity() {
        let needed = buf.len().checked_add(1).ok_or(AllocationError::CapacityOverflow(buf.len()))?;
        let cap = grown_capacity(buf.capacity(), needed, core::mem::size_of::<T>())
            .ok_or(AllocationError::CapacityOverflow(needed))?;
        buf.try_reserve_exact(cap - buf.len())
            .map_err(|_| AllocationError::OutOfMemory(cap))?;
    }
    buf.push(value);
    Ok(())
}

/// Creates an empty buffer able to hold `capacity` elements.
pub(crate) fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>, AllocationError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| AllocationError::OutOfMemory(capacity))?;
    Ok(buf)
}

#[test]
fn doubles_from_initial_capacity() {
    use pretty_assertions::assert_eq;
    assert_eq!(grown_capacity(0, 1, 8), Some(INITIAL_CAPACITY));
    assert_eq!(grown_capacity(16, 17, 8), Some(32));
    assert_eq!(grown_capacity(16, 100, 8), Some(128));
    assert_eq!(grown_capacity(64, 64, 8), Some(64));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn rejects_overflowing_growth() {
    use pretty_assertions::assert_eq;
    assert_eq!(grown_capacity(usize::MAX / 2 + 1, usize::MAX, 1), None);
    // fits as a count but not as bytes
    assert_eq!(grown_capacity(1 << 60, 1 << 60, 16), None);
    // zero-sized elements never overflow in bytes
    assert_eq!(grown_capacity(1 << 60, 1 << 60, 0), Some(1 << 60));
}

#[test]
fn push_grows_by_doubling() {
    use pretty_assertions::assert_eq;
    let mut buf: Vec<u32> = Vec::new();
    for i in 0..17 {
        try_push(&mut buf, i).unwrap();
    }
    assert_eq!(buf.len(), 17);
    assert!(buf.capacity() >= 32);
    assert_eq!(buf[16], 16);
}
