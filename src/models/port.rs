//! Port model.
//!
//! A port is a capacity pool. Flows admitted to a port consume part of its
//! bandwidth until they complete.

use serde::{Deserialize, Serialize};

/// A capacity-limited sender.
///
/// `remaining` stays within `0..=capacity`: it only decreases through
/// [`try_admit`](Port::try_admit) and only increases through
/// [`release`](Port::release).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Unique port identifier.
    pub id: u32,
    /// Total bandwidth.
    pub capacity: u64,
    remaining: u64,
}

impl Port {
    /// Creates an idle port.
    pub fn new(id: u32, capacity: u64) -> Self {
        Self {
            id,
            capacity,
            remaining: capacity,
        }
    }

    /// Unused bandwidth.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Bandwidth currently held by in-flight flows.
    #[inline]
    pub fn in_use(&self) -> u64 {
        self.capacity - self.remaining
    }

    /// Whether nothing is in flight on this port.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.remaining == self.capacity
    }

    /// Whether `bandwidth` fits in the remaining capacity.
    #[inline]
    pub fn fits(&self, bandwidth: u64) -> bool {
        bandwidth <= self.remaining
    }

    /// Reserves `bandwidth`. Returns `false` (and changes nothing) if it
    /// exceeds the remaining capacity.
    pub fn try_admit(&mut self, bandwidth: u64) -> bool {
        if !self.fits(bandwidth) {
            return false;
        }
        self.remaining -= bandwidth;
        true
    }

    /// Returns `bandwidth` to the pool.
    ///
    /// The caller guarantees that the released amount was previously
    /// admitted; the result is clamped to `capacity` regardless.
    pub fn release(&mut self, bandwidth: u64) {
        debug_assert!(
            self.remaining + bandwidth <= self.capacity,
            "port {}: release of {} overflows capacity {}",
            self.id,
            bandwidth,
            self.capacity
        );
        self.remaining = self.remaining.saturating_add(bandwidth).min(self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_port_is_idle() {
        let p = Port::new(3, 10);
        assert_eq!(p.remaining(), 10);
        assert_eq!(p.in_use(), 0);
        assert!(p.is_idle());
    }

    #[test]
    fn test_admit_and_release() {
        let mut p = Port::new(0, 10);
        assert!(p.try_admit(6));
        assert_eq!(p.remaining(), 4);
        assert!(!p.is_idle());

        // Does not fit; state unchanged
        assert!(!p.try_admit(5));
        assert_eq!(p.remaining(), 4);

        assert!(p.try_admit(4));
        assert_eq!(p.remaining(), 0);

        p.release(6);
        assert_eq!(p.remaining(), 6);
        p.release(4);
        assert!(p.is_idle());
    }

    #[test]
    fn test_fits_boundary() {
        let p = Port::new(0, 5);
        assert!(p.fits(5));
        assert!(!p.fits(6));
    }
}
