use alloc::vec::Vec;

/// Per-slot record of which imaginary components are structurally zero.
///
/// Every slot starts zero (real input). A slot turns live once a butterfly writes
/// a non-zero imaginary value into it and never turns back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroTracker {
    zero: Vec<bool>,
}

impl ZeroTracker {
    pub fn new(slots: usize) -> Self {
        Self {
            zero: alloc::vec![true; slots],
        }
    }

    #[inline]
    pub fn is_zero(&self, slot: usize) -> bool {
        self.zero[slot]
    }

    #[inline]
    pub fn is_live(&self, slot: usize) -> bool {
        !self.is_zero(slot)
    }

    /// Returns `true` when the slot was zero until now, i.e. a declaration is due.
    pub fn mark_live(&mut self, slot: usize) -> bool {
        core::mem::replace(&mut self.zero[slot], false)
    }

    pub fn live_count(&self) -> usize {
        self.zero.iter().filter(|zero| !**zero).count()
    }

    pub fn slots(&self) -> usize {
        self.zero.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_all_zero() {
        let tracker = ZeroTracker::new(8);
        assert_eq!(tracker.slots(), 8);
        assert_eq!(tracker.live_count(), 0);
        assert!((0..8).all(|slot| tracker.is_zero(slot)));
    }

    #[test]
    fn test_mark_live_is_idempotent() {
        let mut tracker = ZeroTracker::new(4);
        assert!(tracker.mark_live(2));
        assert!(!tracker.mark_live(2));
        assert!(tracker.is_live(2));
        assert!(tracker.is_zero(1));
        assert_eq!(tracker.live_count(), 1);
    }

    #[test]
    #[should_panic]
    fn test_slot_out_of_range() {
        let tracker = ZeroTracker::new(4);
        tracker.is_zero(4);
    }
}
