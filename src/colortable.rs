//! The 64-entry running color hash shared by the encoder and decoder.

use crate::pixel::Pixel;

/// A fixed 64-slot table of recently seen pixels, keyed by
/// [`Pixel::hash`].
#[derive(Clone, Copy, Debug)]
pub struct ColorTable {
    slots: [Pixel; 64],
}

impl ColorTable {
    pub fn new() -> Self {
        ColorTable {
            slots: [Pixel::default(); 64],
        }
    }

    /// The pixel currently occupying slot `idx`.
    #[inline]
    pub fn get(&self, idx: u8) -> Pixel {
        self.slots[idx as usize & 0x3f]
    }

    /// Looks up `p`'s hash slot. If it already holds `p`, returns
    /// `Some(idx)` without mutating the table. Otherwise overwrites the
    /// slot with `p` and returns `None`.
    ///
    /// After any call, `self.get(idx(p)) == p`.
    #[inline]
    pub fn match_put(&mut self, p: Pixel) -> Option<u8> {
        let idx = p.hash();
        if self.slots[idx as usize] == p {
            Some(idx)
        } else {
            self.slots[idx as usize] = p;
            None
        }
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_zero() {
        let table = ColorTable::new();
        for idx in 0..64u8 {
            assert_eq!(table.get(idx), Pixel::new(0, 0, 0, 0));
        }
    }

    #[test]
    fn match_put_hit_does_not_mutate() {
        let mut table = ColorTable::new();
        let p = Pixel::new(1, 2, 3, 255);
        assert_eq!(table.match_put(p), None);
        assert_eq!(table.get(p.hash()), p);

        // Second insert of the same pixel is a hit and doesn't touch the slot.
        assert_eq!(table.match_put(p), Some(p.hash()));
        assert_eq!(table.get(p.hash()), p);
    }

    #[test]
    fn match_put_miss_overwrites_slot() {
        let mut table = ColorTable::new();
        let p = Pixel::new(10, 0, 0, 255);
        table.match_put(p);
        assert_eq!(table.get(p.hash()), p);

        // Invariant: after any call, the slot at idx(p) holds p.
        for r in 0..=255u8 {
            let q = Pixel::new(r, 1, 2, 3);
            table.match_put(q);
            assert_eq!(table.get(q.hash()), q);
        }
    }
}
