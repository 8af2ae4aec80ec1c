//! The static finger-pair distance table and hand/orientation rules
//!
//! [`Thresholds`] gives the six nested comfort bands (Practical, Comfort,
//! Relaxed, each with a low and high bound) for the signed distance between
//! two notes played by a given ordered pair of fingers. The base table below
//! is fixed in right-hand orientation, lower finger first; [`thresholds_for`]
//! derives every other orientation from it. The table is built once as a
//! `const fn` match and never mutated, per the project's "global state is a
//! constant" rule.

use crate::finger::Finger;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which hand a [`crate::slice::Hand`] belongs to. Distance is oriented:
/// an "outward" (away from the body, towards higher fingers) motion is
/// positive for the right hand and negative for the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// The six nested distance bounds for an ordered finger pair, in encoding
/// units. `min_*`/`max_*` bound the low and high side of each of the three
/// nested bands (Practical ⊇ Comfort ⊇ Relaxed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min_prac: i32,
    pub min_comf: i32,
    pub min_rel: i32,
    pub max_rel: i32,
    pub max_comf: i32,
    pub max_prac: i32,
}

impl Thresholds {
    const ZERO: Thresholds = Thresholds {
        min_prac: 0,
        min_comf: 0,
        min_rel: 0,
        max_rel: 0,
        max_comf: 0,
        max_prac: 0,
    };

    /// `(−max_prac, −max_comf, −max_rel, −min_rel, −min_comf, −min_prac)`,
    /// reversing the direction a pair of thresholds describes. Used both to
    /// swap a (low, high) finger pair's base entry into (high, low) order,
    /// and to mirror a right-hand-oriented result into the left hand.
    const fn reversed(self) -> Thresholds {
        Thresholds {
            min_prac: -self.max_prac,
            min_comf: -self.max_comf,
            min_rel: -self.max_rel,
            max_rel: -self.min_rel,
            max_comf: -self.min_comf,
            max_prac: -self.min_prac,
        }
    }
}

/// Base table entry for finger pair `(lo, hi)` with `lo < hi`, in right-hand,
/// ascending-finger orientation.
const fn base_pair(lo: u8, hi: u8) -> Thresholds {
    match (lo, hi) {
        (1, 2) => Thresholds { min_prac: -8, min_comf: -6, min_rel: 1, max_rel: 5, max_comf: 8, max_prac: 10 },
        (1, 3) => Thresholds { min_prac: -7, min_comf: -5, min_rel: 3, max_rel: 9, max_comf: 12, max_prac: 14 },
        (1, 4) => Thresholds { min_prac: -5, min_comf: -3, min_rel: 5, max_rel: 11, max_comf: 13, max_prac: 15 },
        (1, 5) => Thresholds { min_prac: -2, min_comf: 0, min_rel: 7, max_rel: 12, max_comf: 14, max_prac: 16 },
        (2, 3) => Thresholds { min_prac: 1, min_comf: 1, min_rel: 1, max_rel: 2, max_comf: 5, max_prac: 7 },
        (2, 4) => Thresholds { min_prac: 1, min_comf: 1, min_rel: 3, max_rel: 4, max_comf: 6, max_prac: 8 },
        (2, 5) => Thresholds { min_prac: 2, min_comf: 2, min_rel: 5, max_rel: 6, max_comf: 10, max_prac: 12 },
        (3, 4) => Thresholds { min_prac: 1, min_comf: 1, min_rel: 1, max_rel: 2, max_comf: 2, max_prac: 4 },
        (3, 5) => Thresholds { min_prac: 1, min_comf: 1, min_rel: 3, max_rel: 4, max_comf: 6, max_prac: 8 },
        (4, 5) => Thresholds { min_prac: 1, min_comf: 1, min_rel: 1, max_rel: 2, max_comf: 4, max_prac: 6 },
        _ => Thresholds::ZERO,
    }
}

/// Oriented thresholds for playing `f1` then `f2` (in that order) with the
/// given hand. See §4.1: an unordered pair is looked up with the lower
/// finger first and re-oriented by negating and swapping the `(Min*, Max*)`
/// pairs when the query asks for the opposite direction, and a second time
/// for the left hand.
pub fn thresholds_for(f1: Finger, f2: Finger, side: Side) -> Thresholds {
    if f1 == f2 {
        return Thresholds::ZERO;
    }

    let (lo, hi) = if f1.get() < f2.get() {
        (f1.get(), f2.get())
    } else {
        (f2.get(), f1.get())
    };
    let base = base_pair(lo, hi);

    let right_oriented = if f1.get() < f2.get() { base } else { base.reversed() };

    match side {
        Side::Right => right_oriented,
        Side::Left => right_oriented.reversed(),
    }
}
