//! Finger representation and per-slice candidate fingering enumeration
//!
//! A [`Finger`] is one of the five digits of a hand; a [`Fingering`] assigns
//! a distinct finger to each pitch of a slice, in the same order as the
//! slice's ascending-sorted pitches.

use crate::error::{PianoFingeringError, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the five fingers of a hand. `1` is the thumb, `5` the little finger,
/// in both hands (handedness only affects how distances are oriented, not
/// how fingers are numbered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Finger(u8);

pub const ALL_FINGERS: [Finger; 5] = [Finger(1), Finger(2), Finger(3), Finger(4), Finger(5)];

impl Finger {
    pub fn new(n: u8) -> Result<Self> {
        if (1..=5).contains(&n) {
            Ok(Finger(n))
        } else {
            Err(PianoFingeringError::InternalInconsistency(format!(
                "finger out of range: {n}"
            )))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn is_thumb(&self) -> bool {
        self.0 == 1
    }

    pub fn is_fourth(&self) -> bool {
        self.0 == 4
    }

    pub fn is_little(&self) -> bool {
        self.0 == 5
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An assignment of distinct fingers to a slice's pitches, one finger per
/// pitch, in ascending-pitch order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fingering(Vec<Finger>);

impl Fingering {
    pub fn new(fingers: Vec<Finger>) -> Self {
        Fingering(fingers)
    }

    pub fn fingers(&self) -> &[Finger] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Finger> {
        self.0.get(index).copied()
    }
}

impl fmt::Display for Fingering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|fg| fg.to_string()).collect();
        write!(f, "({})", parts.join(","))
    }
}

/// Every ordered injection of `k` distinct fingers from `{1..5}`, in
/// lexicographic order of the finger digits. `k` must be `1..=5`; the DP
/// never calls this with a larger slice because [`crate::slice::Slice`]
/// enforces the size-5 cap at construction.
///
/// There are `5!/(5-k)!` such candidates: 5, 20, 60, 120, 120 for
/// `k = 1..=5`.
pub fn candidate_fingerings(k: usize) -> Vec<Fingering> {
    let mut results = Vec::new();
    let mut chosen = Vec::with_capacity(k);
    let mut used = [false; 5];
    generate_injections(k, &mut chosen, &mut used, &mut results);
    results
}

fn generate_injections(
    k: usize,
    chosen: &mut Vec<Finger>,
    used: &mut [bool; 5],
    results: &mut Vec<Fingering>,
) {
    if chosen.len() == k {
        results.push(Fingering::new(chosen.clone()));
        return;
    }

    for (i, finger) in ALL_FINGERS.iter().enumerate() {
        if used[i] {
            continue;
        }
        used[i] = true;
        chosen.push(*finger);
        generate_injections(k, chosen, used, results);
        chosen.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_count_matches_permutation_formula() {
        assert_eq!(candidate_fingerings(1).len(), 5);
        assert_eq!(candidate_fingerings(2).len(), 20);
        assert_eq!(candidate_fingerings(3).len(), 60);
        assert_eq!(candidate_fingerings(4).len(), 120);
        assert_eq!(candidate_fingerings(5).len(), 120);
    }

    #[test]
    fn candidates_are_injective() {
        for k in 1..=5 {
            for fingering in candidate_fingerings(k) {
                let mut seen = std::collections::HashSet::new();
                for fg in fingering.fingers() {
                    assert!(seen.insert(*fg), "fingering {fingering} repeats a finger");
                }
            }
        }
    }

    #[test]
    fn lexicographic_order() {
        let cands = candidate_fingerings(2);
        assert_eq!(cands[0].fingers(), &[Finger::new(1).unwrap(), Finger::new(2).unwrap()]);
        assert_eq!(cands[1].fingers(), &[Finger::new(1).unwrap(), Finger::new(3).unwrap()]);
    }

    #[test]
    fn finger_out_of_range_is_internal_inconsistency() {
        assert!(Finger::new(0).is_err());
        assert!(Finger::new(6).is_err());
    }
}
