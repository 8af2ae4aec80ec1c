//! Pitch representation and the 14-step-per-octave encoding
//!
//! This module provides the fixed-point integer pitch encoding the rest of
//! the crate is built on: each octave spans 14 encoding units rather than
//! 12 semitones, because two "imaginary" indices (5 and 13) are reserved
//! for the enharmonic collisions (E#/Fb and B#/Cb) so that every natural
//! and every accidental gets its own slot without overlapping a neighbor.

use crate::error::{PianoFingeringError, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the seven diatonic letter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Base encoding-unit offset within the octave, before the accidental is applied.
    fn base(&self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 6,
            Step::G => 8,
            Step::A => 10,
            Step::B => 12,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Step::C),
            "D" => Ok(Step::D),
            "E" => Ok(Step::E),
            "F" => Ok(Step::F),
            "G" => Ok(Step::G),
            "A" => Ok(Step::A),
            "B" => Ok(Step::B),
            _ => Err(PianoFingeringError::ParseUpstream(format!(
                "invalid diatonic step: '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Step::C => 'C',
            Step::D => 'D',
            Step::E => 'E',
            Step::F => 'F',
            Step::G => 'G',
            Step::A => 'A',
            Step::B => 'B',
        };
        write!(f, "{c}")
    }
}

/// A chromatic alteration of a diatonic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Accidental {
    Flat,
    Natural,
    Sharp,
}

impl Accidental {
    fn offset(&self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// Absolute pitch in the 14-per-octave encoding: `octave * 14 + step_index`.
///
/// Indices 5 and 13 never appear in a well-formed, normalized `Pitch`: they
/// are intermediate values only, collapsed by [`Pitch::new`] per the
/// enharmonic normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pitch(pub i32);

/// Indices within an octave that land on a black key.
const BLACK_INDICES: [i32; 5] = [1, 3, 7, 9, 11];

impl Pitch {
    /// Construct a pitch from a diatonic step, accidental, and octave, applying
    /// the enharmonic normalization for raw index 5 (E#/Fb), 13 (B#) and -1 (Cb).
    pub fn new(step: Step, accidental: Accidental, octave: i32) -> Self {
        let raw = step.base() + accidental.offset();
        let (normalized, octave) = match raw {
            5 => {
                if matches!(accidental, Accidental::Sharp) {
                    (6, octave)
                } else {
                    (4, octave)
                }
            }
            13 => (0, octave + 1),
            -1 => (12, octave - 1),
            other => (other, octave),
        };
        Pitch(octave * 14 + normalized)
    }

    /// Raw absolute encoding value.
    pub fn value(&self) -> i32 {
        self.0
    }

    /// The index of this pitch within its octave, in `0..14`.
    pub fn step_index(&self) -> i32 {
        self.0.rem_euclid(14)
    }

    /// `true` if this pitch falls on a black key of the keyboard.
    pub fn is_black(&self) -> bool {
        BLACK_INDICES.contains(&self.step_index())
    }

    pub fn is_white(&self) -> bool {
        !self.is_black()
    }

    /// Signed distance in encoding units: `other - self`.
    pub fn distance_to(&self, other: Pitch) -> i32 {
        other.0 - self.0
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
