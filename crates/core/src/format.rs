//! Result formatting: turning a numeric assignment back into note names
//!
//! [`name_pitch`] is the inverse of [`crate::pitch::Pitch::new`]'s
//! enharmonic normalization. Because that normalization is one-directional
//! (E#/Fb both collapse to the same index, and the index alone can't say
//! which spelling a downstream reporter should prefer), this module always
//! produces the sharp spelling for a black key; callers that want flats
//! translate at the presentation layer, the way `chordcraft_core` keeps a
//! separate `flat_name`/`sharp_name` pair rather than re-deriving one from
//! the other.

use crate::error::{PianoFingeringError, Result};
use crate::finger::{Finger, Fingering};
use crate::pitch::{Accidental, Pitch, Step};
use crate::slice::Hand;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pitch spelled back out as a diatonic step, accidental, and octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoteName {
    pub step: Step,
    pub accidental: Accidental,
    pub octave: i32,
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.accidental {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::Natural => "",
        };
        write!(f, "{}{}{}", self.step, accidental, self.octave)
    }
}

/// Recovers `(step, accidental, octave)` from an absolute, already-normalized
/// pitch. Indices 5 and 13 are the "imaginary" enharmonic collision slots
/// and can never occur in a well-formed pitch; if one reaches this function
/// it indicates a bug upstream, not an enharmonic spelling to guess at, so
/// it is reported as [`PianoFingeringError::InternalInconsistency`].
pub fn name_pitch(pitch: Pitch) -> Result<NoteName> {
    let octave = pitch.value().div_euclid(14);
    let index = pitch.value().rem_euclid(14);

    let (step, accidental) = match index {
        0 => (Step::C, Accidental::Natural),
        1 => (Step::C, Accidental::Sharp),
        2 => (Step::D, Accidental::Natural),
        3 => (Step::D, Accidental::Sharp),
        4 => (Step::E, Accidental::Natural),
        6 => (Step::F, Accidental::Natural),
        7 => (Step::F, Accidental::Sharp),
        8 => (Step::G, Accidental::Natural),
        9 => (Step::G, Accidental::Sharp),
        10 => (Step::A, Accidental::Natural),
        11 => (Step::A, Accidental::Sharp),
        12 => (Step::B, Accidental::Natural),
        other => {
            return Err(PianoFingeringError::InternalInconsistency(format!(
                "unreachable pitch-class index {other} (well-formed pitches never normalize to 5 or 13)"
            )));
        }
    };

    Ok(NoteName { step, accidental, octave })
}

/// Zips a hand's slices with a chosen fingering sequence into the
/// reporter-facing shape: one `(note name, finger)` pair per pitch, grouped
/// by slice. Performs no cost computation of its own.
pub fn name_assignment(hand: &Hand, fingerings: &[Fingering]) -> Result<Vec<Vec<(NoteName, Finger)>>> {
    hand.slices()
        .iter()
        .zip(fingerings)
        .map(|(slice, fingering)| {
            slice
                .pitches()
                .iter()
                .zip(fingering.fingers())
                .map(|(pitch, finger)| name_pitch(*pitch).map(|name| (name, *finger)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{Accidental as Acc, Step as St};

    #[test]
    fn names_middle_c() {
        let c4 = Pitch::new(St::C, Acc::Natural, 4);
        let name = name_pitch(c4).unwrap();
        assert_eq!(name.step, St::C);
        assert_eq!(name.accidental, Acc::Natural);
        assert_eq!(name.octave, 4);
        assert_eq!(name.to_string(), "C4");
    }

    #[test]
    fn names_black_keys_sharp() {
        let cs4 = Pitch::new(St::C, Acc::Sharp, 4);
        assert_eq!(name_pitch(cs4).unwrap().to_string(), "C#4");
    }

    #[test]
    fn round_trips_every_natural_and_sharp() {
        use strum::IntoEnumIterator;
        for step in St::iter() {
            for accidental in [Acc::Natural, Acc::Sharp] {
                // Skip combinations that normalize across an octave boundary
                // (B#, and any step+Sharp landing on an imaginary index
                // belongs to a *different* step's natural spelling).
                let pitch = Pitch::new(step, accidental, 4);
                let name = name_pitch(pitch);
                assert!(name.is_ok(), "{step:?}{accidental:?} should name cleanly");
            }
        }
    }

    #[test]
    fn imaginary_index_is_internal_inconsistency() {
        // Index 5 should never occur from Pitch::new, but format must still
        // refuse to guess a spelling if one ever reaches it.
        let bogus = Pitch(4 * 14 + 5);
        assert!(matches!(
            name_pitch(bogus),
            Err(PianoFingeringError::InternalInconsistency(_))
        ));
    }
}
