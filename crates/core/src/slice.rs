//! Slice construction: grouping notes into simultaneous per-hand slices
//!
//! A [`Slice`] is the non-empty, deduplicated, ascending-sorted set of
//! pitches struck at one musical instant by one hand. A [`Hand`] is the
//! ordered sequence of slices that the optimizer solves over. Building a
//! `Hand` from a flat note stream is the one piece of "score reading" left
//! inside the core, because the chord-continuation grouping rule is part of
//! the cost model's input contract, not a presentation concern.

use crate::distance::Side;
use crate::error::{PianoFingeringError, Result};
use crate::pitch::Pitch;

/// Largest number of pitches a single slice may contain, one per finger.
pub const MAX_SLICE_SIZE: usize = 5;

/// A note as supplied by an upstream score reader. `voice` and `duration`
/// are opaque to the core; they exist only so a reader can carry them
/// through to slicing without the core needing to interpret musical time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub pitch: Pitch,
    /// `true` if this note continues the chord started by the previous note
    /// of the same hand, rather than opening a new slice.
    pub chord_continuation: bool,
    pub voice: u8,
    pub duration: u32,
}

impl Note {
    pub fn new(pitch: Pitch, chord_continuation: bool, voice: u8, duration: u32) -> Self {
        Note {
            pitch,
            chord_continuation,
            voice,
            duration,
        }
    }
}

/// The non-empty, deduplicated, ascending-sorted set of pitches struck
/// simultaneously by one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pitches: Vec<Pitch>,
}

impl Slice {
    /// Deduplicates and sorts `pitches`, then validates the size invariant.
    pub fn new(mut pitches: Vec<Pitch>) -> Result<Self> {
        pitches.sort();
        pitches.dedup();

        if pitches.is_empty() || pitches.len() > MAX_SLICE_SIZE {
            return Err(PianoFingeringError::InvalidSliceSize { size: pitches.len() });
        }

        Ok(Slice { pitches })
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        false // enforced non-empty by `new`
    }

    pub fn is_monophonic(&self) -> bool {
        self.pitches.len() == 1
    }
}

/// An ordered sequence of slices played by one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    side: Side,
    slices: Vec<Slice>,
}

impl Hand {
    pub fn new(side: Side, slices: Vec<Slice>) -> Self {
        Hand { side, slices }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Groups a flat, time-ordered stream of notes for one hand into slices:
/// a chord-continuation note joins the slice opened by the most recent
/// non-continuation note; any other note opens a new slice.
pub fn build_hand(notes: &[Note], side: Side) -> Result<Hand> {
    let mut slices = Vec::new();
    let mut current: Vec<Pitch> = Vec::new();

    for note in notes {
        if note.chord_continuation && !current.is_empty() {
            current.push(note.pitch);
        } else {
            if !current.is_empty() {
                slices.push(Slice::new(std::mem::take(&mut current))?);
            }
            current.push(note.pitch);
        }
    }
    if !current.is_empty() {
        slices.push(Slice::new(current)?);
    }

    Ok(Hand::new(side, slices))
}
