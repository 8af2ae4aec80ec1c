//! Piano Fingering Core - exact optimal fingering engine
//!
//! This crate provides the fixed ergonomic cost model and exact optimization
//! engine used as a regression oracle for piano fingering assignment:
//! - 14-step-per-octave pitch encoding with enharmonic normalization
//! - the finger-pair distance table and its fifteen ergonomic rules
//! - temporal grouping of notes into per-hand slices
//! - a two-slice-window dynamic program that finds the minimum cost and
//!   enumerates every fingering that attains it
//! - formatting of a numeric assignment back into note names
//!
//! # Examples
//!
//! ```
//! use piano_fingering_core::pitch::{Pitch, Step, Accidental};
//! use piano_fingering_core::slice::{Note, Hand, build_hand};
//! use piano_fingering_core::distance::Side;
//! use piano_fingering_core::optimizer::{optimize, OptimizerOptions};
//!
//! let c4 = Pitch::new(Step::C, Accidental::Natural, 4);
//! let e4 = Pitch::new(Step::E, Accidental::Natural, 4);
//! let notes = vec![Note::new(c4, false, 0, 0), Note::new(e4, false, 1, 0)];
//! let hand = build_hand(&notes, Side::Right).unwrap();
//! let solution = optimize(&hand, &OptimizerOptions::default()).unwrap();
//! assert!(solution.cost.is_zero());
//! ```

pub mod distance;
pub mod finger;
pub mod format;
pub mod optimizer;
pub mod pitch;
pub mod rules;
pub mod slice;

// Re-export commonly used types
pub use distance::{Side, Thresholds, thresholds_for};
pub use finger::{Finger, Fingering, candidate_fingerings};
pub use format::{NoteName, name_assignment, name_pitch};
pub use optimizer::{Cost, OptimizerOptions, Solution, cost_of, optimize};
pub use pitch::{Accidental, Pitch, Step};
pub use slice::{Hand, Note, Slice, build_hand};

/// Error types for the piano-fingering-core library
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PianoFingeringError {
        #[error("invalid slice size: {size} (must be 1..=5)")]
        InvalidSliceSize { size: usize },

        #[error("upstream parse error: {0}")]
        ParseUpstream(String),

        #[error("internal inconsistency: {0}")]
        InternalInconsistency(String),
    }

    pub type Result<T> = std::result::Result<T, PianoFingeringError>;
}

pub use error::{PianoFingeringError, Result};
