//! The golden-set scenarios: small, hand-built hands exercising each rule
//!
//! There is no score reader in scope for this tool (see the library's crate
//! doc comment); a real session always supplies its notes via `--notes`. The
//! scenarios here exist so `piano-fingering demo` has something to run
//! without an input file, matching every worked example used to validate the
//! cost model itself.

use anyhow::Result;
use piano_fingering_core::distance::Side;
use piano_fingering_core::pitch::{Accidental, Pitch, Step};
use piano_fingering_core::slice::{Hand, Note, build_hand};

fn p(step: Step, accidental: Accidental, octave: i32) -> Pitch {
    Pitch::new(step, accidental, octave)
}

fn mono(pitches: &[Pitch]) -> Vec<Note> {
    pitches.iter().map(|&pitch| Note::new(pitch, false, 0, 4)).collect()
}

/// One golden-set scenario: a description and the hand it builds.
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub hand: Hand,
}

/// Scenario numbers run `1..=6`, matching the worked examples.
pub fn scenario(n: u8) -> Result<Scenario> {
    use Accidental::{Natural, Sharp};
    use Step::{A, B, C, D, E, F, G};

    let hand = match n {
        1 => {
            let pitches = [
                p(C, Natural, 4),
                p(D, Natural, 4),
                p(E, Natural, 4),
                p(F, Natural, 4),
                p(G, Natural, 4),
                p(A, Natural, 4),
                p(B, Natural, 4),
                p(C, Natural, 5),
            ];
            build_hand(&mono(&pitches), Side::Right)?
        }
        2 => {
            let c4 = p(C, Natural, 4);
            let e4 = p(E, Natural, 4);
            build_hand(&mono(&[c4, e4, c4, e4]), Side::Right)?
        }
        3 => {
            let notes = vec![
                Note::new(p(C, Natural, 4), false, 0, 4),
                Note::new(p(E, Natural, 4), true, 0, 4),
                Note::new(p(G, Natural, 4), true, 0, 4),
            ];
            build_hand(&notes, Side::Right)?
        }
        4 => {
            let pitches = [p(C, Natural, 4), p(C, Sharp, 4)];
            build_hand(&mono(&pitches), Side::Right)?
        }
        5 => {
            let pitches = [p(E, Natural, 4), p(F, Natural, 4)];
            build_hand(&mono(&pitches), Side::Right)?
        }
        6 => {
            let notes = vec![
                Note::new(p(C, Natural, 4), false, 0, 4),
                Note::new(p(G, Natural, 5), true, 0, 4),
            ];
            build_hand(&notes, Side::Right)?
        }
        other => anyhow::bail!("no such demo scenario: {other} (valid range is 1..=6)"),
    };

    let (name, description) = match n {
        1 => ("C major scale", "one octave ascending, monophonic"),
        2 => ("Repeated alternation", "C4-E4-C4-E4, tests the sticky-pitch rule"),
        3 => ("C major triad", "a single three-note chord slice"),
        4 => ("Minor second", "C4 to C#4, tests the white-then-black finger-3/4 rule"),
        5 => ("Thumb crossing", "E4 to F4, a same-color pair next to the thumb"),
        6 => ("Impossible stretch", "C4 to G5, a span beyond any hand's practical reach"),
        _ => unreachable!(),
    };

    Ok(Scenario { name, description, hand })
}

pub const SCENARIO_COUNT: u8 = 6;
