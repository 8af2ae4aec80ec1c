//! Benchmarks the DP over hands of increasing length and polyphony, where
//! the per-slice candidate count (up to 120 for a five-note chord) drives
//! the state-space size between consecutive steps.

use piano_fingering_core::distance::Side;
use piano_fingering_core::optimizer::{OptimizerOptions, optimize};
use piano_fingering_core::pitch::{Accidental, Pitch, Step};
use piano_fingering_core::slice::{Note, build_hand};
use std::time::Instant;

fn scale_notes(len: usize) -> Vec<Note> {
    let steps = [Step::C, Step::D, Step::E, Step::F, Step::G, Step::A, Step::B];
    (0..len)
        .map(|i| {
            let step = steps[i % steps.len()];
            let octave = 4 + (i / steps.len()) as i32;
            Note::new(Pitch::new(step, Accidental::Natural, octave), false, 0, 4)
        })
        .collect()
}

fn chord_notes() -> Vec<Note> {
    let pitches = [
        Pitch::new(Step::C, Accidental::Natural, 4),
        Pitch::new(Step::D, Accidental::Natural, 4),
        Pitch::new(Step::E, Accidental::Natural, 4),
        Pitch::new(Step::F, Accidental::Natural, 4),
        Pitch::new(Step::G, Accidental::Natural, 4),
    ];
    pitches
        .iter()
        .enumerate()
        .map(|(i, &pitch)| Note::new(pitch, i > 0, 0, 4))
        .collect()
}

fn main() {
    let options = OptimizerOptions::default();

    println!("=== Monophonic scale, increasing length ===");
    for len in [8usize, 16, 24] {
        let notes = scale_notes(len);
        let hand = build_hand(&notes, Side::Right).unwrap();
        let start = Instant::now();
        let solution = optimize(&hand, &options).unwrap();
        let elapsed = start.elapsed();
        println!(
            "{len} notes: cost {}, {} co-optimal fingerings, {elapsed:?}",
            solution.cost,
            solution.fingerings.len()
        );
    }

    println!("\n=== Single five-note chord slice ===");
    let hand = build_hand(&chord_notes(), Side::Right).unwrap();
    let start = Instant::now();
    let solution = optimize(&hand, &options).unwrap();
    let elapsed = start.elapsed();
    println!(
        "5-note chord: cost {}, {} co-optimal fingerings, {elapsed:?}",
        solution.cost,
        solution.fingerings.len()
    );

    println!("\n=== Repeated five-note chords, increasing length ===");
    for chord_count in [2usize, 4] {
        let mut notes = Vec::new();
        for _ in 0..chord_count {
            notes.extend(chord_notes());
        }
        let hand = build_hand(&notes, Side::Right).unwrap();
        let start = Instant::now();
        let solution = optimize(&hand, &options).unwrap();
        let elapsed = start.elapsed();
        println!(
            "{chord_count} chords: cost {}, {} co-optimal fingerings, {elapsed:?}",
            solution.cost,
            solution.fingerings.len()
        );
    }
}
