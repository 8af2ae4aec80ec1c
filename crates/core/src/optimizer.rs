//! The windowed dynamic program: exact minimum cost and co-optimal solutions
//!
//! For each hand, the optimizer walks its slices left to right. The DP state
//! at step `s` (`s >= 1`) is a pair `(A, B)` of candidate fingerings, `A` for
//! slice `s-1` and `B` for slice `s`; a transition to step `s+1` appends a
//! candidate `C` for slice `s+1` and requires the new state's first element
//! to equal the old state's second element (chain consistency). Every state
//! keeps the full set of equal-cost predecessors, so backtracking from every
//! minimal final state enumerates every co-optimal fingering, not just one.
//!
//! Each step's table is an owned map indexed by step (`Vec<StepTable>`); the
//! live frontier only ever reads the immediately preceding step's table, so
//! earlier tables could be dropped once predecessor collection for the next
//! step completes (this implementation keeps them all, since backtracking
//! needs to walk back through every step afterwards).

use crate::distance::Side;
use crate::error::{PianoFingeringError, Result};
use crate::finger::{Fingering, candidate_fingerings};
pub use crate::rules::Cost;
use crate::rules::{
    MonoNote, r1_r2_r13_pair_cost, r3_triplet_position_change, r4_triplet_span_excess,
    r5_fourth_finger, r6_three_four_pair, r7_three_white_four_black, r8_thumb_on_black,
    r9_little_finger_on_black, r10_thumb_cross_same_color, r11_thumb_on_black_crossed_by_white,
    r12_same_finger_repetition, r14_intra_chord, r15_sticky_pitch,
};
use crate::slice::{Hand, Slice};
use std::collections::HashMap;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A DP state: the chosen candidate index for the previous slice and for
/// the current slice, each indexing into that slice's own candidate list.
type State = (usize, usize);

struct Entry {
    cost: Cost,
    predecessors: Vec<State>,
}

type StepTable = HashMap<State, Entry>;

/// Tuning knobs for the optimizer. The triplet-aware rules (R3, R4, R8, R9,
/// R12) are the standardized behavior; `triplet_rules` exists only so a test
/// can reproduce the historical "basic" engine's numbers for comparison, not
/// as something a caller should ordinarily turn off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizerOptions {
    pub triplet_rules: bool,
    /// Safety cap on slice size, checked in addition to the invariant
    /// [`Slice::new`] already enforces.
    pub max_slice_size: usize,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        OptimizerOptions {
            triplet_rules: true,
            max_slice_size: crate::slice::MAX_SLICE_SIZE,
        }
    }
}

/// The result of [`optimize`]: the exact minimum cost and every fingering
/// sequence that attains it, each sequence of length `hand.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub cost: Cost,
    pub fingerings: Vec<Vec<Fingering>>,
}

/// Finds the exact minimum cost over a hand and every fingering sequence
/// that attains it. A hand with zero slices is not an error: it costs 0 and
/// has exactly one (empty) solution.
pub fn optimize(hand: &Hand, options: &OptimizerOptions) -> Result<Solution> {
    let slices = hand.slices();
    let n = slices.len();

    for slice in slices {
        if slice.len() > options.max_slice_size {
            return Err(PianoFingeringError::InvalidSliceSize { size: slice.len() });
        }
    }

    if n == 0 {
        return Ok(Solution {
            cost: Cost::ZERO,
            fingerings: vec![vec![]],
        });
    }

    let candidates: Vec<Vec<Fingering>> = slices.iter().map(|s| candidate_fingerings(s.len())).collect();

    if n == 1 {
        return optimize_single_slice(&slices[0], &candidates[0], hand.side());
    }

    let tables = run_dp(hand, &candidates, options)?;
    let final_table = tables.last().expect("n >= 2 implies at least one step table");

    let min_cost = final_table
        .values()
        .map(|e| e.cost)
        .min()
        .expect("non-empty candidate lists imply a non-empty final table");

    let final_states: Vec<State> = final_table
        .iter()
        .filter(|(_, e)| e.cost == min_cost)
        .map(|(&state, _)| state)
        .collect();

    let mut index_paths = Vec::new();
    for state in final_states {
        index_paths.extend(backtrack(&tables, tables.len() - 1, state, Vec::new()));
    }

    let mut seen = HashSet::new();
    let mut fingerings = Vec::new();
    for path in index_paths {
        let sequence: Vec<Fingering> = path
            .iter()
            .enumerate()
            .map(|(slice_idx, &cand_idx)| candidates[slice_idx][cand_idx].clone())
            .collect();
        if seen.insert(sequence.clone()) {
            fingerings.push(sequence);
        }
    }

    Ok(Solution {
        cost: min_cost,
        fingerings,
    })
}

/// Evaluates the full rule set on a given, already-complete fingering
/// sequence, without optimizing. Useful for tests that want to check a
/// specific candidate fingering against the oracle.
pub fn cost_of(hand: &Hand, fingerings: &[Fingering]) -> Result<Cost> {
    let slices = hand.slices();
    if fingerings.len() != slices.len() {
        return Err(PianoFingeringError::InternalInconsistency(format!(
            "fingering sequence length {} does not match hand length {}",
            fingerings.len(),
            slices.len()
        )));
    }

    let side = hand.side();
    let n = slices.len();

    if n == 0 {
        return Ok(Cost::ZERO);
    }
    if n == 1 {
        return single_slice_cost(&slices[0], &fingerings[0], side);
    }

    let mut cost = base_pair_cost(&slices[0], &fingerings[0], &slices[1], &fingerings[1], side)?;

    for s in 2..n {
        cost += transition_cost(
            slices,
            fingerings,
            s,
            side,
            &OptimizerOptions {
                triplet_rules: true,
                max_slice_size: crate::slice::MAX_SLICE_SIZE,
            },
        )?;
    }

    Ok(cost)
}

fn optimize_single_slice(slice: &Slice, candidates: &[Fingering], side: Side) -> Result<Solution> {
    let mut best_cost: Option<Cost> = None;
    let mut best: Vec<Fingering> = Vec::new();

    for candidate in candidates {
        let cost = single_slice_cost(slice, candidate, side)?;
        match best_cost {
            None => {
                best_cost = Some(cost);
                best.push(candidate.clone());
            }
            Some(bc) if cost < bc => {
                best_cost = Some(cost);
                best = vec![candidate.clone()];
            }
            Some(bc) if cost == bc => {
                best.push(candidate.clone());
            }
            _ => {}
        }
    }

    let cost = best_cost.expect("candidate_fingerings(k) is non-empty for k in 1..=5");
    Ok(Solution {
        cost,
        fingerings: best.into_iter().map(|f| vec![f]).collect(),
    })
}

fn run_dp(hand: &Hand, candidates: &[Vec<Fingering>], options: &OptimizerOptions) -> Result<Vec<StepTable>> {
    let slices = hand.slices();
    let side = hand.side();
    let n = slices.len();

    let mut table: StepTable = HashMap::new();
    for (ai, a) in candidates[0].iter().enumerate() {
        for (bi, b) in candidates[1].iter().enumerate() {
            let cost = base_pair_cost(&slices[0], a, &slices[1], b, side)?;
            table.insert((ai, bi), Entry { cost, predecessors: vec![] });
        }
    }

    let mut tables = vec![table];

    for s in 2..n {
        let prev_table = tables.last().expect("at least one table exists once n >= 2");
        let mut next_table: StepTable = HashMap::new();

        for (&(ai, bi), entry) in prev_table.iter() {
            let a = &candidates[s - 2][ai];
            let b = &candidates[s - 1][bi];
            for (ci, c) in candidates[s].iter().enumerate() {
                let step_cost = transition_cost_indexed(slices, side, s, a, b, c, options)?;
                let new_cost = entry.cost + step_cost;
                let key = (bi, ci);

                next_table
                    .entry(key)
                    .and_modify(|existing: &mut Entry| {
                        if new_cost < existing.cost {
                            existing.cost = new_cost;
                            existing.predecessors = vec![(ai, bi)];
                        } else if new_cost == existing.cost {
                            existing.predecessors.push((ai, bi));
                        }
                    })
                    .or_insert_with(|| Entry {
                        cost: new_cost,
                        predecessors: vec![(ai, bi)],
                    });
            }
        }

        tables.push(next_table);
    }

    Ok(tables)
}

/// Recursively walks predecessor links from `state` at `tables[step]` back
/// to step 0, returning every full index path `[idx_0, .., idx_{n-1}]`.
fn backtrack(tables: &[StepTable], step: usize, state: State, suffix: Vec<usize>) -> Vec<Vec<usize>> {
    let mut suffix = suffix;
    suffix.push(state.1);

    if step == 0 {
        suffix.push(state.0);
        suffix.reverse();
        return vec![suffix];
    }

    let entry = &tables[step][&state];
    let mut out = Vec::new();
    for &pred in &entry.predecessors {
        out.extend(backtrack(tables, step - 1, pred, suffix.clone()));
    }
    out
}

fn single_slice_cost(slice: &Slice, fingering: &Fingering, side: Side) -> Result<Cost> {
    let mut cost = r14_intra_chord(slice.pitches(), fingering.fingers(), side);
    if slice.is_monophonic() {
        cost += r5_fourth_finger(MonoNote::new(slice.pitches()[0], fingering.fingers()[0]));
    }
    Ok(cost)
}

/// The base-case cost for the first pair of slices (s = 0, s = 1): no
/// triplet window exists yet, since there is no slice before the first.
fn base_pair_cost(
    slice_a: &Slice,
    a: &Fingering,
    slice_b: &Slice,
    b: &Fingering,
    side: Side,
) -> Result<Cost> {
    let mut cost = r14_intra_chord(slice_a.pitches(), a.fingers(), side);
    if slice_a.is_monophonic() {
        cost += r5_fourth_finger(MonoNote::new(slice_a.pitches()[0], a.fingers()[0]));
    }

    cost += r14_intra_chord(slice_b.pitches(), b.fingers(), side);
    cost += inter_slice_pair_cost(slice_a, a, slice_b, b, side);
    cost += r15_sticky_pitch(slice_a.pitches(), a.fingers(), slice_b.pitches(), b.fingers());

    if slice_a.is_monophonic() && slice_b.is_monophonic() {
        let prev = MonoNote::new(slice_a.pitches()[0], a.fingers()[0]);
        let curr = MonoNote::new(slice_b.pitches()[0], b.fingers()[0]);
        cost += r5_fourth_finger(curr);
        cost += r6_three_four_pair(prev, curr);
        cost += r7_three_white_four_black(prev, curr);
        cost += r10_thumb_cross_same_color(prev, curr);
        cost += r11_thumb_on_black_crossed_by_white(prev, curr);
    }

    Ok(cost)
}

/// The cost charged when extending state `(A, B)` (fingerings for slices
/// `s-2, s-1`) with a candidate `C` for slice `s`, using slices looked up
/// directly from the hand's slice list.
fn transition_cost_indexed(
    slices: &[Slice],
    side: Side,
    s: usize,
    a: &Fingering,
    b: &Fingering,
    c: &Fingering,
    options: &OptimizerOptions,
) -> Result<Cost> {
    let slice_prev = &slices[s - 1];
    let slice_curr = &slices[s];

    let mut cost = r14_intra_chord(slice_curr.pitches(), c.fingers(), side);
    cost += inter_slice_pair_cost(slice_prev, b, slice_curr, c, side);
    cost += r15_sticky_pitch(slice_prev.pitches(), b.fingers(), slice_curr.pitches(), c.fingers());

    if slice_prev.is_monophonic() && slice_curr.is_monophonic() {
        let prev = MonoNote::new(slice_prev.pitches()[0], b.fingers()[0]);
        let curr = MonoNote::new(slice_curr.pitches()[0], c.fingers()[0]);
        cost += r5_fourth_finger(curr);
        cost += r6_three_four_pair(prev, curr);
        cost += r7_three_white_four_black(prev, curr);
        cost += r10_thumb_cross_same_color(prev, curr);
        cost += r11_thumb_on_black_crossed_by_white(prev, curr);
    }

    if options.triplet_rules {
        let slice_first = &slices[s - 2];
        if slice_first.is_monophonic() && slice_prev.is_monophonic() && slice_curr.is_monophonic() {
            let first = MonoNote::new(slice_first.pitches()[0], a.fingers()[0]);
            let middle = MonoNote::new(slice_prev.pitches()[0], b.fingers()[0]);
            let last = MonoNote::new(slice_curr.pitches()[0], c.fingers()[0]);

            cost += r3_triplet_position_change(first, middle, last, side);
            cost += r4_triplet_span_excess(first, last, side);
            cost += r12_same_finger_repetition(first, middle, last);
            cost += r8_thumb_on_black(Some(first), middle, Some(last));
            cost += r9_little_finger_on_black(Some(first), middle, Some(last));
        }
    }

    Ok(cost)
}

/// `transition_cost` for `cost_of`, which has direct slice/fingering slices
/// rather than the index-into-candidates view `run_dp` uses.
fn transition_cost(
    slices: &[Slice],
    fingerings: &[Fingering],
    s: usize,
    side: Side,
    options: &OptimizerOptions,
) -> Result<Cost> {
    transition_cost_indexed(
        slices,
        side,
        s,
        &fingerings[s - 2],
        &fingerings[s - 1],
        &fingerings[s],
        options,
    )
}

fn inter_slice_pair_cost(prev: &Slice, prev_fingering: &Fingering, curr: &Slice, curr_fingering: &Fingering, side: Side) -> Cost {
    let mut cost = Cost::ZERO;
    for (pi, &pp) in prev.pitches().iter().enumerate() {
        for (ci, &cp) in curr.pitches().iter().enumerate() {
            cost += r1_r2_r13_pair_cost(
                MonoNote::new(pp, prev_fingering.fingers()[pi]),
                MonoNote::new(cp, curr_fingering.fingers()[ci]),
                side,
            );
        }
    }
    cost
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::finger::Finger;
    use crate::pitch::{Accidental, Pitch, Step};
    use crate::slice::{Note, build_hand};
    use proptest::prelude::*;

    const DIATONIC: [Step; 7] = [Step::C, Step::D, Step::E, Step::F, Step::G, Step::A, Step::B];

    // Restricted to natural, white-key pitches: negating a raw pitch value
    // directly (not going through `Pitch::new`'s accidental normalization)
    // only preserves key color for the diatonic naturals. A sharp/flat pitch
    // can negate into one of the imaginary indices (5, 13), which breaks the
    // is_black() comparison the handedness property depends on.
    fn diatonic_pitch(step_index: usize, octave: i32) -> Pitch {
        Pitch::new(DIATONIC[step_index % DIATONIC.len()], Accidental::Natural, octave)
    }

    fn mono_hand_of(pitches: &[Pitch], side: Side) -> Hand {
        let notes: Vec<Note> = pitches.iter().map(|&pitch| Note::new(pitch, false, 0, 4)).collect();
        build_hand(&notes, side).unwrap()
    }

    fn finger_strategy() -> impl Strategy<Value = Finger> {
        (1u8..=5).prop_map(|n| Finger::new(n).unwrap())
    }

    proptest! {
        // For every hand and every fingering of it, the full rule evaluation
        // never beats the DP's reported minimum.
        #[test]
        fn cost_of_never_beats_the_optimum(
            step_indices in prop::collection::vec(0usize..7, 1..6),
            octave_offsets in prop::collection::vec(0i32..2, 1..6),
            fingers in prop::collection::vec(finger_strategy(), 1..6),
        ) {
            let n = step_indices.len().min(octave_offsets.len()).min(fingers.len());
            prop_assume!(n >= 1);

            let pitches: Vec<Pitch> = (0..n).map(|i| diatonic_pitch(step_indices[i], 4 + octave_offsets[i])).collect();
            let hand = mono_hand_of(&pitches, Side::Right);
            let fingerings: Vec<Fingering> = fingers[..n].iter().map(|&f| Fingering::new(vec![f])).collect();

            let optimum = optimize(&hand, &OptimizerOptions::default()).unwrap();
            let evaluated = cost_of(&hand, &fingerings).unwrap();
            prop_assert!(evaluated >= optimum.cost);
        }

        // Every returned solution is itself exactly at the reported optimum,
        // and the solution set has no duplicate fingering sequences.
        #[test]
        fn every_solution_is_optimal_and_unique(
            step_indices in prop::collection::vec(0usize..7, 1..6),
            octave_offsets in prop::collection::vec(0i32..2, 1..6),
        ) {
            let n = step_indices.len().min(octave_offsets.len());
            prop_assume!(n >= 1);

            let pitches: Vec<Pitch> = (0..n).map(|i| diatonic_pitch(step_indices[i], 4 + octave_offsets[i])).collect();
            let hand = mono_hand_of(&pitches, Side::Right);

            let solution = optimize(&hand, &OptimizerOptions::default()).unwrap();
            prop_assert!(!solution.fingerings.is_empty());

            let mut seen = HashSet::new();
            for seq in &solution.fingerings {
                prop_assert_eq!(cost_of(&hand, seq).unwrap(), solution.cost);
                prop_assert!(seen.insert(seq.clone()));
            }
        }

        // Mirroring a diatonic monophonic line about pitch 0 and handing it to
        // the opposite side with the same per-note fingers preserves cost: the
        // distance-threshold reversal that re-orients a query for the opposite
        // finger order exactly cancels the sign flip from negating every pitch.
        #[test]
        fn handedness_mirror_preserves_cost(
            step_indices in prop::collection::vec(0usize..7, 1..6),
            octave_offsets in prop::collection::vec(0i32..2, 1..6),
            fingers in prop::collection::vec(finger_strategy(), 1..6),
        ) {
            let n = step_indices.len().min(octave_offsets.len()).min(fingers.len());
            prop_assume!(n >= 1);

            let pitches: Vec<Pitch> = (0..n).map(|i| diatonic_pitch(step_indices[i], 4 + octave_offsets[i])).collect();
            let mirrored: Vec<Pitch> = pitches.iter().map(|p| Pitch(-p.value())).collect();
            let fingering_seq: Vec<Fingering> = fingers[..n].iter().map(|&f| Fingering::new(vec![f])).collect();

            let right_hand = mono_hand_of(&pitches, Side::Right);
            let left_hand = mono_hand_of(&mirrored, Side::Left);

            let right_cost = cost_of(&right_hand, &fingering_seq).unwrap();
            let left_cost = cost_of(&left_hand, &fingering_seq).unwrap();
            prop_assert_eq!(right_cost, left_cost);
        }

        // Time-reversing a monophonic line and reversing its fingering in
        // lockstep preserves the evaluated cost: every rule that looks at an
        // ordered pair or triple is itself symmetric under reversing both the
        // order and the oriented-threshold lookup together.
        #[test]
        fn time_reversal_preserves_cost(
            step_indices in prop::collection::vec(0usize..7, 1..6),
            octave_offsets in prop::collection::vec(0i32..2, 1..6),
            fingers in prop::collection::vec(finger_strategy(), 1..6),
        ) {
            let n = step_indices.len().min(octave_offsets.len()).min(fingers.len());
            prop_assume!(n >= 1);

            let pitches: Vec<Pitch> = (0..n).map(|i| diatonic_pitch(step_indices[i], 4 + octave_offsets[i])).collect();
            let fingering_seq: Vec<Fingering> = fingers[..n].iter().map(|&f| Fingering::new(vec![f])).collect();

            let forward_hand = mono_hand_of(&pitches, Side::Right);
            let forward_cost = cost_of(&forward_hand, &fingering_seq).unwrap();

            let reversed_pitches: Vec<Pitch> = pitches.iter().rev().copied().collect();
            let reversed_fingering: Vec<Fingering> = fingering_seq.iter().rev().cloned().collect();
            let reversed_hand = mono_hand_of(&reversed_pitches, Side::Right);
            let reversed_cost = cost_of(&reversed_hand, &reversed_fingering).unwrap();

            prop_assert_eq!(forward_cost, reversed_cost);
        }
    }
}
