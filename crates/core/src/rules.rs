//! The ergonomic cost model: fifteen rule evaluators over local windows
//!
//! Every function here is pure and returns a non-negative [`Cost`]; none of
//! them reach into the optimizer's DP state. A rule is always 0 outside its
//! precondition (R5 is 0 for any finger but 4, R8 is 0 off the thumb or off
//! a black key, and so on) rather than being called conditionally, which
//! keeps the optimizer's accumulation step a flat sum of rule calls.

use crate::distance::{Side, Thresholds, thresholds_for};
use crate::finger::Finger;
use crate::pitch::Pitch;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An exact, non-negative cost in half-units (the single 0.5 constant used
/// by R8 is represented as one half-unit so that tie detection in the
/// optimizer never needs an approximate floating-point comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cost(i64);

impl Cost {
    pub const ZERO: Cost = Cost(0);

    /// A whole-number cost of `n` (most rules deal only in whole units).
    pub const fn whole(n: i64) -> Cost {
        Cost(n * 2)
    }

    /// Half of one unit, used only by R8's thumb-on-black base penalty.
    pub const fn half() -> Cost {
        Cost(1)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn half_units(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl Add for Cost {
    type Output = Cost;
    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.0 += rhs.0;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{:.1}", self.as_f64())
        }
    }
}

/// A single note in a monophonic neighborhood: the pitch played and the
/// finger assigned to it. Several rules only fire when both neighbors of a
/// note exist and are themselves part of a monophonic run, so callers pass
/// `Option<MonoNote>` for the previous/next note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoNote {
    pub pitch: Pitch,
    pub finger: Finger,
}

impl MonoNote {
    pub fn new(pitch: Pitch, finger: Finger) -> Self {
        MonoNote { pitch, finger }
    }
}

/// Cascading pair cost shared by R1/R2/R13: violating the Relaxed band costs
/// 1 unit per encoding-unit of violation, violating Comfort costs 2 more,
/// and violating Practical costs 10 more, symmetric on both sides.
pub fn pair_cascade(t: &Thresholds, d: i32) -> Cost {
    Cost::whole(cascade_low(d, t.min_rel, t.min_comf, t.min_prac, 1, 2, 10))
        + Cost::whole(cascade_high(d, t.max_rel, t.max_comf, t.max_prac, 1, 2, 10))
}

/// R14's cascading pair cost: the Relaxed and Comfort tiers are doubled
/// (2 and 4 instead of 1 and 2); the Practical tier keeps its weight of 10.
fn intra_chord_cascade(t: &Thresholds, d: i32) -> Cost {
    Cost::whole(cascade_low(d, t.min_rel, t.min_comf, t.min_prac, 2, 4, 10))
        + Cost::whole(cascade_high(d, t.max_rel, t.max_comf, t.max_prac, 2, 4, 10))
}

#[allow(clippy::too_many_arguments)]
fn cascade_low(d: i32, rel: i32, comf: i32, prac: i32, w_rel: i64, w_comf: i64, w_prac: i64) -> i64 {
    if d >= rel {
        return 0;
    }
    let mut cost = w_rel * (rel - d) as i64;
    if d < comf {
        cost += w_comf * (comf - d) as i64;
        if d < prac {
            cost += w_prac * (prac - d) as i64;
        }
    }
    cost
}

#[allow(clippy::too_many_arguments)]
fn cascade_high(d: i32, rel: i32, comf: i32, prac: i32, w_rel: i64, w_comf: i64, w_prac: i64) -> i64 {
    if d <= rel {
        return 0;
    }
    let mut cost = w_rel * (d - rel) as i64;
    if d > comf {
        cost += w_comf * (d - comf) as i64;
        if d > prac {
            cost += w_prac * (d - prac) as i64;
        }
    }
    cost
}

/// R1/R2/R13: inter-note pair cost between two consecutively played notes.
pub fn r1_r2_r13_pair_cost(prev: MonoNote, curr: MonoNote, side: Side) -> Cost {
    let t = thresholds_for(prev.finger, curr.finger, side);
    let d = prev.pitch.distance_to(curr.pitch);
    pair_cascade(&t, d)
}

/// R3: triplet hand-position change.
pub fn r3_triplet_position_change(
    first: MonoNote,
    middle: MonoNote,
    last: MonoNote,
    side: Side,
) -> Cost {
    let t = thresholds_for(first.finger, last.finger, side);
    let d13 = first.pitch.distance_to(last.pitch);

    let mut cost = Cost::ZERO;

    if d13 < t.min_comf || d13 > t.max_comf {
        cost += Cost::whole(1);
    }

    let mut sorted = [first.pitch, middle.pitch, last.pitch];
    sorted.sort();
    let sorted_middle = sorted[1];
    if sorted_middle == middle.pitch && middle.finger.is_thumb() && (d13 < t.min_prac || d13 > t.max_prac) {
        cost += Cost::whole(1);
    }

    if first.pitch == last.pitch && first.finger != last.finger {
        cost += Cost::whole(1);
    }

    cost
}

/// R4: triplet span excess, a linear penalty (not cascading) for the
/// outermost two notes of a triple straying outside the Comfort band.
pub fn r4_triplet_span_excess(first: MonoNote, last: MonoNote, side: Side) -> Cost {
    let t = thresholds_for(first.finger, last.finger, side);
    let d13 = first.pitch.distance_to(last.pitch);
    Cost::whole((t.min_comf - d13).max(0) as i64 + (d13 - t.max_comf).max(0) as i64)
}

/// R5: fourth-finger use.
pub fn r5_fourth_finger(note: MonoNote) -> Cost {
    if note.finger.is_fourth() {
        Cost::whole(1)
    } else {
        Cost::ZERO
    }
}

/// R6: the unordered finger pair on consecutive monophonic notes is {3,4}.
pub fn r6_three_four_pair(a: MonoNote, b: MonoNote) -> Cost {
    let fingers = (a.finger.get(), b.finger.get());
    if matches!(fingers, (3, 4) | (4, 3)) {
        Cost::whole(1)
    } else {
        Cost::ZERO
    }
}

/// R7: a finger-3 note on a white key immediately adjacent to a finger-4
/// note on a black key, in either order.
pub fn r7_three_white_four_black(a: MonoNote, b: MonoNote) -> Cost {
    let is_3_white_4_black = |x: MonoNote, y: MonoNote| {
        x.finger.get() == 3 && x.pitch.is_white() && y.finger.get() == 4 && y.pitch.is_black()
    };
    if is_3_white_4_black(a, b) || is_3_white_4_black(b, a) {
        Cost::whole(1)
    } else {
        Cost::ZERO
    }
}

/// R8: thumb on a black key, with an extra penalty for each white-key,
/// non-thumb neighbor.
pub fn r8_thumb_on_black(prev: Option<MonoNote>, curr: MonoNote, next: Option<MonoNote>) -> Cost {
    if !(curr.finger.is_thumb() && curr.pitch.is_black()) {
        return Cost::ZERO;
    }

    let mut cost = Cost::half();

    if let Some(p) = prev
        && !p.finger.is_thumb()
        && p.pitch.is_white()
    {
        cost += Cost::whole(1);
    }
    if let Some(n) = next
        && !n.finger.is_thumb()
        && n.pitch.is_white()
    {
        cost += Cost::whole(1);
    }

    cost
}

/// R9: little finger on a black key, with a penalty for each white-key,
/// non-little-finger neighbor.
pub fn r9_little_finger_on_black(prev: Option<MonoNote>, curr: MonoNote, next: Option<MonoNote>) -> Cost {
    if !(curr.finger.is_little() && curr.pitch.is_black()) {
        return Cost::ZERO;
    }

    let mut cost = Cost::ZERO;
    if let Some(p) = prev
        && !p.finger.is_little()
        && p.pitch.is_white()
    {
        cost += Cost::whole(1);
    }
    if let Some(n) = next
        && !n.finger.is_little()
        && n.pitch.is_white()
    {
        cost += Cost::whole(1);
    }

    cost
}

/// R10: a thumb crossing consecutive notes of the same key color.
pub fn r10_thumb_cross_same_color(a: MonoNote, b: MonoNote) -> Cost {
    let thumb_involved = a.finger.is_thumb() || b.finger.is_thumb();
    let same_color = a.pitch.is_black() == b.pitch.is_black();
    if thumb_involved && same_color {
        Cost::whole(1)
    } else {
        Cost::ZERO
    }
}

/// R11: a thumb-on-black note adjacent to a non-thumb white-key note.
pub fn r11_thumb_on_black_crossed_by_white(a: MonoNote, b: MonoNote) -> Cost {
    let thumb_black = |x: MonoNote| x.finger.is_thumb() && x.pitch.is_black();
    let other_white = |x: MonoNote| !x.finger.is_thumb() && x.pitch.is_white();
    if (thumb_black(a) && other_white(b)) || (thumb_black(b) && other_white(a)) {
        Cost::whole(2)
    } else {
        Cost::ZERO
    }
}

/// R12: same finger repeated across a triple whose middle pitch lies
/// strictly between the outer two.
pub fn r12_same_finger_repetition(first: MonoNote, middle: MonoNote, last: MonoNote) -> Cost {
    if first.finger != last.finger || first.pitch == last.pitch {
        return Cost::ZERO;
    }
    let lo = first.pitch.min(last.pitch);
    let hi = first.pitch.max(last.pitch);
    if lo < middle.pitch && middle.pitch < hi {
        Cost::whole(1)
    } else {
        Cost::ZERO
    }
}

/// R14: intra-chord cost, every pitch pair within one slice, cascading
/// with doubled Relaxed/Comfort weights.
pub fn r14_intra_chord(pitches: &[Pitch], fingers: &[Finger], side: Side) -> Cost {
    let mut cost = Cost::ZERO;
    for i in 0..pitches.len() {
        for j in (i + 1)..pitches.len() {
            let t = thresholds_for(fingers[i], fingers[j], side);
            let d = pitches[i].distance_to(pitches[j]);
            cost += intra_chord_cascade(&t, d);
        }
    }
    cost
}

/// R15: sticky-pitch rule, a re-struck pitch that changes finger between
/// two consecutive slices costs 1, regardless of whether either slice is a
/// chord or a single note.
pub fn r15_sticky_pitch(
    prev_pitches: &[Pitch],
    prev_fingers: &[Finger],
    curr_pitches: &[Pitch],
    curr_fingers: &[Finger],
) -> Cost {
    let mut cost = Cost::ZERO;
    for (pp, pf) in prev_pitches.iter().zip(prev_fingers) {
        for (cp, cf) in curr_pitches.iter().zip(curr_fingers) {
            if pp == cp && pf != cf {
                cost += Cost::whole(1);
            }
        }
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{Accidental, Step};

    fn p(step: Step, acc: Accidental, octave: i32) -> Pitch {
        Pitch::new(step, acc, octave)
    }

    fn f(n: u8) -> Finger {
        Finger::new(n).unwrap()
    }

    #[test]
    fn pair_cost_zero_inside_relaxed_band() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let e4 = p(Step::E, Accidental::Natural, 4);
        let note = r1_r2_r13_pair_cost(
            MonoNote::new(c4, f(1)),
            MonoNote::new(e4, f(2)),
            Side::Right,
        );
        assert!(note.is_zero());
    }

    #[test]
    fn r3_position_change_outside_comfort_band() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let g4 = p(Step::G, Accidental::Natural, 4);
        let c5 = p(Step::C, Accidental::Natural, 5);
        let first = MonoNote::new(c4, f(1));
        let middle = MonoNote::new(g4, f(2));
        let last = MonoNote::new(c5, f(3));
        // thresholds for (1,3): max_comf=12, d13=14, so the span check alone fires.
        assert_eq!(
            r3_triplet_position_change(first, middle, last, Side::Right),
            Cost::whole(1)
        );
    }

    #[test]
    fn r4_triplet_span_excess_matches_linear_formula() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let c5 = p(Step::C, Accidental::Natural, 5);
        let first = MonoNote::new(c4, f(1));
        let last = MonoNote::new(c5, f(3));
        // thresholds for (1,3): max_comf=12, d13=14, excess = 14-12 = 2.
        assert_eq!(r4_triplet_span_excess(first, last, Side::Right), Cost::whole(2));
    }

    #[test]
    fn r5_only_fires_on_finger_four() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        assert_eq!(r5_fourth_finger(MonoNote::new(c4, f(4))), Cost::whole(1));
        assert!(r5_fourth_finger(MonoNote::new(c4, f(3))).is_zero());
    }

    #[test]
    fn r6_three_four_pair_fires_either_order() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let d4 = p(Step::D, Accidental::Natural, 4);
        let a = MonoNote::new(c4, f(3));
        let b = MonoNote::new(d4, f(4));
        assert_eq!(r6_three_four_pair(a, b), Cost::whole(1));
        assert_eq!(r6_three_four_pair(b, a), Cost::whole(1));
        assert!(r6_three_four_pair(a, MonoNote::new(d4, f(2))).is_zero());
    }

    #[test]
    fn r7_c_sharp_example() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let cs4 = p(Step::C, Accidental::Sharp, 4);
        let a = MonoNote::new(c4, f(3));
        let b = MonoNote::new(cs4, f(4));
        assert_eq!(r7_three_white_four_black(a, b), Cost::whole(1));
    }

    #[test]
    fn r8_thumb_on_black_half_unit() {
        let cs4 = p(Step::C, Accidental::Sharp, 4);
        let curr = MonoNote::new(cs4, f(1));
        let cost = r8_thumb_on_black(None, curr, None);
        assert_eq!(cost, Cost::half());
        assert_eq!(cost.as_f64(), 0.5);
    }

    #[test]
    fn r8_adds_penalty_for_white_neighbors() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let cs4 = p(Step::C, Accidental::Sharp, 4);
        let d4 = p(Step::D, Accidental::Natural, 4);
        let prev = MonoNote::new(c4, f(2));
        let curr = MonoNote::new(cs4, f(1));
        let next = MonoNote::new(d4, f(2));
        let cost = r8_thumb_on_black(Some(prev), curr, Some(next));
        assert_eq!(cost, Cost::half() + Cost::whole(2));
    }

    #[test]
    fn r9_little_finger_on_black_penalizes_white_neighbors() {
        let cs4 = p(Step::C, Accidental::Sharp, 4);
        let c4 = p(Step::C, Accidental::Natural, 4);
        let d4 = p(Step::D, Accidental::Natural, 4);
        let prev = MonoNote::new(c4, f(3));
        let curr = MonoNote::new(cs4, f(5));
        let next = MonoNote::new(d4, f(3));
        let cost = r9_little_finger_on_black(Some(prev), curr, Some(next));
        assert_eq!(cost, Cost::whole(2));
        assert!(r9_little_finger_on_black(None, curr, None).is_zero());
    }

    #[test]
    fn r10_thumb_same_color_pair() {
        let e4 = p(Step::E, Accidental::Natural, 4);
        let f4 = p(Step::F, Accidental::Natural, 4);
        let a = MonoNote::new(e4, f(3));
        let b = MonoNote::new(f4, f(1));
        assert_eq!(r10_thumb_cross_same_color(a, b), Cost::whole(1));
    }

    #[test]
    fn r11_thumb_on_black_crossed_by_white_pair() {
        let cs4 = p(Step::C, Accidental::Sharp, 4);
        let d4 = p(Step::D, Accidental::Natural, 4);
        let a = MonoNote::new(cs4, f(1));
        let b = MonoNote::new(d4, f(2));
        assert_eq!(r11_thumb_on_black_crossed_by_white(a, b), Cost::whole(2));
        assert_eq!(r11_thumb_on_black_crossed_by_white(b, a), Cost::whole(2));
    }

    #[test]
    fn r12_requires_strictly_between() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let d4 = p(Step::D, Accidental::Natural, 4);
        let e4 = p(Step::E, Accidental::Natural, 4);
        let first = MonoNote::new(c4, f(2));
        let middle = MonoNote::new(d4, f(3));
        let last = MonoNote::new(e4, f(2));
        assert_eq!(r12_same_finger_repetition(first, middle, last), Cost::whole(1));

        // middle equal to an endpoint: no penalty
        let middle_eq = MonoNote::new(c4, f(3));
        assert!(r12_same_finger_repetition(first, middle_eq, last).is_zero());
    }

    #[test]
    fn r14_zero_on_comfortable_triad() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let e4 = p(Step::E, Accidental::Natural, 4);
        let g4 = p(Step::G, Accidental::Natural, 4);
        let cost = r14_intra_chord(&[c4, e4, g4], &[f(1), f(3), f(5)], Side::Right);
        assert!(cost.is_zero());
    }

    #[test]
    fn r14_five_note_chord_within_bounds() {
        let pitches = [
            p(Step::C, Accidental::Natural, 4),
            p(Step::D, Accidental::Natural, 4),
            p(Step::E, Accidental::Natural, 4),
            p(Step::F, Accidental::Natural, 4),
            p(Step::G, Accidental::Natural, 4),
        ];
        let fingers = [f(1), f(2), f(3), f(4), f(5)];
        let cost = r14_intra_chord(&pitches, &fingers, Side::Right);
        assert!(cost.is_zero());
    }

    #[test]
    fn r14_impossible_stretch_matches_exact_value() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let g5 = p(Step::G, Accidental::Natural, 5);
        // distance is 22 encoding units (one octave = 14, G4->G5 handled via octave+fifth)
        let d = c4.distance_to(g5);
        assert_eq!(d, 22);
        let cost = r14_intra_chord(&[c4, g5], &[f(1), f(5)], Side::Right);
        // thresholds for (1,5): MaxR=12, MaxC=14, MaxP=16
        let expected = 2 * (22 - 12) + 4 * (22 - 14) + 10 * (22 - 16);
        assert_eq!(cost, Cost::whole(expected as i64));
    }

    #[test]
    fn r15_penalizes_finger_change_on_restruck_pitch() {
        let c4 = p(Step::C, Accidental::Natural, 4);
        let cost_same = r15_sticky_pitch(&[c4], &[f(1)], &[c4], &[f(1)]);
        assert!(cost_same.is_zero());

        let cost_changed = r15_sticky_pitch(&[c4], &[f(1)], &[c4], &[f(2)]);
        assert_eq!(cost_changed, Cost::whole(1));
    }
}
