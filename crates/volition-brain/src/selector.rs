//! Candidate adjustment and choice-method selection.

use core::cmp::Ordering;

use volition_core::{ActorId, Context, SplitMix64};

use crate::config::ChoiceMethod;
use crate::history::HistoryEntry;
use crate::scorer::SCORE_EPSILON;

/// One scored (action, context) pair. The brain also retains one of these
/// for the currently running action, with its live (decaying) score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<A: ActorId> {
    /// Index into the brain's catalogue.
    pub def_index: usize,
    pub context: Context<A>,
    pub score: f32,
}

/// Post-scoring adjustments applied to each candidate before it enters the
/// list: current-score retention, repetition penalty, temp adjust.
pub(crate) fn apply_adjustments<A: ActorId>(
    mut score: f32,
    is_current: bool,
    current_score: Option<f32>,
    history: &HistoryEntry<A>,
    subtract_repetition: bool,
) -> f32 {
    if is_current {
        // Keep the previous (inertia-boosted, slowly decaying) score when it
        // beats the fresh one, so a transient dip does not flap the action.
        if let Some(live) = current_score {
            if live > score {
                score = live;
            }
        }
    }
    if subtract_repetition {
        score -= history.repetition_penalty;
    }
    if history.temp_score_adjust.abs() > SCORE_EPSILON {
        score += history.temp_score_adjust;
    }
    score
}

/// Stable descending sort; ties keep insertion (priority/declaration) order.
pub(crate) fn sort_descending<A: ActorId>(candidates: &mut [ScoredCandidate<A>]) {
    candidates.sort_by(|l, r| r.score.partial_cmp(&l.score).unwrap_or(Ordering::Equal));
}

/// Pick a winner from a descending-sorted candidate list. Returns an index
/// into `candidates`.
pub(crate) fn choose<A: ActorId>(
    candidates: &[ScoredCandidate<A>],
    method: ChoiceMethod,
    top_n: u32,
    rng: &mut SplitMix64,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    if method == ChoiceMethod::HighestScoring {
        return Some(0);
    }

    let best = candidates[0].score;
    let score_floor = match method {
        ChoiceMethod::WeightedRandomTopNPercent => best - best * (top_n as f32 / 100.0),
        _ => f32::NEG_INFINITY,
    };

    let mut eligible = 0usize;
    let mut total = 0.0f32;
    for (i, candidate) in candidates.iter().enumerate() {
        if method == ChoiceMethod::WeightedRandomTopN && i as u32 == top_n {
            break;
        }
        if method == ChoiceMethod::WeightedRandomTopNPercent && candidate.score < score_floor {
            break;
        }
        // Negative scores would corrupt the weighted draw; the list is
        // sorted, so nothing after this point is eligible either.
        if candidate.score <= 0.0 {
            break;
        }
        total += candidate.score;
        eligible += 1;
    }

    if eligible == 0 || total <= 0.0 {
        return Some(0);
    }

    let roll = rng.next_f32_range(0.0, total);
    let mut accum = 0.0f32;
    for (i, candidate) in candidates[..eligible].iter().enumerate() {
        accum += candidate.score;
        if roll < accum {
            return Some(i);
        }
    }
    Some(eligible - 1)
}
