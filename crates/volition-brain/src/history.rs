use volition_core::{ActorId, Context};

/// Per-action bookkeeping carried between updates.
#[derive(Debug, Clone)]
pub struct HistoryEntry<A: ActorId> {
    pub last_start_time: f64,
    pub last_end_time: f64,
    /// Score the action was last started with, inertia included. Drives
    /// score cooldown while the action runs.
    pub last_run_score: f32,
    pub last_context: Option<Context<A>>,
    /// Cumulative, decaying subtraction applied while this action is not the
    /// running one. Never negative.
    pub repetition_penalty: f32,
    /// Externally-set signed bias that linearly returns to zero.
    pub temp_score_adjust: f32,
    /// Magnitude of temp-adjust decay per second.
    pub temp_adjust_cooldown_rate: f32,
}

impl<A: ActorId> Default for HistoryEntry<A> {
    fn default() -> Self {
        Self {
            last_start_time: 0.0,
            last_end_time: 0.0,
            last_run_score: 0.0,
            last_context: None,
            repetition_penalty: 0.0,
            temp_score_adjust: 0.0,
            temp_adjust_cooldown_rate: 0.0,
        }
    }
}

impl<A: ActorId> HistoryEntry<A> {
    /// Replace the temp adjust; it decays back to zero over `cooldown`
    /// seconds (or holds indefinitely when `cooldown` is zero).
    pub fn set_temp_adjust(&mut self, value: f32, cooldown: f32) {
        self.temp_score_adjust = value;
        self.temp_adjust_cooldown_rate = if cooldown > 0.0 {
            value.abs() / cooldown
        } else {
            0.0
        };
    }

    /// Stack another adjustment on top, folding the remaining cooldown time
    /// of the previous one into the new decay rate.
    pub fn add_temp_adjust(&mut self, value: f32, cooldown: f32) {
        let remaining = if self.temp_score_adjust != 0.0 && self.temp_adjust_cooldown_rate > 0.0 {
            self.temp_score_adjust.abs() / self.temp_adjust_cooldown_rate
        } else {
            0.0
        };
        self.temp_score_adjust += value;
        let total = cooldown + remaining;
        self.temp_adjust_cooldown_rate = if total > 0.0 {
            self.temp_score_adjust.abs() / total
        } else {
            0.0
        };
    }

    pub fn clear_temp_adjust(&mut self) {
        self.temp_score_adjust = 0.0;
        self.temp_adjust_cooldown_rate = 0.0;
    }

    /// Move the temp adjust toward zero without overshooting; the sign never
    /// flips from decay alone.
    pub(crate) fn decay_temp_adjust(&mut self, dt: f32) {
        if self.temp_score_adjust == 0.0 || self.temp_adjust_cooldown_rate <= 0.0 {
            return;
        }
        let step = self.temp_adjust_cooldown_rate * dt;
        if self.temp_score_adjust > 0.0 {
            self.temp_score_adjust = (self.temp_score_adjust - step).max(0.0);
        } else {
            self.temp_score_adjust = (self.temp_score_adjust + step).min(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Entry = HistoryEntry<u64>;

    #[test]
    fn temp_adjust_decays_to_zero_without_overshoot() {
        let mut h = Entry::default();
        h.set_temp_adjust(2.0, 4.0);
        h.decay_temp_adjust(3.0);
        assert!((h.temp_score_adjust - 0.5).abs() < 1e-6);
        h.decay_temp_adjust(10.0);
        assert_eq!(h.temp_score_adjust, 0.0);
    }

    #[test]
    fn negative_temp_adjust_rises_to_zero() {
        let mut h = Entry::default();
        h.set_temp_adjust(-3.0, 3.0);
        h.decay_temp_adjust(1.0);
        assert!((h.temp_score_adjust + 2.0).abs() < 1e-6);
        h.decay_temp_adjust(5.0);
        assert_eq!(h.temp_score_adjust, 0.0);
    }

    #[test]
    fn add_temp_adjust_folds_in_remaining_cooldown() {
        let mut h = Entry::default();
        h.set_temp_adjust(4.0, 4.0); // 4 seconds remaining at rate 1/s
        h.decay_temp_adjust(2.0); // 2.0 left, 2 seconds remaining
        h.add_temp_adjust(4.0, 4.0); // 6.0 total over 6 seconds
        assert!((h.temp_score_adjust - 6.0).abs() < 1e-6);
        assert!((h.temp_adjust_cooldown_rate - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_cooldown_holds_the_adjust() {
        let mut h = Entry::default();
        h.set_temp_adjust(1.5, 0.0);
        h.decay_temp_adjust(100.0);
        assert_eq!(h.temp_score_adjust, 1.5);
    }
}
