//! World-level pacing: periodic timers, proximity tiering, and a budgeted
//! update queue shared by every agent.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use volition_core::{derive_seed, ActorId, SplitMix64, WorldMut};

use crate::brain::Brain;

/// Coarse distance bucket deciding how often an agent re-deliberates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProximityTier {
    Near,
    MidRange,
    Far,
    /// Keeps re-checking distance but never enqueues updates.
    OutOfRange,
}

/// Tuning surface for the scheduler: tier thresholds, per-tier update
/// intervals, the per-tick wall-clock budget, and the world seed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    pub near_max_distance: f32,
    pub mid_max_distance: f32,
    pub far_max_distance: f32,
    pub near_interval: f32,
    pub mid_interval: f32,
    pub far_interval: f32,
    /// Distance re-check interval for out-of-range agents.
    pub out_of_range_interval: f32,
    pub update_on_perception_changes: bool,
    /// Wall-clock budget for draining the update queue each tick. At least
    /// one pending brain is updated regardless.
    pub frame_budget_seconds: f64,
    /// Seeds every brain's selection RNG and the timer jitter.
    pub seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            near_max_distance: 2500.0,
            mid_max_distance: 5000.0,
            far_max_distance: 10000.0,
            near_interval: 0.5,
            mid_interval: 1.0,
            far_interval: 2.0,
            out_of_range_interval: 5.0,
            update_on_perception_changes: true,
            frame_budget_seconds: 0.002,
            seed: 0,
        }
    }
}

impl SchedulerConfig {
    /// Bucket a squared distance. Thresholds are plain distances, so they
    /// compare against their own squares.
    pub(crate) fn classify(&self, dist_sq: f32) -> (ProximityTier, f32) {
        if dist_sq <= self.near_max_distance * self.near_max_distance {
            (ProximityTier::Near, self.near_interval)
        } else if dist_sq <= self.mid_max_distance * self.mid_max_distance {
            (ProximityTier::MidRange, self.mid_interval)
        } else if dist_sq <= self.far_max_distance * self.far_max_distance {
            (ProximityTier::Far, self.far_interval)
        } else {
            (ProximityTier::OutOfRange, self.out_of_range_interval)
        }
    }
}

/// Stable identifier for a brain registered with a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrainHandle(usize);

/// Owns the brains of one world and paces their updates.
///
/// Brains re-enqueue through per-brain periodic timers (interval by
/// proximity tier), action completions, perception changes, and explicit
/// requests; the queue drains FIFO each tick under a wall-clock budget, and
/// whatever does not fit stays queued for the next tick.
pub struct WorldScheduler<W: WorldMut + 'static> {
    config: SchedulerConfig,
    brains: Vec<Brain<W>>,
    queue: VecDeque<BrainHandle>,
    rng: SplitMix64,
}

impl<W: WorldMut + 'static> WorldScheduler<W> {
    pub fn new(config: SchedulerConfig) -> Self {
        let rng = SplitMix64::new(derive_seed(config.seed, 0, 1));
        Self {
            config,
            brains: Vec::new(),
            queue: VecDeque::new(),
            rng,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Register a brain, start its logic, and arm its update timer. The
    /// returned handle stays valid for the scheduler's lifetime.
    pub fn add_brain(&mut self, world: &W, mut brain: Brain<W>, now: f64) -> BrainHandle {
        brain.reseed(derive_seed(
            self.config.seed,
            brain.agent().stable_id(),
            0,
        ));
        brain.start_logic();
        brain.refresh_tier(world, &self.config, now, &mut self.rng);
        let handle = BrainHandle(self.brains.len());
        self.brains.push(brain);
        handle
    }

    pub fn brain(&self, handle: BrainHandle) -> &Brain<W> {
        &self.brains[handle.0]
    }

    pub fn brain_mut(&mut self, handle: BrainHandle) -> &mut Brain<W> {
        &mut self.brains[handle.0]
    }

    pub fn len(&self) -> usize {
        self.brains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    /// Updates waiting in the queue right now.
    pub fn pending_updates(&self) -> usize {
        self.queue.len()
    }

    /// Ask for an update on the next tick. Idempotent per brain: enqueueing
    /// one that is already pending is a no-op. While an update-prevention tag
    /// is on self, the request is remembered instead and replayed by
    /// [`notify_prevent_tags_cleared`](Self::notify_prevent_tags_cleared).
    pub fn queue_update(&mut self, world: &W, handle: BrainHandle) {
        let brain = &mut self.brains[handle.0];
        if brain.queued {
            return;
        }
        if brain.update_prevented(world) {
            brain.was_prevented = true;
            return;
        }
        brain.queued = true;
        brain.was_prevented = false;
        self.queue.push_back(handle);
    }

    /// The host observed the brain's prevent-update tag set emptying; replay
    /// a held-back update request immediately.
    pub fn notify_prevent_tags_cleared(&mut self, world: &W, handle: BrainHandle) {
        if self.brains[handle.0].take_was_prevented() {
            self.queue_update(world, handle);
        }
    }

    /// The host observed a perception change on this agent.
    pub fn notify_perception_changed(&mut self, world: &W, handle: BrainHandle) {
        if !self.config.update_on_perception_changes {
            return;
        }
        if self.brains[handle.0].tier != ProximityTier::OutOfRange {
            self.queue_update(world, handle);
        }
    }

    /// One scheduler tick at simulated time `now`:
    ///
    /// 1. Collect completion signals (finished actions re-enqueue at once).
    /// 2. Fire due per-brain timers: run score cooldowns for the elapsed
    ///    interval, re-tier, and enqueue unless out of range.
    /// 3. Drain the queue under the wall-clock budget; leftovers stay queued.
    pub fn tick(&mut self, world: &mut W, now: f64) {
        for i in 0..self.brains.len() {
            if self.brains[i].take_completed(now) {
                self.queue_update(world, BrainHandle(i));
            }
        }

        for i in 0..self.brains.len() {
            let due = {
                let brain = &self.brains[i];
                !brain.is_stopped() && !brain.is_paused() && now >= brain.next_update_time
            };
            if !due {
                continue;
            }
            let interval = self.brains[i].update_interval;
            self.brains[i].run_cooldowns(interval);
            {
                let Self {
                    brains,
                    config,
                    rng,
                    ..
                } = self;
                brains[i].refresh_tier(world, config, now, rng);
            }
            if self.brains[i].tier != ProximityTier::OutOfRange {
                self.queue_update(world, BrainHandle(i));
            }
        }

        let budget = Duration::from_secs_f64(self.config.frame_budget_seconds.max(0.0));
        let started = Instant::now();
        let mut drained = 0usize;
        while let Some(handle) = self.queue.front().copied() {
            if drained > 0 && started.elapsed() >= budget {
                break;
            }
            self.queue.pop_front();
            self.brains[handle.0].update(world, now);
            drained += 1;
        }
    }
}
