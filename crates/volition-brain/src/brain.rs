//! The per-agent decision loop: filter, expand, score, select, enact.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::warn;

use volition_core::{
    derive_seed, ActorId, AgentAction, CompletionFlag, ConfigError, Context, Pool, Registry,
    SplitMix64, Tag, Vec3, WorldMut,
};
use volition_tools::{DecisionEvent, DecisionSink, DecisionStage};

use crate::catalogue::Catalogue;
use crate::config::BrainConfig;
use crate::contexts::generate_contexts;
use crate::history::HistoryEntry;
use crate::scheduler::{ProximityTier, SchedulerConfig};
use crate::scorer::{self, SCORE_EPSILON};
use crate::selector::{self, ScoredCandidate};

struct CurrentAction<W: WorldMut + 'static> {
    instance: Box<dyn AgentAction<W>>,
    result: ScoredCandidate<W::Actor>,
    generation: u64,
}

/// One agent's decision engine.
///
/// Owns its catalogue, per-action history and current-action slot; shares the
/// provider registry and instance pool with every other brain of the same
/// world type. Updates are straight-line synchronous computations; running
/// action bodies are only observed through their completion flag and the
/// cancel/resume entry points.
pub struct Brain<W: WorldMut + 'static> {
    agent: W::Actor,
    config: BrainConfig,
    catalogue: Catalogue,
    history: Vec<HistoryEntry<W::Actor>>,
    registry: Arc<Registry<W>>,
    pool: Arc<Pool<W>>,

    current: Option<CurrentAction<W>>,
    completion: CompletionFlag,
    generation: u64,

    // Reused across updates; kept around for debug introspection.
    candidates: Vec<ScoredCandidate<W::Actor>>,

    stopped: bool,
    stopped_reason: String,
    paused: bool,
    pub(crate) queued: bool,
    pub(crate) was_prevented: bool,

    pub(crate) tier: ProximityTier,
    pub(crate) update_interval: f32,
    pub(crate) next_update_time: f64,

    rng: SplitMix64,
    sink: Option<Box<dyn DecisionSink + Send>>,
}

impl<W: WorldMut + 'static> Brain<W> {
    pub fn new(
        agent: W::Actor,
        config: BrainConfig,
        registry: Arc<Registry<W>>,
        pool: Arc<Pool<W>>,
    ) -> Self {
        let catalogue = Catalogue::build(&config);
        let history = vec![HistoryEntry::default(); catalogue.len()];
        let seed = derive_seed(0, agent.stable_id(), 0);
        Self {
            agent,
            config,
            catalogue,
            history,
            registry,
            pool,
            current: None,
            completion: CompletionFlag::new(),
            generation: 0,
            candidates: Vec::new(),
            stopped: true,
            stopped_reason: String::new(),
            paused: false,
            queued: false,
            was_prevented: false,
            tier: ProximityTier::OutOfRange,
            update_interval: 0.0,
            next_update_time: 0.0,
            rng: SplitMix64::new(seed),
            sink: None,
        }
    }

    pub fn agent(&self) -> W::Actor {
        self.agent
    }

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn history(&self) -> &[HistoryEntry<W::Actor>] {
        &self.history
    }

    pub fn tier(&self) -> ProximityTier {
        self.tier
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_action_in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_action_tag(&self) -> Option<&Tag> {
        self.current
            .as_ref()
            .map(|cur| &self.catalogue.defs()[cur.result.def_index].tag)
    }

    /// Live (decaying) score of the running action.
    pub fn current_score(&self) -> Option<f32> {
        self.current.as_ref().map(|cur| cur.result.score)
    }

    /// Replace the selection RNG stream; the scheduler does this on
    /// registration so whole-world runs are reproducible from one seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SplitMix64::new(seed);
    }

    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn DecisionSink + Send>>) {
        self.sink = sink;
    }

    /// Swap in a new configuration. The current action is cancelled first
    /// because catalogue indices do not survive a rebuild.
    pub fn set_config(&mut self, world: &mut W, now: f64, config: BrainConfig) {
        self.cancel_current(world, now, None);
        self.catalogue = Catalogue::build(&config);
        self.history = vec![HistoryEntry::default(); self.catalogue.len()];
        self.config = config;
        self.candidates.clear();
    }

    pub fn start_logic(&mut self) {
        self.stopped = false;
        self.paused = false;
        self.stopped_reason.clear();
    }

    /// Terminal until logic restarts. An update already queued when this is
    /// called becomes a no-op.
    pub fn stop_logic(&mut self, world: &mut W, now: f64, reason: &str) {
        self.stopped = true;
        self.stopped_reason = reason.to_string();
        self.cancel_current(world, now, None);
    }

    /// Suspend the update timer and cancel the running action.
    pub fn pause_logic(&mut self, world: &mut W, now: f64) {
        self.paused = true;
        self.cancel_current(world, now, None);
    }

    pub fn resume_logic(&mut self) {
        self.paused = false;
        self.stopped = false;
        self.stopped_reason.clear();
    }

    pub fn restart_logic(&mut self, world: &mut W, now: f64) {
        self.cancel_current(world, now, None);
        self.stopped = false;
        self.paused = false;
        self.stopped_reason.clear();
    }

    /// Whether any configured prevent-update tag is on self right now.
    pub fn update_prevented(&self, world: &W) -> bool {
        !self.config.prevent_update_tags.is_empty()
            && world.actor_has_any_tags(self.agent, &self.config.prevent_update_tags)
    }

    pub(crate) fn take_was_prevented(&mut self) -> bool {
        core::mem::take(&mut self.was_prevented)
    }

    /// Cancel the running action, record its end in history, and return the
    /// instance to the pool.
    pub fn cancel_current(&mut self, world: &mut W, now: f64, interrupter: Option<&Tag>) {
        if let Some(mut cur) = self.current.take() {
            cur.instance.cancel(world, interrupter);
            self.finish_action(cur, now, DecisionStage::Cancelled);
        }
    }

    /// Consume a pending completion signal from the running action, if any.
    /// Returns true when the action finished (history recorded, instance
    /// released); the caller should re-enqueue the brain immediately. Stale
    /// signals from abandoned instances are ignored by generation mismatch.
    pub fn take_completed(&mut self, now: f64) -> bool {
        let completed = self
            .current
            .as_ref()
            .is_some_and(|cur| self.completion.take(cur.generation));
        if !completed {
            return false;
        }
        if let Some(cur) = self.current.take() {
            self.finish_action(cur, now, DecisionStage::Completed);
        }
        true
    }

    fn finish_action(&mut self, cur: CurrentAction<W>, now: f64, stage: DecisionStage) {
        let def_index = cur.result.def_index;
        self.history[def_index].last_end_time = now;
        // Repetition penalties are cumulative; decay happens on timer ticks.
        self.history[def_index].repetition_penalty +=
            self.catalogue.defs()[def_index].repetition_penalty;
        let tag = self.catalogue.defs()[def_index].tag.clone();
        self.pool.release_action(&tag, cur.instance);
        self.emit(now, stage, tag.to_string(), 0.0);
    }

    /// One full deliberation. Preconditions checked at entry: authority,
    /// not stopped/paused, non-empty catalogue, interruptible current action.
    pub fn update(&mut self, world: &mut W, now: f64) {
        self.queued = false;

        if !world.has_authority(self.agent) {
            return;
        }
        // Catches updates queued before stop/pause took effect.
        if self.stopped || self.paused {
            return;
        }
        if self.catalogue.is_empty() {
            return;
        }
        if let Some(cur) = &self.current {
            let def = &self.catalogue.defs()[cur.result.def_index];
            if !(def.allow_interruptions && cur.instance.can_be_interrupted()) {
                return;
            }
        }

        self.emit(now, DecisionStage::UpdateBegin, "", 0.0);

        // Snapshot what the loop needs to know about the running action.
        let current_info = self.current.as_ref().map(|cur| {
            let def = &self.catalogue.defs()[cur.result.def_index];
            (
                cur.result.def_index,
                def.priority,
                def.interrupt_from_higher_priority_only
                    || cur.instance.interrupt_from_higher_priority_only(),
                cur.result.score,
            )
        });

        let registry = Arc::clone(&self.registry);
        let pool = Arc::clone(&self.pool);

        self.candidates.clear();
        let mut added_current = false;
        let mut group_priority = self.catalogue.defs()[0].priority;

        let world_view: &W = world;
        for i in 0..self.catalogue.len() {
            let def = &self.catalogue.defs()[i];

            if let Some((_, current_priority, higher_only, _)) = current_info {
                if higher_only && current_priority <= def.priority {
                    // Nothing of equal or lower priority can interrupt.
                    break;
                }
            }

            if def.priority != group_priority {
                if !self.candidates.is_empty() {
                    // Commit to the highest non-empty priority group.
                    break;
                }
                group_priority = def.priority;
            }

            if def.weight < SCORE_EPSILON {
                continue;
            }
            if !def.tag.is_valid() {
                warn!("{}", ConfigError::InvalidTag(def.tag.as_str().to_string()));
                continue;
            }
            if !registry.action_enabled(&def.tag) {
                continue;
            }
            if !def.required_tags.is_empty()
                && !world_view.actor_has_all_tags(self.agent, &def.required_tags)
            {
                continue;
            }
            if !def.blocking_tags.is_empty()
                && world_view.actor_has_any_tags(self.agent, &def.blocking_tags)
            {
                continue;
            }

            let mut ctxs = pool.vec::<Context<W::Actor>>();
            generate_contexts(world_view, &registry, &pool, self.agent, def, &mut ctxs);

            if self.sink.is_some() {
                let detail = self.catalogue.defs()[i].tag.to_string();
                let count = ctxs.len() as f32;
                self.emit(now, DecisionStage::ActionConsidered, detail, count);
            }

            for ctx in ctxs.iter() {
                let def = &self.catalogue.defs()[i];
                let mut score =
                    scorer::score_considerations(world_view, &registry, &pool, def, ctx);

                let is_current = self.current.as_ref().is_some_and(|cur| {
                    cur.result.def_index == i
                        && ctx.same_as(&cur.result.context, self.config.same_location_tolerance)
                });

                let is_current_def = matches!(current_info, Some((idx, ..)) if idx == i);
                let subtract_repetition =
                    !is_current_def && self.history[i].last_end_time > 0.0;
                let current_score = current_info.map(|(.., score)| score);

                score = selector::apply_adjustments(
                    score,
                    is_current,
                    current_score,
                    &self.history[i],
                    subtract_repetition,
                );

                // Scores at or below zero never qualify: a penalty or a
                // negative temp adjust can push a total under zero, and such
                // a candidate must not win by being the only one left.
                if score >= SCORE_EPSILON {
                    self.candidates.push(ScoredCandidate {
                        def_index: i,
                        context: ctx.clone(),
                        score,
                    });
                    if is_current {
                        added_current = true;
                    }
                    if self.sink.is_some() {
                        let detail = self.catalogue.defs()[i].tag.to_string();
                        self.emit(now, DecisionStage::Candidate, detail, score);
                    }
                }
            }
        }

        // The running action may have scored itself out of contention while
        // still holding a live score (it changed the state that made it valid
        // but has work left to do). Keep it in the running so a still-viable
        // action is not cancelled over transient state.
        if !added_current {
            if let Some(cur) = &self.current {
                if cur.result.score > 0.0 {
                    self.candidates.push(cur.result.clone());
                }
            }
        }

        self.choose_from_candidates(world, now);
    }

    fn choose_from_candidates(&mut self, world: &mut W, now: f64) {
        if self.candidates.is_empty() {
            return;
        }
        selector::sort_descending(&mut self.candidates);

        // All candidates come from one priority group.
        let priority = self.catalogue.defs()[self.candidates[0].def_index].priority;
        let (method, top_n) = self.config.choice_for(priority);

        let Some(index) = selector::choose(&self.candidates, method, top_n, &mut self.rng) else {
            return;
        };
        let candidate = self.candidates[index].clone();
        self.enact(world, now, candidate);
    }

    fn enact(&mut self, world: &mut W, now: f64, candidate: ScoredCandidate<W::Actor>) {
        let def_index = candidate.def_index;

        let same_as_current = match &self.current {
            Some(cur) if cur.result.def_index == def_index => candidate
                .context
                .same_as(&cur.result.context, self.config.same_location_tolerance),
            _ => false,
        };

        if same_as_current {
            // Already running it: refresh the live score and let the body
            // react to the (possibly slightly different) context.
            if let Some(cur) = self.current.as_mut() {
                cur.result.score = candidate.score;
                cur.instance.resume(
                    world,
                    &candidate.context,
                    &self.catalogue.defs()[def_index].action_params,
                );
            }
            if self.sink.is_some() {
                let detail = self.catalogue.defs()[def_index].tag.to_string();
                self.emit(now, DecisionStage::Continued, detail, candidate.score);
            }
            return;
        }

        let previous_tag = self
            .current
            .as_ref()
            .map(|cur| self.catalogue.defs()[cur.result.def_index].tag.clone());
        self.cancel_current(world, now, None);

        // New action: inertia joins the score now.
        let score = candidate.score + self.catalogue.defs()[def_index].inertia;
        self.generation += 1;
        let handle = self.completion.issue(self.generation);
        let tag = self.catalogue.defs()[def_index].tag.clone();

        match self.pool.reserve_action(&self.registry, &tag) {
            Some(mut instance) => {
                // History records the start so score cooldown has a baseline.
                self.history[def_index].last_start_time = now;
                self.history[def_index].last_run_score = score;
                self.history[def_index].last_context = Some(candidate.context.clone());
                instance.perform(
                    world,
                    self.agent,
                    &candidate.context,
                    &self.catalogue.defs()[def_index].action_params,
                    previous_tag.as_ref(),
                    handle,
                );
                self.current = Some(CurrentAction {
                    instance,
                    result: ScoredCandidate {
                        def_index,
                        context: candidate.context,
                        score,
                    },
                    generation: self.generation,
                });
                self.emit(now, DecisionStage::Started, tag.to_string(), score);
            }
            None => {
                warn!("{}", ConfigError::NoActionClass(tag));
                self.current = None;
            }
        }
    }

    /// Background decay, run once per timer tick with the elapsed interval.
    ///
    /// The running action's retained score bleeds away at a rate set by its
    /// last run score; repetition penalties on non-current actions decay
    /// toward zero; temp adjusts approach zero without overshooting.
    pub fn run_cooldowns(&mut self, dt: f32) {
        if let Some(cur) = self.current.as_mut() {
            if cur.result.score > 0.0 {
                let def = &self.catalogue.defs()[cur.result.def_index];
                if def.score_cooldown_time > 0.0 {
                    let decay = self.history[cur.result.def_index].last_run_score
                        * (dt / def.score_cooldown_time);
                    cur.result.score = (cur.result.score - decay).max(0.0);
                } else {
                    cur.result.score = 0.0;
                }
            }
        }

        let current_index = self.current.as_ref().map(|cur| cur.result.def_index);
        for (i, entry) in self.history.iter_mut().enumerate() {
            let def = &self.catalogue.defs()[i];
            if entry.repetition_penalty > 0.0 && Some(i) != current_index {
                if def.repetition_penalty_cooldown > 0.0 {
                    let decay = def.repetition_penalty * (dt / def.repetition_penalty_cooldown);
                    entry.repetition_penalty = (entry.repetition_penalty - decay).max(0.0);
                } else {
                    entry.repetition_penalty = 0.0;
                }
            }
            entry.decay_temp_adjust(dt);
        }
    }

    /// Seconds since any action with this tag last completed. Measured from
    /// the end time so an action can ask about its own previous run while
    /// executing; infinite when the tag never ran.
    pub fn time_since_performed(&self, tag: &Tag, now: f64) -> f64 {
        let mut last = f64::NEG_INFINITY;
        for (i, def) in self.catalogue.defs().iter().enumerate() {
            if def.tag == *tag {
                last = last.max(self.history[i].last_end_time);
            }
        }
        now - last
    }

    /// Set the temp score adjustment on every catalogue entry with this tag.
    pub fn set_temp_adjust(&mut self, tag: &Tag, value: f32, cooldown: f32) {
        for i in self.indices_for_tag(tag) {
            self.history[i].set_temp_adjust(value, cooldown);
        }
    }

    /// Stack a temp score adjustment on every catalogue entry with this tag.
    pub fn add_temp_adjust(&mut self, tag: &Tag, value: f32, cooldown: f32) {
        for i in self.indices_for_tag(tag) {
            self.history[i].add_temp_adjust(value, cooldown);
        }
    }

    pub fn clear_temp_adjust(&mut self, tag: &Tag) {
        for i in self.indices_for_tag(tag) {
            self.history[i].clear_temp_adjust();
        }
    }

    pub fn clear_all_temp_adjusts(&mut self) {
        for entry in &mut self.history {
            entry.clear_temp_adjust();
        }
    }

    fn indices_for_tag(&self, tag: &Tag) -> Vec<usize> {
        self.catalogue
            .defs()
            .iter()
            .enumerate()
            .filter(|(_, def)| def.tag == *tag)
            .map(|(i, _)| i)
            .collect()
    }

    /// Minimum squared distance from this agent to any player, for tiering.
    pub(crate) fn distance_to_players_sq(&self, world: &W) -> f32 {
        let Some(position) = world.position_of(self.agent) else {
            return f32::MAX;
        };
        let mut players = self.pool.vec::<Vec3>();
        world.player_positions(&mut players);
        players
            .iter()
            .map(|p| position.distance_squared(*p))
            .fold(f32::MAX, f32::min)
    }

    /// Recompute the proximity tier. On a tier (or interval) change the
    /// update timer restarts with a random initial delay in `[0, interval)`
    /// so agents de-synchronize; otherwise the next firing is one interval
    /// out.
    pub(crate) fn refresh_tier(
        &mut self,
        world: &W,
        config: &SchedulerConfig,
        now: f64,
        rng: &mut SplitMix64,
    ) {
        let dist_sq = self.distance_to_players_sq(world);
        let (tier, interval) = config.classify(dist_sq);
        if tier != self.tier || interval != self.update_interval {
            self.tier = tier;
            self.update_interval = interval;
            self.next_update_time = now + rng.next_f32_range(0.0, interval) as f64;
        } else {
            self.next_update_time = now + interval as f64;
        }
    }

    /// Multi-line state dump for on-screen debug text.
    pub fn debug_summary(&self) -> String {
        let mut out = format!(
            "Tier: {:?}  Update interval: {:.2}\n",
            self.tier, self.update_interval
        );
        if self.stopped {
            out.push_str(&format!("Logic stopped: {}\n", self.stopped_reason));
        }
        if let Some(cur) = &self.current {
            let def = &self.catalogue.defs()[cur.result.def_index];
            let name = if def.description.is_empty() {
                def.tag.as_str()
            } else {
                &def.description
            };
            let original = self.history[cur.result.def_index].last_run_score;
            out.push_str(&format!(
                "Current action: {name}\nOriginal score: {original:.2}\nLive score: {:.2}",
                cur.result.score
            ));
        }
        out
    }

    /// The last update's candidate list, best first.
    pub fn debug_candidates(&self) -> Vec<String> {
        self.candidates
            .iter()
            .map(|candidate| {
                let def = &self.catalogue.defs()[candidate.def_index];
                let name = if def.description.is_empty() {
                    def.tag.as_str()
                } else {
                    &def.description
                };
                format!("{name}  {:.2}", candidate.score)
            })
            .collect()
    }

    fn emit(
        &mut self,
        now: f64,
        stage: DecisionStage,
        detail: impl Into<Cow<'static, str>>,
        value: f32,
    ) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(
                DecisionEvent::new(now, self.agent.stable_id(), stage)
                    .with_detail(detail)
                    .with_value(value),
            );
        }
    }
}
