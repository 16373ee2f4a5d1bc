//! Shared test world, providers and actions for the brain tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use volition_brain::{ActionDef, Brain, BrainConfig, Consideration};
use volition_tools::{DecisionEvent, DecisionSink, DecisionStage};
use volition_core::{
    AgentAction, CompletionHandle, Context, ContextValue, ParamMap, Pool, QueryKind,
    QueryProvider, Registry, Tag, Vec3, WorldMut, WorldView,
};

pub const AGENT: u64 = 1;

#[derive(Default)]
pub struct TestWorld {
    pub no_authority: bool,
    pub actor_tags: BTreeMap<u64, Vec<Tag>>,
    pub positions: BTreeMap<u64, Vec3>,
    pub players: Vec<Vec3>,
    /// Values the `value_input` providers read.
    pub values: BTreeMap<&'static str, f32>,
    /// Lifecycle log written by scripted actions.
    pub log: Vec<String>,
    /// Completion handle of the most recently performed action.
    pub completion: Option<CompletionHandle>,
}

impl WorldView for TestWorld {
    type Actor = u64;

    fn has_authority(&self, _actor: u64) -> bool {
        !self.no_authority
    }

    fn actor_has_tag(&self, actor: u64, tag: &Tag) -> bool {
        self.actor_tags
            .get(&actor)
            .is_some_and(|tags| tags.contains(tag))
    }

    fn position_of(&self, actor: u64) -> Option<Vec3> {
        self.positions.get(&actor).copied()
    }

    fn player_positions(&self, out: &mut Vec<Vec3>) {
        out.extend(self.players.iter().copied());
    }
}

impl WorldMut for TestWorld {}

/// Logs its lifecycle into the world and parks its completion handle there
/// so tests can finish it at will.
pub struct ScriptedAction {
    pub name: String,
}

impl AgentAction<TestWorld> for ScriptedAction {
    fn perform(
        &mut self,
        world: &mut TestWorld,
        _agent: u64,
        ctx: &Context<u64>,
        _params: &ParamMap,
        _previous: Option<&Tag>,
        completion: CompletionHandle,
    ) {
        world.log.push(format!(
            "perform {} target={:?} location={:?}",
            self.name, ctx.target, ctx.location
        ));
        world.completion = Some(completion);
    }

    fn resume(&mut self, world: &mut TestWorld, _ctx: &Context<u64>, _params: &ParamMap) {
        world.log.push(format!("resume {}", self.name));
    }

    fn cancel(&mut self, world: &mut TestWorld, _interrupter: Option<&Tag>) {
        world.log.push(format!("cancel {}", self.name));
    }
}

/// Uncorrelated target query with fixed results.
pub struct StaticTargets(pub Vec<u64>);

impl QueryProvider<TestWorld> for StaticTargets {
    fn kind(&self) -> QueryKind {
        QueryKind::Target
    }

    fn run(
        &self,
        _world: &TestWorld,
        _agent: u64,
        _max_frequency: f32,
        _params: &ParamMap,
        out: &mut Vec<ContextValue<u64>>,
    ) {
        out.extend(self.0.iter().map(|t| ContextValue::Actor(*t)));
    }
}

/// Uncorrelated location query with fixed results.
pub struct StaticLocations(pub Vec<Vec3>);

impl QueryProvider<TestWorld> for StaticLocations {
    fn kind(&self) -> QueryKind {
        QueryKind::Location
    }

    fn run(
        &self,
        _world: &TestWorld,
        _agent: u64,
        _max_frequency: f32,
        _params: &ParamMap,
        out: &mut Vec<ContextValue<u64>>,
    ) {
        out.extend(self.0.iter().map(|l| ContextValue::Location(*l)));
    }
}

/// Correlated location query: results depend on the partial context's target.
pub struct PerTargetLocations(pub BTreeMap<u64, Vec<Vec3>>);

impl QueryProvider<TestWorld> for PerTargetLocations {
    fn kind(&self) -> QueryKind {
        QueryKind::Location
    }

    fn correlated(&self) -> bool {
        true
    }

    fn run(
        &self,
        _world: &TestWorld,
        _agent: u64,
        _max_frequency: f32,
        _params: &ParamMap,
        _out: &mut Vec<ContextValue<u64>>,
    ) {
    }

    fn run_correlated(
        &self,
        _world: &TestWorld,
        _agent: u64,
        ctx: &Context<u64>,
        _params: &ParamMap,
        out: &mut Vec<ContextValue<u64>>,
    ) {
        if let Some(locations) = ctx.target.and_then(|t| self.0.get(&t)) {
            out.extend(locations.iter().map(|l| ContextValue::Location(*l)));
        }
    }
}

/// Uncorrelated named-value query with fixed float results.
pub struct NamedFloats {
    pub name: String,
    pub values: Vec<f32>,
}

impl QueryProvider<TestWorld> for NamedFloats {
    fn kind(&self) -> QueryKind {
        QueryKind::Named(self.name.clone())
    }

    fn run(
        &self,
        _world: &TestWorld,
        _agent: u64,
        _max_frequency: f32,
        _params: &ParamMap,
        out: &mut Vec<ContextValue<u64>>,
    ) {
        out.extend(self.values.iter().map(|v| ContextValue::Float(*v)));
    }
}

pub fn setup() -> (Arc<Registry<TestWorld>>, Arc<Pool<TestWorld>>) {
    (Arc::new(Registry::new()), Arc::new(Pool::new()))
}

/// Register a `ScriptedAction` class for `tag`, logging under the tag's
/// leaf segment.
pub fn register_scripted(registry: &Registry<TestWorld>, tag: &str) {
    let name = Tag::new(tag).leaf().to_string();
    registry.register_action_class(
        Tag::new(tag),
        Arc::new(move || {
            Box::new(ScriptedAction { name: name.clone() }) as Box<dyn AgentAction<TestWorld>>
        }),
    );
}

/// Register an input that reads `world.values[key]` (0 when unset).
pub fn register_value_input(registry: &Registry<TestWorld>, tag: &str, key: &'static str) {
    registry.register_input(
        Tag::new(tag),
        Arc::new(move |world: &TestWorld, _: &Context<u64>, _: &ParamMap| {
            world.values.get(key).copied().unwrap_or(0.0)
        }),
    );
}

pub fn register_constant_input(registry: &Registry<TestWorld>, tag: &str, value: f32) {
    registry.register_input(
        Tag::new(tag),
        Arc::new(move |_: &TestWorld, _: &Context<u64>, _: &ParamMap| value),
    );
}

pub fn action(tag: &str) -> ActionDef {
    ActionDef {
        tag: Tag::new(tag),
        ..ActionDef::default()
    }
}

pub fn consider(input_tag: &str) -> Consideration {
    Consideration {
        input_tag: Tag::new(input_tag),
        ..Consideration::default()
    }
}

pub fn config_with(actions: Vec<ActionDef>) -> BrainConfig {
    BrainConfig {
        actions,
        ..BrainConfig::default()
    }
}

/// A brain ready to update directly (logic started).
pub fn started_brain(
    actions: Vec<ActionDef>,
    registry: &Arc<Registry<TestWorld>>,
    pool: &Arc<Pool<TestWorld>>,
) -> Brain<TestWorld> {
    let mut brain = Brain::new(
        AGENT,
        config_with(actions),
        Arc::clone(registry),
        Arc::clone(pool),
    );
    brain.start_logic();
    brain
}

/// Trace sink whose event buffer stays readable after the sink moves into
/// the brain.
#[derive(Clone, Default)]
pub struct SharedSink(pub Arc<Mutex<Vec<DecisionEvent>>>);

impl DecisionSink for SharedSink {
    fn record(&mut self, event: DecisionEvent) {
        self.0.lock().unwrap().push(event);
    }
}

/// Attach a shared sink and return the buffer it fills.
pub fn attach_sink(brain: &mut Brain<TestWorld>) -> Arc<Mutex<Vec<DecisionEvent>>> {
    let sink = SharedSink::default();
    let events = Arc::clone(&sink.0);
    brain.set_trace_sink(Some(Box::new(sink)));
    events
}

/// Count recorded events of one stage.
pub fn stage_count(events: &Arc<Mutex<Vec<DecisionEvent>>>, stage: DecisionStage) -> usize {
    events.lock().unwrap().iter().filter(|e| e.stage == stage).count()
}

/// Finish the running action by firing the handle its `perform` parked in
/// the world, then letting the brain observe it.
pub fn complete_current(world: &mut TestWorld, brain: &mut Brain<TestWorld>, now: f64) -> bool {
    if let Some(handle) = world.completion.take() {
        handle.complete();
    }
    brain.take_completed(now)
}
