use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which step of a deliberation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecisionStage {
    /// A brain update began.
    UpdateBegin,
    /// An action passed its filters; `value` carries the context count.
    ActionConsidered,
    /// An action was skipped by a filter or a config problem.
    ActionSkipped,
    /// One (action, context) candidate scored; `value` is the total score.
    Candidate,
    /// The update finished by continuing the running action.
    Continued,
    /// The update finished by starting a new action; `value` is the score
    /// including inertia.
    Started,
    /// A running action was cancelled.
    Cancelled,
    /// A running action signalled completion.
    Completed,
}

/// One trace record, small enough to emit for every candidate.
///
/// Deliberately dumb data so it can be recorded during simulation and later
/// rendered by tooling; `detail` typically holds an action tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionEvent {
    pub time: f64,
    /// Stable id of the deciding agent.
    pub agent: u64,
    pub stage: DecisionStage,
    pub detail: Cow<'static, str>,
    pub value: f32,
}

impl DecisionEvent {
    pub fn new(time: f64, agent: u64, stage: DecisionStage) -> Self {
        Self {
            time,
            agent,
            stage,
            detail: Cow::Borrowed(""),
            value: 0.0,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Cow<'static, str>>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }
}

/// Receiver for decision events.
pub trait DecisionSink {
    fn record(&mut self, event: DecisionEvent);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl DecisionSink for NullSink {
    fn record(&mut self, _event: DecisionEvent) {}
}

/// Collects events in memory, for tests and inspectors.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<DecisionEvent>,
}

impl MemorySink {
    /// Events for one stage, in arrival order.
    pub fn stage(&self, stage: DecisionStage) -> impl Iterator<Item = &DecisionEvent> {
        self.events.iter().filter(move |e| e.stage == stage)
    }
}

impl DecisionSink for MemorySink {
    fn record(&mut self, event: DecisionEvent) {
        self.events.push(event);
    }
}
