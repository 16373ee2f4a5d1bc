//! Brain configuration: action definitions, referenced sets, and selection
//! policy. All of it is plain serializable data; hosts load it however they
//! load assets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use volition_core::{Curve, Param, ParamMap, Tag};

/// One query an action runs while generating evaluation contexts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuerySpec {
    pub query_tag: Tag,
    pub params: ParamMap,
    /// Upper bound, in seconds, on how often uncorrelated results need
    /// recomputing; providers may serve cached results younger than this.
    pub max_frequency: f32,
}

/// One scoring factor: input, bookend normalization, response curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Consideration {
    pub input_tag: Tag,
    pub description: String,
    pub params: ParamMap,
    /// Raw input value that normalizes to 0. May be an auto-parameter.
    pub bookend_min: Param,
    /// Raw input value that normalizes to 1. May be an auto-parameter.
    pub bookend_max: Param,
    pub curve: Curve,
}

impl Default for Consideration {
    fn default() -> Self {
        Self {
            input_tag: Tag::default(),
            description: String::new(),
            params: ParamMap::new(),
            bookend_min: Param::Float(0.0),
            bookend_max: Param::Float(1.0),
            curve: Curve::default(),
        }
    }
}

/// An immutable action definition. Catalogue build order and priority decide
/// where it lands; its index there identifies it afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionDef {
    pub tag: Tag,
    pub description: String,
    /// Lower value = higher-priority group; groups are evaluated in
    /// ascending order and the first group with any candidate wins.
    pub priority: i32,
    /// Starting score before considerations multiply in.
    pub weight: f32,
    /// Additive bonus applied once when the action becomes current.
    pub inertia: f32,
    /// All of these must be present on self for the action to be considered.
    pub required_tags: Vec<Tag>,
    /// Any of these present on self rules the action out.
    pub blocking_tags: Vec<Tag>,
    pub queries: Vec<QuerySpec>,
    pub considerations: Vec<Consideration>,
    /// Opaque parameters forwarded to the action body.
    pub action_params: ParamMap,
    /// Score subtraction levied after the action completes, decaying over
    /// `repetition_penalty_cooldown` seconds.
    pub repetition_penalty: f32,
    pub repetition_penalty_cooldown: f32,
    /// Seconds over which a running action's retained score bleeds away.
    /// Zero means the score zeroes immediately.
    pub score_cooldown_time: f32,
    pub allow_interruptions: bool,
    pub interrupt_from_higher_priority_only: bool,
}

impl Default for ActionDef {
    fn default() -> Self {
        Self {
            tag: Tag::default(),
            description: String::new(),
            priority: 0,
            weight: 1.0,
            inertia: 0.0,
            required_tags: Vec::new(),
            blocking_tags: Vec::new(),
            queries: Vec::new(),
            considerations: Vec::new(),
            action_params: ParamMap::new(),
            repetition_penalty: 0.0,
            repetition_penalty_cooldown: 0.0,
            score_cooldown_time: 0.0,
            allow_interruptions: true,
            interrupt_from_higher_priority_only: false,
        }
    }
}

/// A named, immutable bundle of action definitions shared between brains.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionSet {
    pub name: String,
    pub actions: Vec<ActionDef>,
}

/// How a winner is picked from a sorted candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChoiceMethod {
    /// Deterministic: the best-scoring candidate wins.
    #[default]
    HighestScoring,
    /// Weighted random over the best N candidates.
    WeightedRandomTopN,
    /// Weighted random over candidates scoring within N percent of the best.
    WeightedRandomTopNPercent,
}

/// Per-priority-group override of the choice method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GroupChoice {
    pub priority: i32,
    pub method: ChoiceMethod,
    pub top_n: u32,
}

/// Everything one brain needs to deliberate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainConfig {
    pub actions: Vec<ActionDef>,
    pub action_sets: Vec<ActionSet>,
    /// While any of these tags is on self, updates are held back; the brain
    /// re-enqueues itself when the set empties.
    pub prevent_update_tags: Vec<Tag>,
    pub choice_method: ChoiceMethod,
    pub top_n: u32,
    pub group_choice_overrides: Vec<GroupChoice>,
    /// Squared-unit tolerance within which two context locations count as
    /// the same candidate.
    pub same_location_tolerance: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            action_sets: Vec::new(),
            prevent_update_tags: Vec::new(),
            choice_method: ChoiceMethod::HighestScoring,
            top_n: 5,
            group_choice_overrides: Vec::new(),
            same_location_tolerance: 900.0,
        }
    }
}

impl BrainConfig {
    pub(crate) fn choice_for(&self, priority: i32) -> (ChoiceMethod, u32) {
        for over in &self.group_choice_overrides {
            if over.priority == priority {
                return (over.method, over.top_n);
            }
        }
        (self.choice_method, self.top_n)
    }
}
