//! The per-agent utility-AI decision engine.
//!
//! Each agent owns a [`Brain`] that periodically scores a catalogue of
//! candidate actions against generated evaluation contexts and commits to
//! one. A [`WorldScheduler`] paces those updates across many agents by
//! proximity to player observers, under a per-tick wall-clock budget.
//!
//! The crate is generic over a host world (`volition-core`'s `WorldMut`);
//! concrete inputs, queries and action bodies plug in through the provider
//! registry.

#![forbid(unsafe_code)]

pub mod brain;
pub mod catalogue;
pub mod config;
pub mod history;
pub mod scheduler;

mod contexts;
mod scorer;
mod selector;

pub use brain::Brain;
pub use catalogue::Catalogue;
pub use config::{
    ActionDef, ActionSet, BrainConfig, ChoiceMethod, Consideration, GroupChoice, QuerySpec,
};
pub use history::HistoryEntry;
pub use scheduler::{BrainHandle, ProximityTier, SchedulerConfig, WorldScheduler};
pub use selector::ScoredCandidate;
