//! Engine-agnostic primitives for the volition utility-AI decision engine.
//!
//! This crate holds the data model (tags, parameters, contexts, response
//! curves), the provider traits a host world implements, and the shared
//! infrastructure (registry, pooled buffers, deterministic RNG) the brain
//! crate builds on. It knows nothing about any particular game engine.

#![forbid(unsafe_code)]

pub mod action;
pub mod context;
pub mod curve;
pub mod error;
pub mod math;
pub mod param;
pub mod pool;
pub mod provider;
pub mod registry;
pub mod rng;
pub mod tag;
pub mod world;

pub use action::{ActionClass, AgentAction, CompletionFlag, CompletionHandle};
pub use context::Context;
pub use curve::Curve;
pub use error::ConfigError;
pub use math::Vec3;
pub use param::{ContextValue, Param, ParamMap};
pub use pool::{Pool, PooledMap, PooledVec};
pub use provider::{
    InputProvider, ParamProvider, QueryKind, QueryProvider, INPUT_TAG_ROOT, PARAM_TAG_ROOT,
};
pub use registry::Registry;
pub use rng::{derive_seed, mix64, SplitMix64};
pub use tag::Tag;
pub use world::{ActorId, WorldMut, WorldView};
