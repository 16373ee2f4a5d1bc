//! Tooling primitives for inspecting utility-AI decisions.
//!
//! This crate is intentionally lightweight and engine-agnostic: dumb-data
//! events recorded while a brain deliberates, and pluggable sinks that
//! collect them. Renderers and inspectors live in host-specific crates.

#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{DecisionEvent, DecisionSink, DecisionStage, MemorySink, NullSink};
