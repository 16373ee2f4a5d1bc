use std::collections::BTreeMap;

use crate::math::Vec3;
use crate::param::ContextValue;
use crate::world::ActorId;

/// The evaluation environment for one (action, candidate) pair.
///
/// Queries populate the optional slots; considerations and action bodies
/// read them. The agent slot is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<A: ActorId> {
    pub agent: A,
    pub target: Option<A>,
    pub location: Option<Vec3>,
    pub named: BTreeMap<String, ContextValue<A>>,
}

impl<A: ActorId> Context<A> {
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            target: None,
            location: None,
            named: BTreeMap::new(),
        }
    }

    /// "Same candidate" equality used to decide whether a scored result is a
    /// continuation of the running action.
    ///
    /// Targets compare by identity; locations must fall within
    /// `location_tolerance_sq` squared units of each other; named values must
    /// match exactly.
    pub fn same_as(&self, other: &Self, location_tolerance_sq: f32) -> bool {
        if self.agent != other.agent || self.target != other.target {
            return false;
        }
        let locations_match = match (self.location, other.location) {
            (None, None) => true,
            (Some(a), Some(b)) => a.distance_squared(b) <= location_tolerance_sq,
            _ => false,
        };
        locations_match && self.named == other.named
    }
}
