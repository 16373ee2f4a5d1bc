use core::fmt::Debug;
use core::hash::Hash;

use crate::math::Vec3;
use crate::tag::Tag;

/// Stable identifier for an actor in the host world.
///
/// Deterministic behavior requires stable ordering and a stable numeric id
/// for seeding and trace output.
pub trait ActorId: Copy + Ord + Eq + Hash + Debug + Send + Sync + 'static {
    fn stable_id(self) -> u64;
}

impl ActorId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl ActorId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl ActorId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only world access the engine itself relies on.
///
/// Everything else agents can sense goes through providers; this trait is
/// deliberately limited to what the update loop and the scheduler consult
/// directly.
pub trait WorldView {
    type Actor: ActorId;

    /// Whether this process is allowed to drive the actor's brain. Hosts
    /// without a client/server split can leave the default.
    fn has_authority(&self, _actor: Self::Actor) -> bool {
        true
    }

    /// Gameplay-tag membership on the actor, used for required/blocking tag
    /// filters and update prevention.
    fn actor_has_tag(&self, _actor: Self::Actor, _tag: &Tag) -> bool {
        false
    }

    fn actor_has_all_tags(&self, actor: Self::Actor, tags: &[Tag]) -> bool {
        tags.iter().all(|t| self.actor_has_tag(actor, t))
    }

    fn actor_has_any_tags(&self, actor: Self::Actor, tags: &[Tag]) -> bool {
        tags.iter().any(|t| self.actor_has_tag(actor, t))
    }

    /// Position of an actor, if it has one. `None` places the actor out of
    /// range for proximity tiering.
    fn position_of(&self, _actor: Self::Actor) -> Option<Vec3> {
        None
    }

    /// Positions of all player (observer) actors, appended to `out`.
    fn player_positions(&self, _out: &mut Vec<Vec3>) {}
}

/// Write access; action bodies run against this.
pub trait WorldMut: WorldView {}
