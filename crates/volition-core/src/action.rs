use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::context::Context;
use crate::param::ParamMap;
use crate::tag::Tag;
use crate::world::WorldMut;

/// One-shot completion channel between a running action instance and the
/// brain that started it.
///
/// Each started action gets a handle stamped with a generation number; the
/// brain only honors the completion whose generation matches the action it
/// currently considers running. A late signal from an instance the brain has
/// already abandoned carries a stale generation and is ignored.
#[derive(Debug, Default)]
pub struct CompletionFlag {
    completed: Arc<AtomicU64>,
}

impl CompletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a handle for a newly started action. Clears any pending
    /// signal from a previous generation.
    pub fn issue(&self, generation: u64) -> CompletionHandle {
        self.completed.store(0, Ordering::Release);
        CompletionHandle {
            completed: Arc::clone(&self.completed),
            generation,
        }
    }

    /// Consume a pending completion for `generation`, if one arrived.
    pub fn take(&self, generation: u64) -> bool {
        self.completed
            .compare_exchange(generation, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Held by an action body; signalling is idempotent.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    completed: Arc<AtomicU64>,
    generation: u64,
}

impl CompletionHandle {
    pub fn complete(&self) {
        // First signal wins; a stale handle cannot clobber a pending one.
        let _ = self.completed.compare_exchange(
            0,
            self.generation,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// A unit of behavior an agent can execute.
///
/// Bodies may span many ticks; the brain only observes them through the
/// completion handle and the `resume`/`cancel` entry points. Instances are
/// pooled, so `reset` must return the instance to a reusable idle state.
pub trait AgentAction<W: WorldMut>: Send {
    /// Start executing. `previous` names the action class that was running
    /// before this one, when there was one.
    fn perform(
        &mut self,
        world: &mut W,
        agent: W::Actor,
        ctx: &Context<W::Actor>,
        params: &ParamMap,
        previous: Option<&Tag>,
        completion: CompletionHandle,
    );

    /// The brain re-chose this action with the same (or equivalent) context.
    fn resume(&mut self, world: &mut W, ctx: &Context<W::Actor>, params: &ParamMap) {
        let _ = (world, ctx, params);
    }

    /// Synchronous cancellation; must relinquish control before returning.
    fn cancel(&mut self, world: &mut W, interrupter: Option<&Tag>) {
        let _ = (world, interrupter);
    }

    /// Instance-level veto on interruption, combined with the definition's
    /// `allow_interruptions` flag.
    fn can_be_interrupted(&self) -> bool {
        true
    }

    /// Instance-level request to only consider higher-priority groups while
    /// running, combined with the definition's flag.
    fn interrupt_from_higher_priority_only(&self) -> bool {
        false
    }

    /// Clear transient state before the instance is reused from the pool.
    fn reset(&mut self) {}
}

/// Factory for pooled action instances, registered per action tag.
pub trait ActionClass<W: WorldMut>: Send + Sync {
    fn instantiate(&self) -> Box<dyn AgentAction<W>>;
}

impl<W, F> ActionClass<W> for F
where
    W: WorldMut,
    F: Fn() -> Box<dyn AgentAction<W>> + Send + Sync,
{
    fn instantiate(&self) -> Box<dyn AgentAction<W>> {
        self()
    }
}
