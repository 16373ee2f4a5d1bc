use crate::context::Context;
use crate::param::{ContextValue, ParamMap};
use crate::world::WorldView;

/// Root segment under which auto-parameter tags resolve through an input
/// provider (always a float).
pub const INPUT_TAG_ROOT: &str = "Input";
/// Root segment under which auto-parameter tags resolve through a parameter
/// provider (any context value).
pub const PARAM_TAG_ROOT: &str = "Param";

/// Which context slot a query populates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Target,
    Location,
    Named(String),
}

impl QueryKind {
    /// Label used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            QueryKind::Target => "targets".to_string(),
            QueryKind::Location => "locations".to_string(),
            QueryKind::Named(name) => format!("named value `{name}`"),
        }
    }
}

/// A scoring input: a raw observation about one context.
///
/// Must be deterministic given its inputs and side-effect free; it may be
/// invoked from any agent's update.
pub trait InputProvider<W: WorldView>: Send + Sync {
    fn evaluate(&self, world: &W, ctx: &Context<W::Actor>, params: &ParamMap) -> f32;
}

impl<W, F> InputProvider<W> for F
where
    W: WorldView,
    F: Fn(&W, &Context<W::Actor>, &ParamMap) -> f32 + Send + Sync,
{
    fn evaluate(&self, world: &W, ctx: &Context<W::Actor>, params: &ParamMap) -> f32 {
        self(world, ctx, params)
    }
}

/// A context generator: produces candidate slot values for one agent.
///
/// Uncorrelated queries run once per action evaluation and combine with
/// existing contexts as a Cartesian product; correlated queries run once per
/// partial context and intersect with it.
pub trait QueryProvider<W: WorldView>: Send + Sync {
    fn kind(&self) -> QueryKind;

    fn correlated(&self) -> bool {
        false
    }

    /// Run the query independent of any partial context. `max_frequency`
    /// upper-bounds how often results need recomputing; providers may serve
    /// cached results younger than that.
    fn run(
        &self,
        world: &W,
        agent: W::Actor,
        max_frequency: f32,
        params: &ParamMap,
        out: &mut Vec<ContextValue<W::Actor>>,
    );

    /// Run the query against one partial context. Correlated providers
    /// implement this; the default falls back to the uncorrelated form.
    fn run_correlated(
        &self,
        world: &W,
        agent: W::Actor,
        ctx: &Context<W::Actor>,
        params: &ParamMap,
        out: &mut Vec<ContextValue<W::Actor>>,
    ) {
        let _ = ctx;
        self.run(world, agent, 0.0, params, out);
    }
}

/// An auto-parameter source consulted when a `Param::AutoRef` tag sits under
/// the `Param` root.
pub trait ParamProvider<W: WorldView>: Send + Sync {
    fn evaluate(&self, world: &W, ctx: &Context<W::Actor>, params: &ParamMap)
        -> ContextValue<W::Actor>;
}

impl<W, F> ParamProvider<W> for F
where
    W: WorldView,
    F: Fn(&W, &Context<W::Actor>, &ParamMap) -> ContextValue<W::Actor> + Send + Sync,
{
    fn evaluate(
        &self,
        world: &W,
        ctx: &Context<W::Actor>,
        params: &ParamMap,
    ) -> ContextValue<W::Actor> {
        self(world, ctx, params)
    }
}
