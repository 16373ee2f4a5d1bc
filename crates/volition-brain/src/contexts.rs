//! Context generation: expanding an action's query list into the flat set of
//! evaluation contexts its considerations score against.

use tracing::warn;

use volition_core::{
    ActorId, ConfigError, Context, ContextValue, Param, Pool, QueryKind, Registry, WorldMut,
};

use crate::config::ActionDef;
use crate::scorer::resolve_params;

/// Populate `out` with the contexts to evaluate `def` against.
///
/// With no queries there is exactly one context holding only the agent.
/// Otherwise queries fold in declared order: correlated queries run once per
/// existing partial context and intersect with it (no results drops that
/// context); uncorrelated queries run once and Cartesian-combine, and an
/// empty uncorrelated result collapses the whole set, skipping the action.
pub(crate) fn generate_contexts<W: WorldMut>(
    world: &W,
    registry: &Registry<W>,
    pool: &Pool<W>,
    agent: W::Actor,
    def: &ActionDef,
    out: &mut Vec<Context<W::Actor>>,
) {
    out.clear();
    out.push(Context::new(agent));
    if def.queries.is_empty() {
        return;
    }

    // One query per element kind, except named values which are unique per
    // name: the combination step would otherwise multiply a slot with itself.
    let mut target_seen = false;
    let mut location_seen = false;
    let mut names_seen: Vec<String> = Vec::new();

    let self_ctx = Context::new(agent);

    for query in &def.queries {
        let Some(provider) = registry.query(&query.query_tag) else {
            warn!(
                "{}",
                ConfigError::UnknownProvider {
                    kind: "query",
                    tag: query.query_tag.clone(),
                }
            );
            continue;
        };

        let kind = provider.kind();
        let duplicate = match &kind {
            QueryKind::Target => core::mem::replace(&mut target_seen, true),
            QueryKind::Location => core::mem::replace(&mut location_seen, true),
            QueryKind::Named(name) => {
                if names_seen.iter().any(|seen| seen == name) {
                    true
                } else {
                    names_seen.push(name.clone());
                    false
                }
            }
        };
        if duplicate {
            warn!(
                "{}",
                ConfigError::DuplicateQueryElement {
                    action: def.tag.clone(),
                    element: kind.label(),
                    query: query.query_tag.clone(),
                }
            );
            continue;
        }

        let mut resolved = pool.map::<String, Param>();
        resolve_params(world, registry, &self_ctx, &query.params, &mut resolved);

        let mut next = pool.vec::<Context<W::Actor>>();
        let mut results = pool.vec::<ContextValue<W::Actor>>();

        if provider.correlated() {
            for ctx in out.iter() {
                results.clear();
                provider.run_correlated(world, agent, ctx, &resolved, &mut results);
                for value in results.iter() {
                    if let Some(derived) = with_slot(ctx, &kind, value) {
                        next.push(derived);
                    }
                }
            }
        } else {
            provider.run(world, agent, query.max_frequency, &resolved, &mut results);
            if results.is_empty() {
                // N x 0 combinations: nothing this action could apply to.
                out.clear();
                return;
            }
            for ctx in out.iter() {
                for value in results.iter() {
                    if let Some(derived) = with_slot(ctx, &kind, value) {
                        next.push(derived);
                    }
                }
            }
        }

        out.clear();
        out.append(&mut next);
    }
}

/// Clone a partial context with the query result written into the slot the
/// query's element kind names. Results of the wrong shape are dropped.
fn with_slot<A: ActorId>(
    ctx: &Context<A>,
    kind: &QueryKind,
    value: &ContextValue<A>,
) -> Option<Context<A>> {
    let mut derived = ctx.clone();
    match (kind, value) {
        (QueryKind::Target, ContextValue::Actor(actor)) => derived.target = Some(*actor),
        (QueryKind::Location, ContextValue::Location(location)) => {
            derived.location = Some(*location)
        }
        (QueryKind::Named(name), value) => {
            derived.named.insert(name.clone(), value.clone());
        }
        _ => {
            warn!(kind = %kind.label(), "query result does not match its declared element kind");
            return None;
        }
    }
    Some(derived)
}
