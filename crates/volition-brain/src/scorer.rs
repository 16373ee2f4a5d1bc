//! Consideration-chain scoring and lazy parameter resolution.

use std::collections::BTreeMap;

use tracing::warn;

use volition_core::{
    ConfigError, Context, Param, ParamMap, Pool, Registry, Tag, WorldMut, INPUT_TAG_ROOT,
    PARAM_TAG_ROOT,
};

use crate::config::ActionDef;

/// Scores within this distance of zero are treated as zero: they
/// short-circuit consideration chains and disqualify candidates.
pub(crate) const SCORE_EPSILON: f32 = 1e-4;

/// Resolve one parameter against a context. Literals pass through;
/// `InputRef` asks an input provider for a float; `AutoRef` routes by the
/// tag's root segment. Unknown providers fall back to the literal with a
/// logged warning.
pub(crate) fn resolve_param<W: WorldMut>(
    world: &W,
    registry: &Registry<W>,
    ctx: &Context<W::Actor>,
    param: &Param,
) -> Param {
    match param {
        Param::InputRef(tag) => resolve_input_ref(world, registry, ctx, tag)
            .unwrap_or_else(|| param.clone()),
        Param::AutoRef(tag) => {
            if tag.matches_path(INPUT_TAG_ROOT) {
                resolve_input_ref(world, registry, ctx, tag).unwrap_or_else(|| param.clone())
            } else if tag.matches_path(PARAM_TAG_ROOT) {
                if let Some(provider) = registry.param(tag) {
                    let value = provider.evaluate(world, ctx, &ParamMap::new());
                    match value.to_param() {
                        Some(resolved) => resolved,
                        None => {
                            warn!(%tag, "parameter provider returned a non-parameter value");
                            param.clone()
                        }
                    }
                } else {
                    warn!(
                        "{}",
                        ConfigError::UnknownProvider {
                            kind: "parameter",
                            tag: tag.clone(),
                        }
                    );
                    param.clone()
                }
            } else {
                param.clone()
            }
        }
        literal => literal.clone(),
    }
}

fn resolve_input_ref<W: WorldMut>(
    world: &W,
    registry: &Registry<W>,
    ctx: &Context<W::Actor>,
    tag: &Tag,
) -> Option<Param> {
    match registry.input(tag) {
        Some(input) => Some(Param::Float(input.evaluate(world, ctx, &ParamMap::new()))),
        None => {
            warn!(
                "{}",
                ConfigError::UnknownProvider {
                    kind: "input",
                    tag: tag.clone(),
                }
            );
            None
        }
    }
}

/// Resolve a whole parameter map into `out`.
pub(crate) fn resolve_params<W: WorldMut>(
    world: &W,
    registry: &Registry<W>,
    ctx: &Context<W::Actor>,
    params: &ParamMap,
    out: &mut BTreeMap<String, Param>,
) {
    for (name, param) in params {
        out.insert(name.clone(), resolve_param(world, registry, ctx, param));
    }
}

/// Evaluate an action's consideration chain against one context.
///
/// Starts from the action's weight and multiplies in each consideration's
/// curved, bookend-normalized input. Returns exactly 0.0 once the running
/// product collapses, skipping the rest of the chain.
pub(crate) fn score_considerations<W: WorldMut>(
    world: &W,
    registry: &Registry<W>,
    pool: &Pool<W>,
    def: &ActionDef,
    ctx: &Context<W::Actor>,
) -> f32 {
    let mut score = def.weight;
    for consideration in &def.considerations {
        let Some(input) = registry.input(&consideration.input_tag) else {
            warn!(
                "{}",
                ConfigError::UnknownProvider {
                    kind: "input",
                    tag: consideration.input_tag.clone(),
                }
            );
            continue;
        };

        let mut resolved = pool.map::<String, Param>();
        resolve_params(world, registry, ctx, &consideration.params, &mut resolved);

        let raw = input.evaluate(world, ctx, &resolved);
        let lo = resolve_param(world, registry, ctx, &consideration.bookend_min).as_float();
        let hi = resolve_param(world, registry, ctx, &consideration.bookend_max).as_float();
        let normalized = if hi == lo {
            0.0
        } else {
            ((raw - lo) / (hi - lo)).clamp(0.0, 1.0)
        };

        score *= consideration.curve.evaluate(normalized);
        if score.abs() < SCORE_EPSILON {
            return 0.0;
        }
    }
    score
}
