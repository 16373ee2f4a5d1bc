mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use common::*;
use volition_core::{Context, Curve, Param, ParamMap, Tag};

#[test]
fn considerations_at_full_value_leave_the_weight_untouched() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_constant_input(&registry, "Input.One", 1.0);

    let mut def = action("Action.Idle");
    def.weight = 4.0;
    def.considerations = vec![consider("Input.One"), consider("Input.One")];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_score(), Some(4.0));
}

#[test]
fn a_zero_consideration_short_circuits_the_rest() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_constant_input(&registry, "Input.Zero", 0.0);

    let calls = Arc::new(AtomicU32::new(0));
    let calls_probe = Arc::clone(&calls);
    registry.register_input(
        Tag::new("Input.Counted"),
        Arc::new(move |_: &TestWorld, _: &Context<u64>, _: &ParamMap| {
            calls_probe.fetch_add(1, Ordering::Relaxed);
            1.0
        }),
    );

    let mut def = action("Action.Idle");
    def.considerations = vec![consider("Input.Zero"), consider("Input.Counted")];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);

    assert!(!brain.is_action_in_progress());
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn equal_bookends_normalize_to_zero() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_constant_input(&registry, "Input.Health", 50.0);

    let mut con = consider("Input.Health");
    con.bookend_min = Param::Float(50.0);
    con.bookend_max = Param::Float(50.0);
    // A curve that maps 0 to 1 would mask the normalization; identity shows it.
    con.curve = Curve::default();

    let mut def = action("Action.Idle");
    def.considerations = vec![con];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    assert!(!brain.is_action_in_progress());
}

#[test]
fn bookends_normalize_and_clamp_raw_inputs() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_value_input(&registry, "Input.Health", "health");

    let mut con = consider("Input.Health");
    con.bookend_min = Param::Float(0.0);
    con.bookend_max = Param::Float(200.0);

    let mut def = action("Action.Idle");
    def.weight = 2.0;
    def.considerations = vec![con];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    world.values.insert("health", 100.0);
    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_score(), Some(1.0)); // 2.0 * 0.5

    // Raw values beyond the bookends clamp to 1.
    world.values.insert("health", 500.0);
    brain.update(&mut world, 1.0);
    assert_eq!(brain.current_score(), Some(2.0));
}

#[test]
fn bookends_can_be_auto_parameters() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_value_input(&registry, "Input.Health", "health");
    register_constant_input(&registry, "Input.MaxHealth", 200.0);

    let mut con = consider("Input.Health");
    con.bookend_min = Param::Float(0.0);
    con.bookend_max = Param::AutoRef(Tag::new("Input.MaxHealth"));

    let mut def = action("Action.Idle");
    def.weight = 2.0;
    def.considerations = vec![con];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    world.values.insert("health", 100.0);
    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_score(), Some(1.0));
}

#[test]
fn curves_shape_the_normalized_input() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");
    register_constant_input(&registry, "Input.Half", 0.5);

    let mut con = consider("Input.Half");
    con.curve = Curve::Step {
        threshold: 0.6,
        low: 0.0,
        high: 1.0,
    };

    let mut def = action("Action.Idle");
    def.considerations = vec![con.clone()];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    // 0.5 sits below the step threshold: score 0, nothing starts.
    brain.update(&mut world, 0.0);
    assert!(!brain.is_action_in_progress());

    con.curve = Curve::Step {
        threshold: 0.4,
        low: 0.0,
        high: 1.0,
    };
    let mut def = action("Action.Idle");
    def.considerations = vec![con];
    let mut brain = started_brain(vec![def], &registry, &pool);
    brain.update(&mut world, 1.0);
    assert_eq!(brain.current_score(), Some(1.0));
}

#[test]
fn unknown_input_provider_skips_the_consideration() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Idle");

    let mut def = action("Action.Idle");
    def.weight = 3.0;
    def.considerations = vec![consider("Input.Missing")];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    // The consideration contributes nothing; the weight stands.
    assert_eq!(brain.current_score(), Some(3.0));
}
