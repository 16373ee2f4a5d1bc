mod common;

use common::*;
use volition_core::Tag;

#[test]
fn current_score_retention_prevents_flapping() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Hold");
    register_value_input(&registry, "Input.Urge", "urge");

    let mut def = action("Action.Hold");
    def.weight = 2.0;
    def.inertia = 3.0;
    def.considerations = vec![consider("Input.Urge")];

    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();
    world.values.insert("urge", 1.0);

    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_score(), Some(5.0)); // 2.0 + inertia 3.0

    // The urge collapses to 0.1: raw rescore would be 0.2, but the live
    // score holds and the action continues instead of being cancelled.
    world.values.insert("urge", 0.1);
    brain.update(&mut world, 1.0);

    assert_eq!(brain.current_score(), Some(5.0));
    assert_eq!(
        world.log,
        vec![
            "perform Hold target=None location=None".to_string(),
            "resume Hold".to_string(),
        ]
    );
}

#[test]
fn score_cooldown_bleeds_the_retained_score_away() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Hold");

    let mut def = action("Action.Hold");
    def.weight = 2.0;
    def.inertia = 3.0;
    def.score_cooldown_time = 5.0;
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_score(), Some(5.0));

    // Decay rate is last_run_score / cooldown = 1 per second.
    brain.run_cooldowns(2.5);
    assert_eq!(brain.current_score(), Some(2.5));
    brain.run_cooldowns(10.0);
    assert_eq!(brain.current_score(), Some(0.0));
}

#[test]
fn zero_score_cooldown_zeroes_immediately() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Hold");

    let mut def = action("Action.Hold");
    def.weight = 2.0;
    def.score_cooldown_time = 0.0;
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    brain.run_cooldowns(0.1);
    assert_eq!(brain.current_score(), Some(0.0));
}

#[test]
fn still_viable_current_action_is_reinjected() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Consume");
    register_value_input(&registry, "Input.Hungry", "hungry");

    // Eating clears the hunger that justified it, but the meal is not done.
    let mut def = action("Action.Consume");
    def.weight = 2.0;
    def.considerations = vec![consider("Input.Hungry")];
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();
    world.values.insert("hungry", 1.0);

    brain.update(&mut world, 0.0);
    assert!(brain.is_action_in_progress());

    world.values.insert("hungry", 0.0);
    brain.update(&mut world, 1.0);

    assert!(brain.is_action_in_progress());
    assert_eq!(world.log.last().map(String::as_str), Some("resume Consume"));
}

#[test]
fn repetition_penalty_applies_after_completion_and_decays() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Raid");

    let mut def = action("Action.Raid");
    def.weight = 3.0;
    def.repetition_penalty = 2.0;
    def.repetition_penalty_cooldown = 4.0;
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    assert!(complete_current(&mut world, &mut brain, 1.0));
    assert_eq!(brain.history()[0].repetition_penalty, 2.0);

    // Next run scores weight minus the penalty.
    brain.update(&mut world, 2.0);
    assert_eq!(brain.current_score(), Some(1.0));

    // While it runs again the penalty holds; after it ends it decays, and
    // completion stacks another penalty on top.
    assert!(complete_current(&mut world, &mut brain, 3.0));
    assert_eq!(brain.history()[0].repetition_penalty, 4.0);
    brain.run_cooldowns(2.0); // decay rate 2.0 / 4.0 s = 0.5/s
    assert_eq!(brain.history()[0].repetition_penalty, 3.0);
    brain.run_cooldowns(100.0);
    assert_eq!(brain.history()[0].repetition_penalty, 0.0);
}

#[test]
fn repetition_penalty_never_hits_the_running_instance() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Raid");

    let mut def = action("Action.Raid");
    def.weight = 3.0;
    def.repetition_penalty = 10.0;
    def.repetition_penalty_cooldown = 100.0;
    let mut brain = started_brain(vec![def], &registry, &pool);
    let mut world = TestWorld::default();

    brain.update(&mut world, 0.0);
    assert!(complete_current(&mut world, &mut brain, 1.0));

    // Penalty 10 wipes out weight 3: no candidate, nothing restarts.
    brain.update(&mut world, 2.0);
    assert!(!brain.is_action_in_progress());
}

#[test]
fn temp_adjust_biases_scores_and_cools_down() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.A");
    register_scripted(&registry, "Action.B");

    let mut a = action("Action.A");
    a.weight = 1.0;
    let mut b = action("Action.B");
    b.weight = 2.0;
    let mut brain = started_brain(vec![a, b], &registry, &pool);
    let mut world = TestWorld::default();

    // Biased, A overtakes B.
    brain.set_temp_adjust(&Tag::new("Action.A"), 5.0, 10.0);
    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_action_tag().map(|t| t.as_str()), Some("Action.A"));
    assert_eq!(brain.current_score(), Some(6.0));

    // The bias decays monotonically to zero and never overshoots.
    let mut previous = brain.history()[0].temp_score_adjust;
    for _ in 0..12 {
        brain.run_cooldowns(1.0);
        let adjust = brain.history()[0].temp_score_adjust;
        assert!(adjust <= previous);
        assert!(adjust >= 0.0);
        previous = adjust;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn negative_temp_adjust_suppresses_an_action() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.A");
    register_scripted(&registry, "Action.B");

    let a = action("Action.A");
    let mut b = action("Action.B");
    b.weight = 0.5;
    let mut brain = started_brain(vec![a, b], &registry, &pool);
    let mut world = TestWorld::default();

    brain.set_temp_adjust(&Tag::new("Action.A"), -1.0, 0.0);
    brain.update(&mut world, 0.0);
    assert_eq!(brain.current_action_tag().map(|t| t.as_str()), Some("Action.B"));
}

#[test]
fn time_since_performed_measures_from_the_end_time() {
    let (registry, pool) = setup();
    register_scripted(&registry, "Action.Raid");

    let mut brain = started_brain(vec![action("Action.Raid")], &registry, &pool);
    let mut world = TestWorld::default();

    assert!(brain
        .time_since_performed(&Tag::new("Action.Never"), 10.0)
        .is_infinite());

    brain.update(&mut world, 0.0);
    assert!(complete_current(&mut world, &mut brain, 4.0));
    assert_eq!(brain.time_since_performed(&Tag::new("Action.Raid"), 10.0), 6.0);
}
