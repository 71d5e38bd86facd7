//! Per-tick recording and exact-range replay through the StateManager,
//! driving real ObjectStates bundles the way a resimulating host would.

use std::collections::HashMap;

use glam::Vec3;

use ticksync_shared::{
    ActionEvent, BacklogVisitor, EventVariant, LevelObjectId, ObjectStates, SparseTransform,
    StateManager, Tick,
};

/// Applies replayed transforms onto a world of state bundles, committing
/// each entry so successive deltas compose.
struct WorldApplier {
    objects: HashMap<LevelObjectId, ObjectStates>,
    events_seen: Vec<u32>,
}

impl WorldApplier {
    fn new() -> Self {
        Self {
            objects: HashMap::new(),
            events_seen: Vec::new(),
        }
    }

    fn spawn(&mut self, id: LevelObjectId) {
        self.objects.insert(id, ObjectStates::new());
    }

    fn position(&self, id: LevelObjectId) -> Vec3 {
        *self.objects[&id].position.get()
    }
}

impl BacklogVisitor for WorldApplier {
    fn object_transform(&mut self, object_id: LevelObjectId, transform: &SparseTransform) {
        let Some(states) = self.objects.get_mut(&object_id) else {
            return;
        };
        transform.apply_to(states);
        states.commit_update();
    }

    fn action_event(&mut self, _realtime: f64, event: &EventVariant) {
        if let EventVariant::Action(ActionEvent { code, .. }) = event {
            self.events_seen.push(*code);
        }
    }
}

fn record_step(manager: &mut StateManager, id: LevelObjectId, delta: Vec3) {
    let mut transform = SparseTransform::new();
    transform.add_translation(delta);
    manager.add_object_transform(id, transform);
}

#[test]
fn apply_replays_exactly_one_ticks_entries() {
    let obj42 = LevelObjectId::new(42);
    let mut manager = StateManager::new(100);

    // Ticks 100, 101, 102 each record +X.
    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));
    manager.advance();
    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));
    manager.advance();
    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));

    let mut world = WorldApplier::new();
    world.spawn(obj42);

    let replayed = manager.apply(101, &mut world);

    assert_eq!(replayed, 1, "only tick 101's entry replays");
    assert_eq!(world.position(obj42), Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn applying_three_ticks_in_order_accumulates_their_deltas() {
    let obj42 = LevelObjectId::new(42);
    let mut manager = StateManager::new(100);

    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));
    manager.advance();
    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));
    manager.advance();
    record_step(&mut manager, obj42, Vec3::new(1.0, 0.0, 0.0));

    let mut world = WorldApplier::new();
    world.spawn(obj42);

    for tick in 100..=102 {
        manager.apply(tick as Tick, &mut world);
    }

    assert_eq!(world.position(obj42), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn resimulation_replays_a_tick_range_again() {
    let obj = LevelObjectId::new(7);
    let mut manager = StateManager::new(10);

    record_step(&mut manager, obj, Vec3::Y);
    manager.advance();
    record_step(&mut manager, obj, Vec3::Y);

    let mut world = WorldApplier::new();
    world.spawn(obj);
    manager.apply(10, &mut world);
    manager.apply(11, &mut world);
    assert_eq!(world.position(obj), Vec3::new(0.0, 2.0, 0.0));

    // After a correction the host rolls the object back and replays the
    // same range; the recorded history is untouched by replay.
    world.spawn(obj);
    manager.apply(10, &mut world);
    manager.apply(11, &mut world);
    assert_eq!(world.position(obj), Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn events_and_transforms_replay_in_recorded_order() {
    let obj = LevelObjectId::new(1);
    let mut manager = StateManager::new(0);

    manager.add_action_event(0.0, EventVariant::Action(ActionEvent { code: 1, down: true }));
    record_step(&mut manager, obj, Vec3::X);
    manager.add_action_event(0.1, EventVariant::Action(ActionEvent { code: 2, down: true }));

    let mut world = WorldApplier::new();
    world.spawn(obj);
    let replayed = manager.apply(0, &mut world);

    assert_eq!(replayed, 3);
    assert_eq!(world.events_seen, vec![1, 2]);
    assert_eq!(world.position(obj), Vec3::X);
}

#[test]
fn transforms_for_unknown_objects_are_skipped_by_the_visitor() {
    let mut manager = StateManager::new(0);
    record_step(&mut manager, LevelObjectId::new(999), Vec3::X);

    let mut world = WorldApplier::new();
    let replayed = manager.apply(0, &mut world);

    // The entry still replays; this visitor just has nowhere to put it.
    assert_eq!(replayed, 1);
    assert!(world.objects.is_empty());
}
