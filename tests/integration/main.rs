//! End-to-end tests across both layers: a store driving a small
//! simulation-style workload the way application code would.

use warren::storage::{Plain, Store};

#[derive(Clone, Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

impl Plain for Position {}

#[derive(Clone, Debug, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Plain for Velocity {}

warren::storage::relation! {
    /// A mobile unit: where it is and how it moves.
    struct Unit => UnitRefs {
        position: Position,
        velocity: Velocity,
    }
}

warren::storage::relation! {
    /// A tracked unit: a unit plus the label it reports under.
    struct Tracked => TrackedRefs {
        unit: Unit,
        label: String,
    }
}

#[test]
fn tick_loop_mutates_through_constituent_handles() {
    let mut store = Store::new();
    let unit = store.insert(Unit {
        position: Position { x: 0.0, y: 10.0 },
        velocity: Velocity { dx: 1.0, dy: 0.0 },
    });

    // Three ticks: apply velocity to position, then gravity to velocity.
    for _ in 0..3 {
        let refs = store.refs(unit).unwrap();
        let velocity = store.get(refs.velocity).unwrap();
        let position = store.get_mut(refs.position).unwrap();
        position.x += velocity.dx;
        position.y += velocity.dy;
        store.get_mut(refs.velocity).unwrap().dy -= 1.0;
    }

    let resolved = store.get(unit).unwrap();
    assert_eq!(resolved.position, Position { x: 3.0, y: 9.0 });
    assert_eq!(resolved.velocity, Velocity { dx: 1.0, dy: -3.0 });
}

#[test]
fn bulk_tick_over_every_position() {
    let mut store = Store::new();
    for i in 0..4_i16 {
        store.insert(Position {
            x: f32::from(i),
            y: 0.0,
        });
    }

    store.for_each_mut::<Position>(|position| position.y += 1.0);

    let mut ys = Vec::new();
    store.for_each_ref::<Position>(|position| ys.push(position.y));
    assert_eq!(ys, vec![1.0; 4]);
}

#[test]
fn deep_compositions_tear_down_cleanly() {
    let mut store = Store::new();
    let tracked = store.insert(Tracked {
        unit: Unit {
            position: Position { x: 5.0, y: 5.0 },
            velocity: Velocity { dx: 0.0, dy: 0.0 },
        },
        label: "convoy-1".to_string(),
    });

    // Everything reachable from the top-level handle exists exactly once.
    assert_eq!(store.count::<Tracked>(), 1);
    assert_eq!(store.count::<Unit>(), 1);
    assert_eq!(store.count::<Position>(), 1);
    assert_eq!(store.count::<Velocity>(), 1);
    assert_eq!(store.count::<String>(), 1);

    assert!(store.remove(tracked));

    assert_eq!(store.count::<Tracked>(), 0);
    assert_eq!(store.count::<Unit>(), 0);
    assert_eq!(store.count::<Position>(), 0);
    assert_eq!(store.count::<Velocity>(), 0);
    assert_eq!(store.count::<String>(), 0);
}

#[test]
fn churn_reuses_slots_without_confusing_survivors() {
    let mut store = Store::new();

    let mut survivors = Vec::new();
    let mut retired = Vec::new();

    for round in 0..10_i32 {
        let handle = store.insert(round);
        if round % 2 == 0 {
            store.remove(handle);
            retired.push(handle);
        } else {
            survivors.push((handle, round));
        }
    }

    for (handle, value) in &survivors {
        assert_eq!(store.get(*handle), Some(*value));
    }
    for handle in &retired {
        assert!(!store.contains(*handle));
    }
    assert_eq!(store.count::<i32>(), survivors.len());
}

#[test]
fn mixed_plain_and_relation_populations_coexist() {
    let mut store = Store::new();

    // Standalone positions, unowned.
    let lone = store.insert(Position { x: 9.0, y: 9.0 });

    // A unit owning its own fresh position.
    let unit = store.insert(Unit {
        position: Position { x: 1.0, y: 1.0 },
        velocity: Velocity { dx: 0.5, dy: 0.0 },
    });

    assert_eq!(store.count::<Position>(), 2);

    // The standalone position removes freely; the owned one does not.
    let refs = store.refs(unit).unwrap();
    assert!(store.remove(lone));
    assert!(!store.remove(refs.position));
    assert_eq!(store.count::<Position>(), 1);

    assert!(store.remove(unit));
    assert_eq!(store.count::<Position>(), 0);
}
