//! Integration tests for room transitions.
//!
//! Exercises: FloorEngine::start → update (scan, debounce, spawn, commit)
//! → unload, with the in-memory physics world and model queue.
//!
//! Player positions are derived from whatever room the seeded selection
//! places, so every test works for any layout pairing.

use liminal_core::prelude::*;
use liminal_logic::config::FloorTuning;
use liminal_logic::geometry::{Direction, Vec3};
use liminal_logic::layout::LayoutTable;
use liminal_logic::zone::{RoomId, ZoneRef};

type Engine = FloorEngine<StaticColliderSet, QueuedModelLoader>;

const TICK: f32 = 0.05;

// ── Helpers ────────────────────────────────────────────────────────────

fn engine(seed: u64) -> Engine {
    let mut e = FloorEngine::new(
        LayoutTable::builtin(),
        FloorTuning::default(),
        StaticColliderSet::new(),
        QueuedModelLoader::new(),
    )
    .with_seed(seed);
    e.start("main", Vec3::ZERO).unwrap();
    e
}

/// Sample points along a straight walk through one doorway.
struct Seam {
    old_room: Vec3,
    old_zone: Vec3,
    new_zone: Vec3,
    new_room: Vec3,
}

fn seam(e: &Engine, zone: ZoneRef) -> Seam {
    let z = e.zone(zone).unwrap();
    let out = z.direction.unit();
    let c = z.opening_center + Vec3::new(0.0, 1.6, 0.0);
    Seam {
        old_room: c - out * 2.5,
        old_zone: c - out * 0.7,
        new_zone: c + out * 0.7,
        new_room: c + out * 2.5,
    }
}

fn zone_of_current(e: &Engine, dir: Direction) -> ZoneRef {
    let room = e.current_room().unwrap();
    ZoneRef {
        room: room.id,
        index: room.zones.iter().position(|z| z.direction == dir).unwrap(),
    }
}

/// A doorway of the current room that leads nowhere yet.
fn free_zone_of_current(e: &Engine) -> ZoneRef {
    let room = e.current_room().unwrap();
    ZoneRef {
        room: room.id,
        index: room.zones.iter().position(|z| z.connected.is_none()).unwrap(),
    }
}

fn run(e: &mut Engine, p: Vec3, seconds: f32) -> Vec<FloorEvent> {
    let mut events = Vec::new();
    let mut t = 0.0;
    while t < seconds {
        events.extend(e.update(p, TICK));
        t += TICK;
    }
    events
}

fn committed(events: &[FloorEvent]) -> Vec<(RoomId, Vec<RoomId>)> {
    events
        .iter()
        .filter_map(|ev| match ev {
            FloorEvent::Committed { current, removed } => Some((*current, removed.clone())),
            _ => None,
        })
        .collect()
}

fn spawned(events: &[FloorEvent]) -> Vec<RoomId> {
    events
        .iter()
        .filter_map(|ev| match ev {
            FloorEvent::Spawned { room, .. } => Some(*room),
            _ => None,
        })
        .collect()
}

fn assert_no_stale_colliders(e: &Engine) {
    assert_eq!(e.physics().body_count(), e.live_collider_count());
}

/// Walk from inside the current room through `zone` and wait for the
/// commit. Returns the id of the room walked into.
fn walk_forward(e: &mut Engine, zone: ZoneRef) -> RoomId {
    let s = seam(e, zone);
    run(e, s.old_room, TICK);
    let events = e.update(s.old_zone, TICK);
    let new_room = spawned(&events)[0];
    run(e, s.new_zone, TICK);
    let events = run(e, s.new_room, 0.4);
    assert_eq!(committed(&events).len(), 1);
    new_room
}

// ── Spawning ───────────────────────────────────────────────────────────

#[test]
fn spawned_room_attaches_at_the_doorway() {
    let mut e = engine(1);
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);
    let events = e.update(s.old_zone, TICK);
    let new_id = spawned(&events)[0];

    let new_room = e.room(new_id).unwrap();
    let attach = new_room.zone_connected_to(north.room).unwrap();
    let zone = &new_room.zones[attach];
    assert_eq!(zone.direction, Direction::South);
    assert!(zone
        .opening_center
        .approx_eq(&Vec3::new(8.0, 0.0, 0.0), 1e-4));
    assert_eq!(e.zone(north).unwrap().connected, Some(new_id));
    assert_ne!(new_room.layout_name, "main");
    assert_no_stale_colliders(&e);
}

#[test]
fn one_spawn_per_tick_and_none_while_inside() {
    let mut e = engine(2);
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);
    let mut events = e.update(s.old_zone, TICK);
    events.extend(run(&mut e, s.old_zone, 1.0));
    assert_eq!(spawned(&events).len(), 1);
    assert_eq!(e.rooms().len(), 2);
}

// ── Debounce ───────────────────────────────────────────────────────────

#[test]
fn in_out_in_within_delay_never_commits() {
    let mut e = engine(3);
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);

    let mut events = e.update(s.old_zone, TICK);
    events.extend(e.update(s.old_room, 0.1));
    events.extend(e.update(s.old_zone, 0.05));
    events.extend(run(&mut e, s.old_zone, 1.0));

    assert!(committed(&events).is_empty());
    assert!(events.contains(&FloorEvent::CommitCancelled));
    assert_eq!(e.pending_commit(), None);
    assert_eq!(e.rooms().len(), 2);
}

#[test]
fn in_out_then_wait_commits_exactly_once() {
    let mut e = engine(4);
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);

    let mut events = e.update(s.old_zone, TICK);
    events.extend(e.update(s.old_room, TICK));
    assert_eq!(e.pending_commit(), Some(north));
    events.extend(run(&mut e, s.old_room, 1.0));

    assert_eq!(committed(&events).len(), 1);
    let scheduled = events
        .iter()
        .filter(|ev| matches!(ev, FloorEvent::CommitScheduled { .. }))
        .count();
    assert_eq!(scheduled, 1);
}

// ── Commits ────────────────────────────────────────────────────────────

#[test]
fn walking_forward_swaps_the_current_room() {
    let mut e = engine(5);
    let start = e.current_room().unwrap().id;
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);

    let spawn_events = e.update(s.old_zone, TICK);
    let new_id = spawned(&spawn_events)[0];
    // crossing the seam goes zone to zone: nothing scheduled yet
    assert!(e.update(s.new_zone, TICK).is_empty());
    assert_eq!(e.update(s.new_room, TICK), vec![FloorEvent::CommitScheduled {
        zone: ZoneRef {
            room: new_id,
            index: e.room(new_id).unwrap().zone_connected_to(start).unwrap(),
        }
    }]);
    let events = run(&mut e, s.new_room, 0.4);

    assert_eq!(committed(&events), vec![(new_id, vec![start])]);
    assert_eq!(e.rooms().len(), 1);
    assert_eq!(e.current_room().unwrap().id, new_id);
    assert!(e.room(start).is_none());
    // the doorway back now leads nowhere
    assert!(e.current_room().unwrap().zones.iter().all(|z| z.connected.is_none()));
    assert_no_stale_colliders(&e);
}

#[test]
fn backing_out_unloads_the_speculative_room() {
    let mut e = engine(6);
    let start = e.current_room().unwrap().id;
    let north = zone_of_current(&e, Direction::North);
    let s = seam(&e, north);

    let new_id = spawned(&e.update(s.old_zone, TICK))[0];
    let events = run(&mut e, s.old_room, 0.4);

    assert_eq!(committed(&events), vec![(start, vec![new_id])]);
    assert_eq!(e.rooms().len(), 1);
    assert_eq!(e.current_room().unwrap().id, start);
    assert_eq!(e.zone(north).unwrap().connected, None);
    assert_no_stale_colliders(&e);

    // the doorway spawns a fresh room next time
    let again = spawned(&e.update(s.old_zone, TICK));
    assert_eq!(again.len(), 1);
    assert_ne!(again[0], new_id);
}

#[test]
fn backing_out_after_two_spawns_drops_both() {
    let mut e = engine(7);
    let start = e.current_room().unwrap().id;
    let north = seam(&e, zone_of_current(&e, Direction::North));
    let east = seam(&e, zone_of_current(&e, Direction::East));

    e.update(north.old_zone, TICK);
    e.update(Vec3::new(8.0, 1.6, 8.0), TICK);
    e.update(east.old_zone, TICK);
    assert_eq!(e.rooms().len(), 3);

    let events = run(&mut e, Vec3::new(8.0, 1.6, 8.0), 0.4);
    let commits = committed(&events);
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].0, start);
    assert_eq!(commits[0].1.len(), 2);
    assert_eq!(e.rooms().len(), 1);
    assert_no_stale_colliders(&e);
}

#[test]
fn long_walk_leaves_no_stale_colliders() {
    let mut e = engine(8);
    let mut visited = vec![e.current_room().unwrap().layout_name.clone()];
    for _ in 0..6 {
        let zone = free_zone_of_current(&e);
        let next = walk_forward(&mut e, zone);
        assert_eq!(e.current_room().unwrap().id, next);
        assert_eq!(e.rooms().len(), 1);
        assert_no_stale_colliders(&e);
        let layout = e.current_room().unwrap().layout_name.clone();
        assert_ne!(visited.last(), Some(&layout));
        visited.push(layout);
    }
    assert_eq!(e.scene().query::<&RoomRoot>().iter().count(), 1);
}

// ── Model loading ──────────────────────────────────────────────────────

#[test]
fn model_result_after_unload_is_a_no_op() {
    let mut e = engine(9);
    let start = e.current_room().unwrap().id;
    let requests = e.loader_mut().drain();
    assert!(requests.iter().all(|r| r.ticket.room == start));
    assert!(!requests.is_empty());

    let zone = zone_of_current(&e, Direction::North);
    walk_forward(&mut e, zone);
    let bodies = e.physics().body_count();

    let outcome = e.resolve_model(
        requests[0].ticket,
        Ok(LoadedModel {
            size: Vec3::new(1.0, 1.0, 1.0),
            center_offset: Vec3::new(0.0, 0.5, 0.0),
        }),
    );
    assert_eq!(outcome, ModelOutcome::RoomGone);
    assert_eq!(e.physics().body_count(), bodies);
    assert_no_stale_colliders(&e);
}

#[test]
fn loaded_model_collider_is_owned_by_its_room() {
    let mut e = engine(10);
    let requests = e.loader_mut().drain();
    let ticket = requests[0].ticket;
    let before = e.physics().body_count();
    let model = LoadedModel {
        size: Vec3::new(0.6, 1.2, 0.6),
        center_offset: Vec3::new(0.0, 0.6, 0.0),
    };

    assert_eq!(e.resolve_model(ticket, Ok(model)), ModelOutcome::Attached);
    assert_eq!(e.physics().body_count(), before + 1);
    assert_no_stale_colliders(&e);
    assert_eq!(e.resolve_model(ticket, Ok(model)), ModelOutcome::AlreadyResolved);
    assert_eq!(e.physics().body_count(), before + 1);

    // walking away takes the model collider with the room
    let zone = zone_of_current(&e, Direction::North);
    walk_forward(&mut e, zone);
    assert_no_stale_colliders(&e);
}

#[test]
fn failed_model_leaves_room_intact() {
    let mut e = engine(11);
    let ticket = e.loader_mut().drain()[1].ticket;
    let colliders = e.current_room().unwrap().colliders.len();
    let missing = LoadError::NotFound("models/water_cooler.glb".into());
    let outcome = e.resolve_model(ticket, Err(missing));
    assert_eq!(outcome, ModelOutcome::Failed);
    let room = e.current_room().unwrap();
    assert_eq!(room.colliders.len(), colliders);
    assert_eq!(room.models[1].state, ModelSlotState::Failed);
    assert!(room.zones.iter().all(|z| z.is_active));
}

// ── Puzzle completion ──────────────────────────────────────────────────

#[test]
fn completed_puzzle_only_spawns_the_exit() {
    let mut e = engine(12);
    e.set_puzzle_completed(true);
    for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
        let s = seam(&e, zone_of_current(&e, dir));
        let events = e.update(s.old_zone, TICK);
        assert!(
            matches!(events.last(), Some(FloorEvent::Spawned { layout, .. }) if layout == "exit"),
            "{dir}: {events:?}"
        );
        e.update(Vec3::new(8.0, 1.6, 8.0), TICK);
    }
}

#[test]
fn exit_room_can_follow_itself() {
    let mut e = engine(13);
    e.set_puzzle_completed(true);
    let zone = zone_of_current(&e, Direction::North);
    let exit = walk_forward(&mut e, zone);
    assert_eq!(e.room(exit).unwrap().layout_name, "exit");

    // the exit's only doorway leads back; it is free after the commit
    let zone = free_zone_of_current(&e);
    let s = seam(&e, zone);
    run(&mut e, s.old_room, TICK);
    let events = e.update(s.old_zone, TICK);
    assert!(matches!(events.as_slice(), [FloorEvent::Spawned { layout, .. }] if layout == "exit"));
}
